//! Raw asset name to generated accessor resolution.
//!
//! A project that runs SwiftGen over its catalogs references assets through
//! generated constants (`Asset.Icons.home`) instead of string literals. The
//! resolver reads the generator config, opens every generated output it
//! declares and records which accessor each raw asset name is bound to.

use crate::generator_config::{find_config, parse_outputs, GeneratedOutput};
use janitor_protocol::SymbolicMapping;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Namespace used when a binding sits outside any type declaration.
pub const FALLBACK_NAMESPACE: &str = "Asset";

static BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"static\s+let\s+`?(\w+)`?\s*=\s*(?:Image|Color|Data|Symbol)Asset\(name:\s*"([^"]+)"\)"#,
    )
    .expect("valid binding regex")
});

static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:enum|struct|class|extension)\s+([A-Za-z_][\w.]*)")
        .expect("valid declaration regex")
});

/// Everything the resolver learned about one project.
#[derive(Debug, Clone, Default)]
pub struct SymbolicMappings {
    pub config_path: Option<PathBuf>,
    /// Generated outputs that exist on disk.
    pub generated_files: Vec<PathBuf>,
    pub entries: Vec<SymbolicMapping>,
    by_name: HashMap<String, Vec<String>>,
}

impl SymbolicMappings {
    pub fn from_entries(
        config_path: Option<PathBuf>,
        generated_files: Vec<PathBuf>,
        entries: Vec<SymbolicMapping>,
    ) -> Self {
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        for entry in &entries {
            let paths = by_name.entry(entry.asset_name.clone()).or_default();
            if !paths.contains(&entry.accessor_path) {
                paths.push(entry.accessor_path.clone());
            }
        }
        Self {
            config_path,
            generated_files,
            entries,
            by_name,
        }
    }

    pub fn config_found(&self) -> bool {
        self.config_path.is_some()
    }

    /// Whether the generator exposes `asset_name` through an accessor.
    pub fn is_managed(&self, asset_name: &str) -> bool {
        self.by_name.contains_key(asset_name)
    }

    pub fn accessor_paths(&self, asset_name: &str) -> &[String] {
        self.by_name
            .get(asset_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_accessor_paths(&self) -> impl Iterator<Item = &str> {
        self.by_name.values().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct SymbolicResolver {
    project_root: PathBuf,
}

impl SymbolicResolver {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    /// Build the mapping for the project. Never fails: a missing config means
    /// an empty mapping and unreadable files are skipped.
    pub fn resolve(&self) -> SymbolicMappings {
        let Some(config_path) = find_config(&self.project_root) else {
            log::debug!(
                "No generator config under {}",
                self.project_root.display()
            );
            return SymbolicMappings::default();
        };

        let outputs = match fs::read_to_string(&config_path) {
            Ok(content) => parse_outputs(&content, &self.project_root),
            Err(err) => {
                log::warn!("Failed to read {}: {err}", config_path.display());
                Vec::new()
            }
        };

        let mut generated_files = Vec::new();
        let mut entries = Vec::new();
        for GeneratedOutput { path, catalog } in outputs {
            match fs::read_to_string(&path) {
                Ok(content) => {
                    let parsed = parse_generated_source(&content, &catalog);
                    log::debug!("{}: {} accessors", path.display(), parsed.len());
                    entries.extend(parsed);
                    generated_files.push(path);
                }
                Err(err) => log::warn!("Skipping generated file {}: {err}", path.display()),
            }
        }

        log::info!(
            "Resolved {} generated accessors from {}",
            entries.len(),
            config_path.display()
        );
        SymbolicMappings::from_entries(Some(config_path), generated_files, entries)
    }
}

/// Extract every `static let x = ImageAsset(name: "raw")` binding together
/// with the dotted path of the types enclosing it.
pub fn parse_generated_source(content: &str, catalog: &str) -> Vec<SymbolicMapping> {
    let mut entries = Vec::new();
    // (name, brace depth its body opened at)
    let mut namespaces: Vec<(String, usize)> = Vec::new();
    let mut depth = 0usize;
    let mut pending: Option<String> = None;

    for line in content.lines() {
        let declarations: Vec<(usize, &str)> = DECLARATION_RE
            .captures_iter(line)
            .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
            .collect();
        let bindings: Vec<(usize, &str, &str)> = BINDING_RE
            .captures_iter(line)
            .filter_map(|caps| {
                Some((
                    caps.get(0)?.start(),
                    caps.get(1)?.as_str(),
                    caps.get(2)?.as_str(),
                ))
            })
            .collect();

        let mut in_string = false;
        let mut escaped = false;
        let mut prev = '\0';
        for (offset, ch) in line.char_indices() {
            if !in_string {
                if let Some((_, name)) = declarations.iter().find(|(start, _)| *start == offset) {
                    pending = Some((*name).to_string());
                }
                if let Some((_, identifier, raw)) =
                    bindings.iter().find(|(start, _, _)| *start == offset)
                {
                    entries.push(SymbolicMapping {
                        asset_name: (*raw).to_string(),
                        accessor_path: accessor_path(&namespaces, identifier),
                        catalog: catalog.to_string(),
                    });
                }
            }

            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
            } else {
                match ch {
                    '"' => in_string = true,
                    '/' if prev == '/' => break,
                    '{' => {
                        depth += 1;
                        if let Some(name) = pending.take() {
                            namespaces.push((name, depth));
                        }
                    }
                    '}' => {
                        if namespaces.last().is_some_and(|(_, opened)| *opened == depth) {
                            namespaces.pop();
                        }
                        depth = depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
            prev = ch;
        }
    }

    entries
}

fn accessor_path(namespaces: &[(String, usize)], identifier: &str) -> String {
    if namespaces.is_empty() {
        return format!("{FALLBACK_NAMESPACE}.{identifier}");
    }
    let mut path = namespaces
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(".");
    path.push('.');
    path.push_str(identifier);
    path
}
