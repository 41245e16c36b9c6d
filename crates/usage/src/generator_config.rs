//! Line-oriented reader for the SwiftGen config subset the resolver needs.
//!
//! Only the `xcassets` section matters: per entry, the declared `inputs` and
//! each `output` file, plus the top-level `output_dir`. Everything else in the
//! file is skipped without being understood.

use std::mem;
use std::path::{Path, PathBuf};

/// Checked in order; the first one that exists wins.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "swiftgen.yml",
    "swiftgen.yaml",
    ".swiftgen.yml",
    "swiftgen.config.yml",
];

const ASSETS_SECTION: &str = "xcassets";

/// A generated source file and the catalog input it is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub path: PathBuf,
    pub catalog: String,
}

pub fn find_config(project_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

#[derive(Default)]
struct ParseState {
    in_assets: bool,
    global_output_dir: Option<String>,
    /// Set once the first line of the `xcassets` section has been seen.
    section_started: bool,
    /// Indentation of the `- ` items when the section is a list of entries.
    entry_indent: Option<usize>,
    entry: Entry,
    /// Indentation of an `inputs:` key whose values follow as list items.
    inputs_list_indent: Option<usize>,
}

/// One `xcassets` entry, collected until the next entry or section starts.
#[derive(Default)]
struct Entry {
    inputs: Vec<String>,
    output_dir: Option<String>,
    outputs: Vec<String>,
}

impl Entry {
    fn into_outputs(
        self,
        global_output_dir: Option<&str>,
        project_root: &Path,
    ) -> Vec<GeneratedOutput> {
        if self.inputs.is_empty() {
            for output in &self.outputs {
                log::debug!("Ignoring generator output {output} without inputs");
            }
            return Vec::new();
        }
        let output_dir = self.output_dir.as_deref().or(global_output_dir);
        let catalog = self.inputs.join(", ");
        self.outputs
            .iter()
            .map(|output| GeneratedOutput {
                path: resolve_output(output, output_dir, project_root),
                catalog: catalog.clone(),
            })
            .collect()
    }
}

/// Extracts the generated outputs declared under `xcassets`.
///
/// Relative output paths resolve against `output_dir` (itself relative to the
/// project root) when one is set, else against the project root. Each entry
/// only sees its own `inputs`, wherever they appear within the entry.
pub fn parse_outputs(content: &str, project_root: &Path) -> Vec<GeneratedOutput> {
    let mut state = ParseState::default();
    let mut entries: Vec<Entry> = Vec::new();

    for raw_line in content.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indent = raw_line.len() - raw_line.trim_start().len();
        let (is_item, body, indent) = match trimmed.strip_prefix("- ") {
            Some(rest) => (true, rest.trim(), indent + 2),
            None if trimmed == "-" => (true, "", indent + 2),
            None => (false, trimmed, indent),
        };

        if indent == 0 && !is_item {
            let Some((key, value)) = split_key_value(body) else {
                continue;
            };
            if state.in_assets {
                entries.push(mem::take(&mut state.entry));
            }
            state.in_assets = key == ASSETS_SECTION;
            state.section_started = false;
            state.entry_indent = None;
            state.inputs_list_indent = None;
            if key == "output_dir" && !value.is_empty() {
                state.global_output_dir = Some(value.to_string());
            }
            continue;
        }

        if !state.in_assets {
            continue;
        }

        if !state.section_started {
            state.section_started = true;
            if is_item {
                state.entry_indent = Some(indent);
            }
        }
        if is_item && state.entry_indent == Some(indent) {
            entries.push(mem::take(&mut state.entry));
            state.inputs_list_indent = None;
        }

        if let Some(list_indent) = state.inputs_list_indent {
            if is_item && indent > list_indent && !body.contains(':') {
                state.entry.inputs.push(unquote(body).to_string());
                continue;
            }
            state.inputs_list_indent = None;
        }

        let Some((key, value)) = split_key_value(body) else {
            continue;
        };
        match key {
            "inputs" => {
                state.entry.inputs = parse_inline_list(value);
                if value.is_empty() {
                    state.inputs_list_indent = Some(indent);
                }
            }
            "output_dir" if !value.is_empty() => {
                state.entry.output_dir = Some(value.to_string());
            }
            "output" if !value.is_empty() => {
                state.entry.outputs.push(value.to_string());
            }
            _ => {}
        }
    }
    if state.in_assets {
        entries.push(state.entry);
    }

    let global_output_dir = state.global_output_dir.as_deref();
    entries
        .into_iter()
        .flat_map(|entry| entry.into_outputs(global_output_dir, project_root))
        .collect()
}

fn split_key_value(body: &str) -> Option<(&str, &str)> {
    let (key, value) = body.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some((key, unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// `A.xcassets` or `[A.xcassets, B.xcassets]`.
fn parse_inline_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }
    match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(inner) => inner
            .split(',')
            .map(|item| unquote(item).to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        None => vec![value.to_string()],
    }
}

fn resolve_output(output: &str, output_dir: Option<&str>, project_root: &Path) -> PathBuf {
    match output_dir {
        Some(dir) => resolve_path(dir, project_root).join(strip_dot_slash(output)),
        None => resolve_path(output, project_root),
    }
}

fn resolve_path(path: &str, project_root: &Path) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    project_root.join(strip_dot_slash(path))
}

fn strip_dot_slash(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}
