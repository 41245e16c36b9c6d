//! Literal-name reference patterns and the generated-accessor matcher.

use janitor_protocol::SourceLanguage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid literal reference regex"))
        .collect()
}

static SWIFT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"UIImage\(named:\s*"([^"]+)""#,
        r#"UIImage\(named:\s*'([^']+)'"#,
        r#"NSImage\(named:\s*"([^"]+)""#,
        r#"NSImage\(named:\s*'([^']+)'"#,
        r#"\bImage\("([^"]+)""#,
        r#"\bImage\('([^']+)'"#,
        r#"UIColor\(named:\s*"([^"]+)""#,
        r#"NSColor\(named:\s*"([^"]+)""#,
        r#"\bColor\("([^"]+)""#,
    ])
});

static OBJC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"imageNamed:\s*@"([^"]+)""#,
        r#"colorNamed:\s*@"([^"]+)""#,
    ])
});

static INTERFACE_BUILDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"\b(?:image|selectedImage|highlightedImage|backgroundImage)="([^"]+)""#,
        r#"<image\s+name="([^"]+)""#,
        r#"<namedColor\s+name="([^"]+)""#,
        r#"<color\b[^>]*\bname="([^"]+)""#,
    ])
});

static ACCESSOR_CHAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)+").expect("valid accessor chain regex")
});

/// Fixed, ordered literal pattern set for a language. Capture group 1 is the
/// asset name.
pub fn literal_patterns(language: SourceLanguage) -> &'static [Regex] {
    match language {
        SourceLanguage::Swift => SWIFT_PATTERNS.as_slice(),
        SourceLanguage::ObjectiveC => OBJC_PATTERNS.as_slice(),
        SourceLanguage::InterfaceBuilder => INTERFACE_BUILDER_PATTERNS.as_slice(),
    }
}

/// Asset names referenced literally on one line, in pattern order then
/// position. A name matched by several patterns is reported once per match.
pub fn literal_names(language: SourceLanguage, line: &str) -> Vec<&str> {
    let mut names = Vec::new();
    for pattern in literal_patterns(language) {
        for caps in pattern.captures_iter(line) {
            if let Some(name) = caps.get(1) {
                names.push(name.as_str());
            }
        }
    }
    names
}

/// Finds occurrences of known accessor paths (`Asset.Icons.home`), either
/// bare or followed by member access (`Asset.Icons.home.image`).
#[derive(Debug, Clone, Default)]
pub struct SymbolicMatcher {
    paths: HashSet<String>,
}

impl SymbolicMatcher {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Known accessor paths on the line, each at most once, in order of
    /// first appearance.
    ///
    /// Every contiguous run of two or more segments of each dotted chain is
    /// a candidate, so `Asset.icon` is found inside `MyApp.Asset.icon.image`
    /// while `Asset.iconLarge` never matches `Asset.icon`.
    pub fn matches<'a>(&'a self, line: &str) -> Vec<&'a str> {
        if self.paths.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<&'a str> = Vec::new();
        for chain in ACCESSOR_CHAIN_RE.find_iter(line) {
            let segments: Vec<&str> = chain.as_str().split('.').collect();
            for start in 0..segments.len() {
                for end in (start + 2)..=segments.len() {
                    let candidate = segments[start..end].join(".");
                    if let Some(path) = self.paths.get(&candidate) {
                        if !found.contains(&path.as_str()) {
                            found.push(path.as_str());
                        }
                    }
                }
            }
        }
        found
    }
}
