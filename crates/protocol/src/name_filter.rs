use regex::{Regex, RegexBuilder};

/// Case-insensitive asset name pattern where `*` stands for any sequence.
///
/// Every other character matches literally. The pattern may match anywhere in
/// the name, so both `icon` and `icon*` match `old_icon_home`.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    regex: Regex,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let body = pattern
            .trim()
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&body)
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}
