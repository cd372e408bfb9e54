//! Keyword patterns used by group, block and allow rules
//!
//! A pattern is compiled once when the rule set is loaded. Text that compiles
//! as a regex is matched as a case-insensitive regex search; anything else
//! falls back to a case-insensitive substring test.

use regex::{Regex, RegexBuilder};
use tracing::trace;

/// A compiled keyword pattern
#[derive(Debug, Clone)]
pub enum MatchPattern {
    /// Case-insensitive regex search
    Regex(Regex),
    /// Case-insensitive substring; stored lower-cased
    Substring(String),
}

impl MatchPattern {
    /// Compile a keyword, falling back to substring matching on invalid regex
    pub fn compile(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Self::Regex(regex),
            Err(e) => {
                trace!("Pattern '{}' is not a valid regex ({}), using substring match", pattern, e);
                Self::Substring(pattern.to_lowercase())
            }
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(name),
            Self::Substring(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Compile a list of keywords, skipping blank entries
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Vec<MatchPattern> {
    patterns
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(MatchPattern::compile)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CCTV", "cctv-1", true)]
    #[case("^CCTV-?\\d+$", "CCTV13", true)]
    #[case("^CCTV-?\\d+$", "CCTV13 HD", false)]
    #[case("卫视", "湖南卫视", true)]
    #[case("sports", "ESPN", false)]
    fn test_regex_patterns(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        let compiled = MatchPattern::compile(pattern);
        assert!(matches!(compiled, MatchPattern::Regex(_)));
        assert_eq!(compiled.is_match(name), expected);
    }

    #[test]
    fn test_invalid_regex_falls_back_to_substring() {
        let compiled = MatchPattern::compile("CCTV(");
        assert!(matches!(compiled, MatchPattern::Substring(_)));
        assert!(compiled.is_match("cctv(5)"));
        assert!(!compiled.is_match("CCTV5"));
    }

    #[test]
    fn test_compile_all_skips_blank_entries() {
        let compiled = compile_all(&["news", "  ", ""]);
        assert_eq!(compiled.len(), 1);
        assert!(compiled[0].is_match("World News"));
    }
}
