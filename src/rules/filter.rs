//! Block and allow lists

use super::pattern::{MatchPattern, compile_all};

/// Names matching any pattern are excluded from every source
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    patterns: Vec<MatchPattern>,
}

impl BlockList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: compile_all(patterns),
        }
    }

    /// Empty or whitespace-only names are always blocked
    pub fn is_blocked(&self, name: &str) -> bool {
        name.trim().is_empty() || self.patterns.iter().any(|p| p.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Per-source allowlist; an empty list admits everything
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    patterns: Vec<MatchPattern>,
}

impl AllowList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: compile_all(patterns),
        }
    }

    pub fn passes(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_names_are_blocked() {
        let blocklist = BlockList::default();
        assert!(blocklist.is_blocked(""));
        assert!(blocklist.is_blocked("   "));
        assert!(!blocklist.is_blocked("CCTV1"));
    }

    #[test]
    fn test_blocklist_patterns() {
        let blocklist = BlockList::new(&["购物", "^test", "adult("]);
        assert!(blocklist.is_blocked("家有购物"));
        assert!(blocklist.is_blocked("TEST channel"));
        assert!(!blocklist.is_blocked("a test channel"));
        // invalid regex falls back to substring
        assert!(blocklist.is_blocked("Adult(18+)"));
    }

    #[test]
    fn test_empty_allowlist_admits_everything() {
        let allowlist = AllowList::default();
        assert!(allowlist.passes("anything"));
        assert!(allowlist.passes(""));
    }

    #[test]
    fn test_allowlist_requires_a_match() {
        let allowlist = AllowList::new(&["CCTV", "卫视$"]);
        assert!(allowlist.passes("cctv-5"));
        assert!(allowlist.passes("浙江卫视"));
        assert!(!allowlist.passes("卫视中文台"));
        assert!(!allowlist.passes("Movie Box"));
    }
}
