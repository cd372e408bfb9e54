//! Group classification rules
//!
//! Groups are evaluated in declaration order and, within a group, patterns in
//! declaration order. The first matching group wins.

use indexmap::IndexMap;

use super::pattern::{MatchPattern, compile_all};

#[derive(Debug, Clone)]
struct GroupRule {
    label: String,
    patterns: Vec<MatchPattern>,
}

/// Ordered group rules, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct GroupRules {
    groups: Vec<GroupRule>,
}

impl GroupRules {
    /// Build from an ordered `group -> keywords` mapping
    pub fn from_map(rules: &IndexMap<String, Vec<String>>) -> Self {
        let groups = rules
            .iter()
            .map(|(label, keywords)| GroupRule {
                label: label.clone(),
                patterns: compile_all(keywords),
            })
            .collect();
        Self { groups }
    }

    /// Group label for a canonical name, or `default_group` when nothing matches
    pub fn classify(&self, canonical_name: &str, default_group: &str) -> String {
        self.groups
            .iter()
            .find(|group| group.patterns.iter().any(|p| p.is_match(canonical_name)))
            .map(|group| group.label.clone())
            .unwrap_or_else(|| default_group.to_string())
    }

    /// Group labels in declaration order; this is also the output order
    pub fn group_order(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
