//! Alias table: raw channel name to canonical name
//!
//! File format, one canonical name per line:
//!
//! ```text
//! # comment
//! CCTV1,CCTV-1,CCTV 1 综合,re:^CCTV-?1\s*(HD)?$
//! ```
//!
//! Aliases prefixed with `re:` are case-insensitive regexes, everything else
//! is matched by case-insensitive equality. Entries are evaluated in file
//! order and the first match wins.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Prefix marking an alias as a regular expression
pub const REGEX_ALIAS_PREFIX: &str = "re:";

#[derive(Debug, Clone)]
enum AliasPattern {
    /// Lower-cased, trimmed literal
    Exact(String),
    Regex(Regex),
}

#[derive(Debug, Clone)]
struct AliasEntry {
    pattern: AliasPattern,
    canonical: String,
}

/// Ordered alias table, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the plain-text alias format
    ///
    /// Invalid regex aliases are dropped with a warning rather than failing
    /// the whole table.
    pub fn parse(content: &str) -> Self {
        let mut table = Self::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            if parts.len() < 2 {
                debug!("Ignoring alias line {} without aliases: {}", line_num + 1, line);
                continue;
            }

            let canonical = parts[0];
            for alias in &parts[1..] {
                if let Err(e) = table.push(alias, canonical) {
                    warn!("Skipping invalid alias on line {}: '{}' ({})", line_num + 1, alias, e);
                }
            }
        }

        table
    }

    /// Append an alias; `re:`-prefixed aliases are compiled as regexes
    pub fn push(&mut self, alias: &str, canonical: &str) -> Result<(), regex::Error> {
        let pattern = match alias.strip_prefix(REGEX_ALIAS_PREFIX) {
            Some(expr) => AliasPattern::Regex(
                RegexBuilder::new(expr.trim())
                    .case_insensitive(true)
                    .build()?,
            ),
            None => AliasPattern::Exact(alias.trim().to_lowercase()),
        };

        self.entries.push(AliasEntry {
            pattern,
            canonical: canonical.trim().to_string(),
        });
        Ok(())
    }

    /// Map a raw name to its canonical name, or return it unchanged
    pub fn resolve(&self, raw_name: &str) -> String {
        let trimmed = raw_name.trim();
        let lowered = trimmed.to_lowercase();

        for entry in &self.entries {
            let matched = match &entry.pattern {
                AliasPattern::Exact(alias) => *alias == lowered,
                AliasPattern::Regex(regex) => regex.is_match(trimmed),
            };
            if matched {
                return entry.canonical.clone();
            }
        }

        raw_name.to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
