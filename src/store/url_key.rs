//! URL equality for de-duplication
//!
//! In `exact` mode two URLs are equal when their bytes are. In `fuzzy` mode
//! query parameters that only carry timestamps, signatures or cache busters
//! are ignored and the rest of the URL is compared case-insensitively.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Query keys dropped in fuzzy mode unless configured otherwise
pub const DEFAULT_VOLATILE_PARAMS: &[&str] = &[
    "t",
    "ts",
    "time",
    "timestamp",
    "token",
    "sign",
    "signature",
    "auth",
    "key",
    "expires",
    "_",
    "cb",
    "cache",
    "nocache",
    "rand",
    "r",
    "wsTime",
    "wsSecret",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMatchMode {
    #[default]
    Exact,
    Fuzzy,
}

#[derive(Debug, Clone)]
pub struct UrlMatcher {
    mode: UrlMatchMode,
    /// Lower-cased volatile keys
    volatile: HashSet<String>,
}

impl Default for UrlMatcher {
    fn default() -> Self {
        Self::new(UrlMatchMode::Exact, DEFAULT_VOLATILE_PARAMS)
    }
}

impl UrlMatcher {
    pub fn new<S: AsRef<str>>(mode: UrlMatchMode, volatile_params: &[S]) -> Self {
        Self {
            mode,
            volatile: volatile_params
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn exact() -> Self {
        Self::default()
    }

    pub fn fuzzy() -> Self {
        Self::new(UrlMatchMode::Fuzzy, DEFAULT_VOLATILE_PARAMS)
    }

    /// Comparison key for a URL
    pub fn key(&self, url: &str) -> String {
        match self.mode {
            UrlMatchMode::Exact => url.to_string(),
            UrlMatchMode::Fuzzy => self.fuzzy_key(url),
        }
    }

    pub fn same(&self, a: &str, b: &str) -> bool {
        match self.mode {
            UrlMatchMode::Exact => a == b,
            UrlMatchMode::Fuzzy => self.fuzzy_key(a) == self.fuzzy_key(b),
        }
    }

    fn fuzzy_key(&self, url: &str) -> String {
        let trimmed = url.trim();
        let Ok(mut parsed) = Url::parse(trimmed) else {
            return trimmed.to_lowercase();
        };

        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(k, _)| !self.volatile.contains(&k.to_lowercase()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed.query_pairs_mut().clear().extend_pairs(kept);
        }
        parsed.set_fragment(None);

        parsed.as_str().to_lowercase()
    }
}
