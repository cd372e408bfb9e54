//! Line-pair M3U parser
//!
//! Each `#EXTINF` line is paired with the line that follows it. Entries are
//! aliased, filtered and classified here, so the merge step only sees
//! accepted, fully rewritten entries.

use tracing::{debug, info, warn};

use super::extinf;
use crate::models::{MissingUrl, ParsedEntry, SourceBatch};
use crate::rules::{AllowList, RuleSet};

/// Name used when a metadata line carries no usable name at all
pub const UNKNOWN_CHANNEL: &str = "未知频道";

/// Per-run parsing switches
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub default_group: String,
    /// Rewrite title and `tvg-name` to the canonical name
    pub rename_channels: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_group: crate::config::defaults::DEFAULT_GROUP.to_string(),
            rename_channels: true,
        }
    }
}

/// Why a metadata/URL pair did not become an entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    Filtered,
    Blocked,
}

pub struct M3uParser<'a> {
    rules: &'a RuleSet,
    allowlist: &'a AllowList,
    options: &'a ParseOptions,
}

impl<'a> M3uParser<'a> {
    pub fn new(rules: &'a RuleSet, allowlist: &'a AllowList, options: &'a ParseOptions) -> Self {
        Self {
            rules,
            allowlist,
            options,
        }
    }

    /// Parse playlist text into a batch of accepted entries
    pub fn parse(&self, label: &str, primary: bool, content: &str) -> SourceBatch {
        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        let mut batch = SourceBatch {
            label: label.to_string(),
            primary,
            line_count: lines.len(),
            ..SourceBatch::default()
        };

        debug!("Parsing {} lines from '{}'", lines.len(), label);

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if extinf::is_header(line) {
                if batch.header.is_none() {
                    batch.header = Some(line.to_string());
                }
                i += 1;
                continue;
            }

            if !extinf::is_extinf(line) {
                i += 1;
                continue;
            }

            let url = match lines.get(i + 1) {
                Some(next) if is_url_line(next) => *next,
                _ => {
                    let missing = MissingUrl {
                        line_number: i + 1,
                        raw_name: raw_name(&extinf::repair_keys(line)),
                    };
                    warn!(
                        "[{}] line {}: '{}' has no URL, skipping",
                        label, missing.line_number, missing.raw_name
                    );
                    batch.missing_urls.push(missing);
                    i += 1;
                    continue;
                }
            };

            match self.process_entry(line, url) {
                Ok(entry) => {
                    debug!(
                        "[{}] {} -> {} [{}]",
                        label, entry.raw_name, entry.name, entry.group
                    );
                    batch.entries.push(entry);
                }
                Err((Rejection::Filtered, name)) => {
                    debug!("[FILTERED][{}] {}", label, name);
                    batch.filtered += 1;
                }
                Err((Rejection::Blocked, name)) => {
                    debug!("[BLOCKED][{}] {}", label, name);
                    batch.blocked += 1;
                }
            }
            i += 2;
        }

        info!(
            "Parsed '{}': {} entries, {} blocked, {} filtered, {} missing URLs",
            label,
            batch.entries.len(),
            batch.blocked,
            batch.filtered,
            batch.missing_urls.len()
        );

        batch
    }

    fn process_entry(&self, line: &str, url: &str) -> Result<ParsedEntry, (Rejection, String)> {
        let line = extinf::repair_keys(line);
        let raw = raw_name(&line);
        let canonical = self.rules.aliases.resolve(&raw);

        if !self.allowlist.passes(&raw) && !self.allowlist.passes(&canonical) {
            return Err((Rejection::Filtered, raw));
        }
        if self.rules.blocklist.is_blocked(&canonical) {
            return Err((Rejection::Blocked, format!("{raw} -> {canonical}")));
        }

        let group = self
            .rules
            .groups
            .classify(&canonical, &self.options.default_group);

        let mut metadata = line;
        if extinf::non_empty_attribute(&metadata, extinf::TVG_ID).is_none() {
            metadata = extinf::set_attribute(&metadata, extinf::TVG_ID, &canonical);
        }
        metadata = extinf::set_attribute(&metadata, extinf::GROUP_TITLE, &group);
        if self.options.rename_channels && canonical != raw {
            if extinf::has_attribute(&metadata, extinf::TVG_NAME) {
                metadata = extinf::set_attribute(&metadata, extinf::TVG_NAME, &canonical);
            }
            metadata = extinf::set_title(&metadata, &canonical);
        }

        Ok(ParsedEntry {
            name: canonical,
            raw_name: raw,
            metadata_line: metadata,
            url: url.to_string(),
            group,
        })
    }
}

/// A URL line is any non-blank line that is not a directive or comment
fn is_url_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Raw name: `tvg-name`, then title, then `tvg-id`, then the sentinel
pub fn raw_name(line: &str) -> String {
    extinf::non_empty_attribute(line, extinf::TVG_NAME)
        .or_else(|| extinf::title(line).map(str::to_string))
        .or_else(|| extinf::non_empty_attribute(line, extinf::TVG_ID))
        .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string())
}
