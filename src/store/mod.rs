//! Channel merge store
//!
//! Keyed by canonical name and iterated in first-insertion order. A record's
//! metadata line and group are fixed when it is created; only its URL list
//! can grow afterwards, and only from primary sources.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::{ChannelRecord, MergeStats, SourceBatch};

pub mod url_key;

pub use url_key::{DEFAULT_VOLATILE_PARAMS, UrlMatchMode, UrlMatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Only primary sources may add URLs to an existing channel
    NonPrimary,
    /// Multiple URLs per channel are disabled
    SingleUrlPolicy,
    EmptyUrl,
}

/// What happened to one ingested entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Added,
    Appended,
    Duplicate,
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct ChannelStore {
    channels: IndexMap<String, ChannelRecord>,
    keep_multiple_urls: bool,
    matcher: UrlMatcher,
}

impl Default for ChannelStore {
    fn default() -> Self {
        Self::new(true, UrlMatcher::default())
    }
}

impl ChannelStore {
    pub fn new(keep_multiple_urls: bool, matcher: UrlMatcher) -> Self {
        Self {
            channels: IndexMap::new(),
            keep_multiple_urls,
            matcher,
        }
    }

    /// Merge one entry into the store
    pub fn ingest(
        &mut self,
        name: &str,
        metadata_line: &str,
        url: &str,
        group: &str,
        is_primary: bool,
    ) -> IngestOutcome {
        let Some(record) = self.channels.get_mut(name) else {
            self.channels.insert(
                name.to_string(),
                ChannelRecord {
                    name: name.to_string(),
                    metadata_line: metadata_line.to_string(),
                    urls: vec![url.to_string()],
                    group: group.to_string(),
                },
            );
            return IngestOutcome::Added;
        };

        if url.trim().is_empty() {
            return IngestOutcome::Skipped(SkipReason::EmptyUrl);
        }

        let incoming = self.matcher.key(url);
        if record.urls.iter().any(|u| self.matcher.key(u) == incoming) {
            return IngestOutcome::Duplicate;
        }
        if !is_primary {
            return IngestOutcome::Skipped(SkipReason::NonPrimary);
        }
        if !self.keep_multiple_urls {
            return IngestOutcome::Skipped(SkipReason::SingleUrlPolicy);
        }

        record.urls.push(url.to_string());
        IngestOutcome::Appended
    }

    /// Fold a parsed batch into the store, entry by entry
    pub fn absorb(&mut self, batch: &SourceBatch) -> MergeStats {
        let mut stats = MergeStats {
            blocked: batch.blocked,
            filtered: batch.filtered,
            missing_urls: batch.missing_urls.len(),
            ..MergeStats::default()
        };

        for entry in &batch.entries {
            let outcome = self.ingest(
                &entry.name,
                &entry.metadata_line,
                &entry.url,
                &entry.group,
                batch.primary,
            );
            match outcome {
                IngestOutcome::Added => {
                    debug!("[ADD][{}] {} -> {} -> {}", batch.label, entry.raw_name, entry.name, entry.group);
                    stats.added += 1;
                }
                IngestOutcome::Appended => {
                    debug!("[APPEND][{}] {} -> {}", batch.label, entry.raw_name, entry.name);
                    stats.appended += 1;
                }
                IngestOutcome::Duplicate => {
                    debug!("[DUPLICATE][{}] {} -> {}", batch.label, entry.raw_name, entry.name);
                    stats.duplicates += 1;
                }
                IngestOutcome::Skipped(reason) => {
                    debug!(
                        "[SKIP][{}] {} -> {} ({:?})",
                        batch.label, entry.raw_name, entry.name, reason
                    );
                    stats.skipped += 1;
                }
            }
        }

        stats
    }

    pub fn get(&self, name: &str) -> Option<&ChannelRecord> {
        self.channels.get(name)
    }

    /// Records in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ChannelRecord> {
        self.channels.values()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn total_urls(&self) -> usize {
        self.channels.values().map(|r| r.urls.len()).sum()
    }
}
