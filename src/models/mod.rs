use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::errors::SourceErrorKind;
use crate::utils::url::UrlUtils;

/// Where a source's content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(String),
}

/// A single declared source
///
/// Local files are always primary. Remote sources are primary only when the
/// sources file says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub location: SourceLocation,
    pub primary: bool,
    /// Allowlist patterns; empty means every channel is admitted
    pub include_channels: Vec<String>,
}

impl SourceDescriptor {
    pub fn local<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            location: SourceLocation::Local(path.into()),
            primary: true,
            include_channels: Vec::new(),
        }
    }

    pub fn remote<S: Into<String>>(url: S, primary: bool, include_channels: Vec<String>) -> Self {
        Self {
            location: SourceLocation::Remote(url.into()),
            primary,
            include_channels,
        }
    }

    /// Human-readable label with credentials masked
    pub fn label(&self) -> String {
        match &self.location {
            SourceLocation::Local(path) => format!("file:{}", path.display()),
            SourceLocation::Remote(url) => UrlUtils::obfuscate_credentials(url),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.location, SourceLocation::Remote(_))
    }
}

/// Pinned channel rendered ahead of everything else
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomChannel {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub logo: String,
}

/// One merged channel, keyed by canonical name in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRecord {
    pub name: String,
    /// Rendered `#EXTINF` line, fixed at first insertion
    pub metadata_line: String,
    /// Playback URLs in insertion order, de-duplicated
    pub urls: Vec<String>,
    /// Group label, fixed at first insertion
    pub group: String,
}

/// An accepted metadata/URL pair from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Alias-resolved name, the de-duplication key
    pub name: String,
    /// Name as extracted from the metadata line
    pub raw_name: String,
    pub metadata_line: String,
    pub url: String,
    pub group: String,
}

/// A metadata line without a usable URL line after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingUrl {
    /// 1-based line number of the metadata line
    pub line_number: usize,
    pub raw_name: String,
}

/// Everything parsed from one source, before merging
///
/// Batches are built independently (possibly concurrently) and folded into
/// the channel store one at a time, in source declaration order.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub label: String,
    pub primary: bool,
    /// First `#EXTM3U` line seen in the source, if any
    pub header: Option<String>,
    pub entries: Vec<ParsedEntry>,
    pub blocked: usize,
    pub filtered: usize,
    pub missing_urls: Vec<MissingUrl>,
    /// Content was plain `name,url` text and was converted first
    pub converted_from_txt: bool,
    pub line_count: usize,
}

/// Counters accumulated while parsing and merging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub added: usize,
    pub appended: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub blocked: usize,
    pub filtered: usize,
    pub missing_urls: usize,
}

impl MergeStats {
    pub fn accumulate(&mut self, other: &MergeStats) {
        self.added += other.added;
        self.appended += other.appended;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
        self.blocked += other.blocked;
        self.filtered += other.filtered;
        self.missing_urls += other.missing_urls;
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added={} appended={} duplicates={} skipped={} blocked={} filtered={} missing_urls={}",
            self.added,
            self.appended,
            self.duplicates,
            self.skipped,
            self.blocked,
            self.filtered,
            self.missing_urls
        )
    }
}

/// Result of loading one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Loaded { stats: MergeStats },
    Failed { kind: SourceErrorKind, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub label: String,
    pub primary: bool,
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, SourceStatus::Loaded { .. })
    }
}

/// What a merge run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub sources: Vec<SourceReport>,
    pub stats: MergeStats,
    /// Emitted channels per group, in output order
    pub group_counts: IndexMap<String, usize>,
    pub total_channels: usize,
    pub total_urls: usize,
    pub custom_channels: usize,
    pub output_path: PathBuf,
    pub debug_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn succeeded_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.is_success()).count()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.len() - self.succeeded_sources()
    }
}
