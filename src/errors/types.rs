//! Error type definitions for the merger
//!
//! Configuration problems are fatal and abort a run before any source is
//! touched. Source problems are recorded per source and never escape the
//! ingestion boundary. Only the "nothing usable" outcomes and output failures
//! abort a run once ingestion has started.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by a merge run
#[derive(Error, Debug)]
pub enum MergeError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Every declared source failed, nothing to merge
    #[error("No source could be loaded ({failed} failed)")]
    NoSourcesSucceeded { failed: usize },

    /// Sources loaded but no channel survived aliasing, filtering and parsing
    #[error("No channels survived ingestion from {sources} source(s)")]
    EmptyResult { sources: usize },

    /// Writing the merged playlist failed
    #[error("Failed to write output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration and rule-file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required file does not exist
    #[error("Required file not found: {path}")]
    Missing { path: PathBuf },

    /// A file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be parsed
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value was parsed but is not usable
    #[error("Invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Per-source failures
///
/// These are caught at the source boundary, recorded in the run summary and
/// the source is excluded from the merge.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Request did not complete within the configured timeout
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Connection could not be established or the transfer broke off
    #[error("Connection failed: {url} - {message}")]
    Connection { url: String, message: String },

    /// Non-success HTTP status after all retries
    #[error("HTTP error: {status} - {url}")]
    HttpStatus { url: String, status: u16 },

    /// Local file could not be read
    #[error("Unreadable file: {path} - {message}")]
    Unreadable { path: String, message: String },

    /// Body or file was empty after trimming
    #[error("Empty content: {source_name}")]
    EmptyBody { source_name: String },

    /// Entry in the sources file is unusable
    #[error("Invalid source descriptor at index {index}: {message}")]
    InvalidDescriptor { index: usize, message: String },
}

/// Broad classification used in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Fetch,
    Parse,
}

impl ConfigError {
    /// Create an invalid-value error
    pub fn invalid<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn parse<P: Into<PathBuf>, M: ToString>(path: P, message: M) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl SourceError {
    /// Whether this failure came from the network or from the content
    pub fn kind(&self) -> SourceErrorKind {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::HttpStatus { .. } => {
                SourceErrorKind::Fetch
            }
            Self::Unreadable { .. } | Self::EmptyBody { .. } | Self::InvalidDescriptor { .. } => {
                SourceErrorKind::Parse
            }
        }
    }

    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::HttpStatus { status, .. } => RETRYABLE_STATUSES.contains(status),
            _ => false,
        }
    }
}

/// HTTP statuses worth another attempt
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503, 504];
