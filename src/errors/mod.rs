//! Centralized error handling for the merger
//!
//! # Error Categories
//!
//! - **Configuration Errors**: missing or malformed config and rule files (fatal)
//! - **Source Errors**: per-source fetch and read failures (recorded, never fatal)
//! - **Merge Errors**: run-level failures such as no usable source or an empty result
//!
//! # Usage
//!
//! ```rust
//! use m3u_merge::errors::{ConfigError, ConfigResult};
//!
//! fn check_concurrency(value: usize) -> ConfigResult<usize> {
//!     if value == 0 {
//!         return Err(ConfigError::invalid("max_concurrent_fetches", "must be at least 1"));
//!     }
//!     Ok(value)
//! }
//! # assert!(check_concurrency(0).is_err());
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for run-level results
pub type MergeResult<T> = Result<T, MergeError>;

/// Convenience type alias for configuration results
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for per-source results
pub type SourceResult<T> = Result<T, SourceError>;
