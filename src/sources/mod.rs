//! Source loading: local files and remote endpoints
//!
//! Every source is turned into an independent [`SourceBatch`] by
//! [`SourceLoader`]. Fetch and parse failures stay attached to the source that
//! caused them.
//!
//! [`SourceBatch`]: crate::models::SourceBatch

pub mod http;
pub mod loader;
pub mod local;
pub mod traits;

pub use http::{FetchSettings, HttpFetcher};
pub use loader::{LoadedSource, SourceLoader};
pub use traits::TextFetcher;
