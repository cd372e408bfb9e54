//! Source content abstraction

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::models::SourceLocation;

/// Produces the raw text of a source
///
/// The loader only depends on this trait, so tests can substitute canned
/// content for the network and filesystem.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, location: &SourceLocation) -> SourceResult<String>;
}
