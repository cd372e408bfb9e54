//! Concurrent source loading
//!
//! Sources are fetched and parsed concurrently, up to a fixed limit, but
//! results come back in declaration order so the merge is deterministic.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::traits::TextFetcher;
use crate::errors::SourceResult;
use crate::ingestor::Ingestor;
use crate::models::{SourceBatch, SourceDescriptor};

/// Outcome of loading one source
#[derive(Debug)]
pub struct LoadedSource {
    pub descriptor: SourceDescriptor,
    pub result: SourceResult<SourceBatch>,
}

pub struct SourceLoader {
    fetcher: Arc<dyn TextFetcher>,
    ingestor: Ingestor,
    max_concurrent: usize,
}

impl SourceLoader {
    pub fn new(fetcher: Arc<dyn TextFetcher>, ingestor: Ingestor, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            ingestor,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Load every source; failures are returned, never raised
    pub async fn load_all(&self, descriptors: Vec<SourceDescriptor>) -> Vec<LoadedSource> {
        info!(
            "Loading {} sources (up to {} at a time)",
            descriptors.len(),
            self.max_concurrent
        );

        stream::iter(descriptors)
            .map(|descriptor| self.load_one(descriptor))
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    async fn load_one(&self, descriptor: SourceDescriptor) -> LoadedSource {
        let started = Instant::now();
        let label = descriptor.label();

        if !descriptor.is_remote() {
            debug!("Reading local source {}", label);
        }

        let result = match self.fetcher.fetch_text(&descriptor.location).await {
            Ok(content) => self.ingestor.ingest(&descriptor, &content),
            Err(e) => Err(e),
        };

        match &result {
            Ok(batch) if batch.converted_from_txt => info!(
                "Loaded {} ({} entries from {} text lines) in {:?}",
                label,
                batch.entries.len(),
                batch.line_count,
                started.elapsed()
            ),
            Ok(batch) => info!(
                "Loaded {} ({} entries, {} lines) in {:?}",
                label,
                batch.entries.len(),
                batch.line_count,
                started.elapsed()
            ),
            Err(e) => warn!("Source {} failed: {}", label, e),
        }

        LoadedSource { descriptor, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use crate::ingestor::ParseOptions;
    use crate::models::SourceLocation;
    use crate::rules::RuleSet;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned content, slower for earlier sources
    struct CannedFetcher {
        bodies: HashMap<String, (u64, String)>,
    }

    #[async_trait]
    impl TextFetcher for CannedFetcher {
        async fn fetch_text(&self, location: &SourceLocation) -> SourceResult<String> {
            let SourceLocation::Remote(url) = location else {
                return Err(SourceError::Unreadable {
                    path: format!("{location:?}"),
                    message: "local sources not supported".to_string(),
                });
            };
            match self.bodies.get(url) {
                Some((delay_ms, body)) => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    Ok(body.clone())
                }
                None => Err(SourceError::HttpStatus {
                    url: url.clone(),
                    status: 404,
                }),
            }
        }
    }

    fn loader(bodies: &[(&str, u64, &str)], max_concurrent: usize) -> SourceLoader {
        let fetcher = CannedFetcher {
            bodies: bodies
                .iter()
                .map(|(url, delay, body)| (url.to_string(), (*delay, body.to_string())))
                .collect(),
        };
        let ingestor = Ingestor::new(Arc::new(RuleSet::default()), ParseOptions::default());
        SourceLoader::new(Arc::new(fetcher), ingestor, max_concurrent)
    }

    #[tokio::test]
    async fn test_results_keep_declaration_order() {
        let loader = loader(
            &[
                ("http://slow", 80, "#EXTM3U\n#EXTINF:-1,Slow\nhttp://s\n"),
                ("http://fast", 0, "#EXTM3U\n#EXTINF:-1,Fast\nhttp://f\n"),
            ],
            4,
        );

        let loaded = loader
            .load_all(vec![
                SourceDescriptor::remote("http://slow", true, vec![]),
                SourceDescriptor::remote("http://fast", true, vec![]),
            ])
            .await;

        let names: Vec<_> = loaded
            .iter()
            .map(|l| l.result.as_ref().unwrap().entries[0].name.clone())
            .collect();
        assert_eq!(names, vec!["Slow", "Fast"]);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let loader = loader(&[("http://ok", 0, "A,http://a\n")], 1);

        let loaded = loader
            .load_all(vec![
                SourceDescriptor::remote("http://missing", false, vec![]),
                SourceDescriptor::remote("http://ok", false, vec![]),
                SourceDescriptor::local("local.m3u"),
            ])
            .await;

        assert_eq!(loaded.len(), 3);
        assert!(matches!(
            loaded[0].result,
            Err(SourceError::HttpStatus { status: 404, .. })
        ));
        assert!(loaded[1].result.is_ok());
        assert!(loaded[2].result.is_err());
    }
}
