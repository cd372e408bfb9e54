//! One merge run, start to finish
//!
//! Rules and sources are loaded once, sources are fetched and parsed
//! concurrently, and the resulting batches are folded into a single
//! [`ChannelStore`] in declaration order before the playlist is written.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Config, load_aliases, load_groups, load_sources};
use crate::errors::{MergeError, MergeResult};
use crate::ingestor::Ingestor;
use crate::models::{MergeStats, RunSummary, SourceReport, SourceStatus};
use crate::output::{PlaylistGenerator, debug_path, write_atomic};
use crate::rules::RuleSet;
use crate::sources::{HttpFetcher, SourceLoader, TextFetcher};
use crate::store::ChannelStore;

pub struct Merger {
    config: Config,
}

impl Merger {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run with the HTTP fetcher built from the configuration
    pub async fn run(&self) -> MergeResult<RunSummary> {
        let fetcher = HttpFetcher::new(&self.config.fetch_settings())?;
        self.run_with_fetcher(Arc::new(fetcher)).await
    }

    pub async fn run_with_fetcher(&self, fetcher: Arc<dyn TextFetcher>) -> MergeResult<RunSummary> {
        let started = Instant::now();
        let config = &self.config;

        let sources = load_sources(&config.sources_file)?;
        let groups = load_groups(&config.groups_file)?;
        let aliases = load_aliases(&config.alias_file)?;
        let rules = Arc::new(RuleSet::new(aliases, groups.group_rules(), groups.block_list()));
        info!(
            "Rules: {} aliases, {} groups, {} blocklist patterns",
            rules.aliases.len(),
            rules.groups.len(),
            rules.blocklist.len()
        );
        if rules.groups.is_empty() {
            warn!("No group rules, every channel goes to '{}'", config.default_group);
        }

        let ingestor = Ingestor::new(rules.clone(), config.parse_options());
        let loader = SourceLoader::new(fetcher, ingestor, config.max_concurrent_fetches);
        let loaded = loader.load_all(sources.descriptors).await;

        let mut store = ChannelStore::new(config.keep_multiple_urls, config.url_matcher());
        let mut stats = MergeStats::default();
        let mut reports = Vec::with_capacity(loaded.len() + sources.rejected.len());

        for source in loaded {
            let label = source.descriptor.label();
            let status = match source.result {
                Ok(batch) => {
                    if let Some(header) = &batch.header {
                        debug!("[{}] header: {}", label, header);
                    }
                    let batch_stats = store.absorb(&batch);
                    info!("Merged {}: {}", label, batch_stats);
                    stats.accumulate(&batch_stats);
                    SourceStatus::Loaded { stats: batch_stats }
                }
                Err(e) => SourceStatus::Failed {
                    kind: e.kind(),
                    error: e.to_string(),
                },
            };
            reports.push(SourceReport {
                label,
                primary: source.descriptor.primary,
                status,
            });
        }

        for (label, error) in sources.rejected {
            reports.push(SourceReport {
                label,
                primary: false,
                status: SourceStatus::Failed {
                    kind: error.kind(),
                    error: error.to_string(),
                },
            });
        }

        let succeeded = reports.iter().filter(|r| r.is_success()).count();
        if succeeded == 0 {
            return Err(MergeError::NoSourcesSucceeded {
                failed: reports.len(),
            });
        }
        if store.is_empty() {
            return Err(MergeError::EmptyResult { sources: succeeded });
        }

        let generator = PlaylistGenerator::new(
            config.header_line(),
            rules.groups.group_order(),
            config.default_group.clone(),
            config.keep_multiple_urls,
        );
        let rendered = generator.render(&store, &groups.customchannels);

        write_atomic(&config.output_file, &rendered.content)?;
        info!("Wrote {}", config.output_file.display());

        let debug_file = if config.generate_debug_file {
            let path = debug_path(&config.output_file);
            write_atomic(&path, &rendered.content)?;
            info!("Wrote debug copy {}", path.display());
            Some(path)
        } else {
            None
        };

        let summary = RunSummary {
            sources: reports,
            stats,
            group_counts: rendered.group_counts,
            total_channels: rendered.channel_count,
            total_urls: rendered.url_count,
            custom_channels: rendered.custom_count,
            output_path: config.output_file.clone(),
            debug_path: debug_file,
        };

        log_summary(&summary);
        info!("Merge finished in {:?}", started.elapsed());
        Ok(summary)
    }
}

/// Log the end-of-run report
pub fn log_summary(summary: &RunSummary) {
    info!(
        "Sources: {} succeeded, {} failed",
        summary.succeeded_sources(),
        summary.failed_sources()
    );
    for report in &summary.sources {
        match &report.status {
            SourceStatus::Loaded { stats } => info!("  OK   {} ({})", report.label, stats),
            SourceStatus::Failed { kind, error } => {
                warn!("  FAIL {} [{:?}] {}", report.label, kind, error)
            }
        }
    }

    for (group, count) in &summary.group_counts {
        info!("  {}: {}", group, count);
    }

    info!(
        "{} channels, {} URLs, {} custom channels -> {}",
        summary.total_channels,
        summary.total_urls,
        summary.custom_channels,
        summary.output_path.display()
    );
    info!("Totals: {}", summary.stats);
}
