// src/crawl/pipeline.rs
// =============================================================================
// Wires the whole crawl together.
//
// For every seed:
//   LinkSource ──links──► Checker ──records──┐
//                                           ├──► merge ──► CrawlRun.records
//   (one pair per seed, all running at once) ┘
//
// The transport and the cancellation token are created by the caller and
// passed in; every stage gets its own clone of both.
// =============================================================================

use super::merge::merge;
use super::source::{LinkSource, SourceSummary};
use crate::checker::{normalize, Checker, StatusRecord};
use crate::config::CrawlConfig;
use crate::error::FetchError;
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How one seed went
#[derive(Debug)]
pub struct SeedOutcome {
    pub seed: String,
    pub result: Result<SourceSummary, FetchError>,
}

/// A crawl in progress
pub struct CrawlRun {
    /// Every status record from every seed; closes when the crawl is done
    pub records: mpsc::Receiver<StatusRecord>,
    /// Resolves to one outcome per seed, in the order the seeds were given
    pub seeds: JoinHandle<Vec<SeedOutcome>>,
}

/// Runs seeds through the source -> checker -> merge pipeline
pub struct Crawler {
    transport: Arc<dyn Transport>,
    config: CrawlConfig,
    cancel: CancellationToken,
}

impl Crawler {
    pub fn new(transport: Arc<dyn Transport>, config: CrawlConfig, cancel: CancellationToken) -> Self {
        Self {
            transport,
            config,
            cancel,
        }
    }

    /// Starts crawling `seeds`
    ///
    /// Seeds are shorthand-expanded first (`www.site.com` becomes
    /// `https://www.site.com/`). A failing seed never affects the others.
    pub fn run(&self, seeds: &[String]) -> CrawlRun {
        let capacity = self.config.channel_capacity;
        let checker = Checker::new(
            Arc::clone(&self.transport),
            self.config.concurrency,
            capacity,
            self.cancel.clone(),
        );

        info!(
            seeds = seeds.len(),
            concurrency = self.config.concurrency,
            max_depth = self.config.max_depth,
            "starting crawl"
        );

        let mut outputs = Vec::with_capacity(seeds.len());
        let mut sources = JoinSet::new();

        for (index, seed) in seeds.iter().enumerate() {
            let (link_tx, link_rx) = mpsc::channel(capacity.max(1));
            outputs.push(checker.spawn(link_rx));

            let source = LinkSource::new(
                Arc::clone(&self.transport),
                normalize("", seed),
                self.config.max_depth,
            );
            let cancel = self.cancel.clone();

            sources.spawn(async move {
                let result = source.run(link_tx, &cancel).await;
                if let Err(e) = &result {
                    warn!(seed = %source.seed(), error = %e, "seed skipped");
                }
                (
                    index,
                    SeedOutcome {
                        seed: source.seed().to_string(),
                        result,
                    },
                )
            });
        }

        let records = merge(outputs, capacity);

        let outcomes = tokio::spawn(async move {
            let mut outcomes = Vec::new();
            while let Some(joined) = sources.join_next().await {
                match joined {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) => error!(error = %e, "link source failed"),
                }
            }
            outcomes.sort_by_key(|(index, _)| *index);
            outcomes.into_iter().map(|(_, outcome)| outcome).collect()
        });

        CrawlRun {
            records,
            seeds: outcomes,
        }
    }
}
