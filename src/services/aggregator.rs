// src/services/aggregator.rs

//! Concurrent fan-out over all active sources.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;

use crate::error::{AppError, Result};
use crate::models::{Config, NewsItem};
use crate::services::{FetchOutcome, NewsSource, SourceExtractor};
use crate::utils::http::create_async_client;

/// Per-source result of an aggregation run.
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
    pub error: Option<String>,
}

/// Summary of an aggregation run.
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    /// Items from every successful source, in source-declaration order
    pub items: Vec<NewsItem>,
    pub sources: Vec<SourceSummary>,
}

impl AggregateOutcome {
    pub fn source_failures(&self) -> usize {
        self.sources.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Runs every source concurrently and merges their items.
pub struct Aggregator {
    sources: Vec<Arc<dyn NewsSource>>,
    source_timeout: Duration,
}

impl Aggregator {
    /// Create an aggregator over the given sources.
    pub fn new(sources: Vec<Arc<dyn NewsSource>>, source_timeout: Duration) -> Self {
        Self {
            sources,
            source_timeout,
        }
    }

    /// Build extractors for every active source in the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.http)?;
        let sources = config
            .active_sources()
            .into_iter()
            .map(|descriptor| {
                Arc::new(SourceExtractor::new(
                    descriptor,
                    config.cleaning.clone(),
                    client.clone(),
                )) as Arc<dyn NewsSource>
            })
            .collect();

        Ok(Self::new(
            sources,
            Duration::from_secs(config.http.source_timeout_secs),
        ))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Fetch all sources concurrently and wait for every one of them.
    ///
    /// Each source is bounded by its own timeout; a failed or timed-out source
    /// contributes no items and does not affect the others.
    pub async fn collect(&self) -> AggregateOutcome {
        let runs = self
            .sources
            .iter()
            .map(|source| self.run_source(source.as_ref()));
        let results = join_all(runs).await;

        let mut outcome = AggregateOutcome::default();
        for (source, result) in self.sources.iter().zip(results) {
            let descriptor = source.descriptor();
            let summary = match result {
                Ok(items) => {
                    log::info!("✓ {} - {} items", descriptor.name, items.len());
                    let item_count = items.len();
                    outcome.items.extend(items);
                    SourceSummary {
                        id: descriptor.id.clone(),
                        name: descriptor.name.clone(),
                        item_count,
                        error: None,
                    }
                }
                Err(error) => {
                    log::warn!("✗ {} - {}", descriptor.name, error);
                    SourceSummary {
                        id: descriptor.id.clone(),
                        name: descriptor.name.clone(),
                        item_count: 0,
                        error: Some(error.to_string()),
                    }
                }
            };
            outcome.sources.push(summary);
        }

        log::info!(
            "Collected {} items from {} sources ({} failed)",
            outcome.items.len(),
            outcome.sources.len(),
            outcome.source_failures()
        );
        outcome
    }

    async fn run_source(&self, source: &dyn NewsSource) -> FetchOutcome {
        match timeout(self.source_timeout, source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout {
                source_id: source.descriptor().id.clone(),
                secs: self.source_timeout.as_secs(),
            }),
        }
    }
}
