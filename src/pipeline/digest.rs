// src/pipeline/digest.rs

//! Fetch → select → digest.

use crate::models::Digest;
use crate::services::{Aggregator, format_digest, select};

/// One full aggregation run producing a digest.
pub struct DigestPipeline {
    aggregator: Aggregator,
    count: usize,
}

impl DigestPipeline {
    pub fn new(aggregator: Aggregator, count: usize) -> Self {
        Self { aggregator, count }
    }

    /// Fetch every source and select at most `count` distinct items.
    pub async fn run(&self) -> Digest {
        log::info!("Fetching telecom news from {} sources...", self.aggregator.source_count());
        let outcome = self.aggregator.collect().await;
        let raw = outcome.items.len();
        let items = select(outcome.items, self.count);
        log::info!("Selected {} of {} fetched items", items.len(), raw);
        Digest::new(items)
    }

    /// Run the pipeline and render the digest as a message.
    pub async fn render(&self) -> String {
        format_digest(&self.run().await)
    }
}
