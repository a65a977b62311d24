//! Service layer for the digest bot.
//!
//! This module contains the business logic for:
//! - Source extraction (`SourceExtractor`)
//! - Concurrent fan-out/fan-in over sources (`Aggregator`)
//! - Deduplication and bounded selection (`selection`)
//! - Digest rendering (`formatter`)
//! - Paced multi-recipient delivery (`Dispatcher`)
//! - Inbound command routing (`CommandRouter`)

mod aggregator;
pub mod commands;
mod dispatcher;
mod extractor;
pub mod formatter;
pub mod selection;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewsItem, SourceDescriptor};

pub use aggregator::{AggregateOutcome, Aggregator, SourceSummary};
pub use commands::{CommandRouter, Route};
pub use dispatcher::Dispatcher;
pub use extractor::SourceExtractor;
pub use formatter::format_digest;
pub use selection::select;

/// Result of one source run: the extracted items or the reason it failed.
pub type FetchOutcome = Result<Vec<NewsItem>>;

/// A source of news items that can be fetched concurrently with others.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Static description of this source.
    fn descriptor(&self) -> &SourceDescriptor;

    /// Fetch and extract items. Failures are returned, never panicked.
    async fn fetch(&self) -> FetchOutcome;
}
