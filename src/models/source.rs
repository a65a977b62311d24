// src/models/source.rs

//! News source descriptors.

use serde::{Deserialize, Serialize};

use crate::models::SourceSelectors;

/// Static description of one news source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Unique identifier (also used for the `ENABLE_<ID>` override)
    pub id: String,

    /// Display name shown in the digest
    pub name: String,

    /// Listing pages, tried in order
    pub urls: Vec<String>,

    /// Prefix for relative links
    pub base_url: String,

    /// Whether the source takes part in a run
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Mandatory sources are fetched even when disabled
    #[serde(default)]
    pub mandatory: bool,

    /// Maximum number of items taken from this source per run
    #[serde(default = "default_quota")]
    pub quota: usize,

    /// Maximum number of items taken from a single page
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// CSS selectors for the listing markup
    #[serde(default)]
    pub selectors: SourceSelectors,
}

fn default_true() -> bool {
    true
}

fn default_quota() -> usize {
    5
}

fn default_page_limit() -> usize {
    10
}

impl SourceDescriptor {
    /// Whether this source takes part in a pipeline run.
    pub fn is_active(&self) -> bool {
        self.enabled || self.mandatory
    }
}
