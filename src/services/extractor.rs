// src/services/extractor.rs

//! Per-source news extraction.
//!
//! Fetches the listing pages of one source and extracts items with the
//! source's CSS selectors.

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CleaningConfig, NewsItem, SourceDescriptor};
use crate::services::{FetchOutcome, NewsSource};
use crate::utils::http::fetch_text;
use crate::utils::{normalize_whitespace, resolve_link};

/// Extractor for a single configured source.
pub struct SourceExtractor {
    descriptor: SourceDescriptor,
    cleaning: CleaningConfig,
    client: Client,
}

impl SourceExtractor {
    /// Create an extractor sharing the given HTTP client.
    pub fn new(descriptor: SourceDescriptor, cleaning: CleaningConfig, client: Client) -> Self {
        Self {
            descriptor,
            cleaning,
            client,
        }
    }

    /// Fetch one listing page and extract its items.
    async fn fetch_page(&self, url: &str) -> Result<Vec<NewsItem>> {
        let html = fetch_text(&self.client, url)
            .await
            .map_err(|e| AppError::fetch(&self.descriptor.id, format!("{url}: {e}")))?;
        self.parse_listing(&html)
    }

    /// Extract items from a listing page, at most `page_limit` of them.
    pub fn parse_listing(&self, html: &str) -> Result<Vec<NewsItem>> {
        let document = Html::parse_document(html);
        let selectors = &self.descriptor.selectors;

        let row_sel = Self::parse_selector(&selectors.row_selector)?;
        let title_sel = Self::parse_selector(&selectors.title_selector)?;
        let date_sel = selectors
            .date_selector
            .as_deref()
            .map(Self::parse_selector)
            .transpose()?;

        let today = Local::now().format("%Y-%m-%d").to_string();
        let mut items = Vec::new();

        for row in document.select(&row_sel) {
            if items.len() >= self.descriptor.page_limit {
                break;
            }
            if let Some(item) = self.parse_row(&row, &title_sel, date_sel.as_ref(), &today) {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn parse_row(
        &self,
        row: &ElementRef,
        title_sel: &Selector,
        date_sel: Option<&Selector>,
        today: &str,
    ) -> Option<NewsItem> {
        let title_elem = row.select(title_sel).next();

        let raw_title: String = title_elem.map_or(String::new(), |el| el.text().collect());
        let mut title = self.cleaning.clean_title(&raw_title);
        if title.is_empty() {
            let all_text: String = row.select(title_sel).flat_map(|el| el.text()).collect();
            title = self.cleaning.clean_title(&all_text);
        }
        if !self.cleaning.accepts(&title) {
            return None;
        }

        let link = title_elem
            .and_then(|el| el.value().attr(&self.descriptor.selectors.attr_name))
            .map(|href| resolve_link(&self.descriptor.base_url, href))
            .unwrap_or_default();

        let date = date_sel
            .and_then(|sel| row.select(sel).next())
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| today.to_string());

        NewsItem::new(&title, link, date, &self.descriptor.name)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl NewsSource for SourceExtractor {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    /// Walk the source's URLs in order until the quota is met.
    ///
    /// A failing URL is logged and skipped. The outcome is an error only when
    /// every attempted URL failed.
    async fn fetch(&self) -> FetchOutcome {
        let quota = self.descriptor.quota;
        let mut items = Vec::new();
        let mut last_error = None;
        let mut fetched_any = false;

        for url in &self.descriptor.urls {
            if items.len() >= quota {
                break;
            }
            match self.fetch_page(url).await {
                Ok(page) => {
                    log::debug!("{} - {} items from {}", self.descriptor.name, page.len(), url);
                    fetched_any = true;
                    items.extend(page);
                }
                Err(error) => {
                    log::warn!("Failed to fetch {} ({}): {}", self.descriptor.name, url, error);
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(error) if !fetched_any => Err(error),
            _ => {
                items.truncate(quota);
                Ok(items)
            }
        }
    }
}
