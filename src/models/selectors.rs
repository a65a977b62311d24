// src/models/selectors.rs

//! CSS selectors for scraping a news listing page.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping a news listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceSelectors {
    /// Selector for each row/item in the news list
    pub row_selector: String,

    /// Selector for the title (and link) element within a row
    #[serde(default = "default_title_selector")]
    pub title_selector: String,

    /// Selector for the date element within a row; today's date is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_selector: Option<String>,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_attr_name")]
    pub attr_name: String,
}

fn default_title_selector() -> String {
    "a".to_string()
}

fn default_attr_name() -> String {
    "href".to_string()
}

impl Default for SourceSelectors {
    fn default() -> Self {
        Self::fallback()
    }
}

impl SourceSelectors {
    /// Create selectors from a row selector and an optional date selector.
    pub fn from_pattern(row: impl Into<String>, date: Option<&str>) -> Self {
        Self {
            row_selector: row.into(),
            title_selector: default_title_selector(),
            date_selector: date.map(str::to_string),
            attr_name: default_attr_name(),
        }
    }

    /// Generic selectors that match the common news-list markup.
    pub fn fallback() -> Self {
        Self::from_pattern(
            "div.news_list li, ul.news-list li, div.article-list li",
            Some("span.date, .time, .date-text, span"),
        )
    }
}
