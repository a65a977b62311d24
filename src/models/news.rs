//! News item and digest data structures.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::utils::{normalize_whitespace, truncate_chars};

/// Maximum number of characters kept from a title.
pub const MAX_TITLE_CHARS: usize = 100;

/// A single news entry extracted from a source.
///
/// The title is guaranteed to be trimmed and non-empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewsItem {
    title: String,
    link: String,
    published_label: String,
    source_name: String,
}

impl NewsItem {
    /// Build an item, normalising whitespace in the title and cutting it to
    /// [`MAX_TITLE_CHARS`]. Returns `None` for a blank title.
    pub fn new(
        title: &str,
        link: impl Into<String>,
        published_label: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Option<Self> {
        let title = normalize_whitespace(title);
        if title.is_empty() {
            return None;
        }

        Some(Self {
            title: truncate_chars(&title, MAX_TITLE_CHARS).trim_end().to_string(),
            link: link.into().trim().to_string(),
            published_label: published_label.into().trim().to_string(),
            source_name: source_name.into(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Absolute URL, or an empty string when the source gave none.
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn published_label(&self) -> &str {
        &self.published_label
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// The ordered selection of items for one delivery.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub items: Vec<NewsItem>,
    pub generated_at: DateTime<Local>,
}

impl Digest {
    /// Create a digest stamped with the current local time.
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self::at(items, Local::now())
    }

    /// Create a digest stamped with the given time.
    pub fn at(items: Vec<NewsItem>, generated_at: DateTime<Local>) -> Self {
        Self {
            items,
            generated_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_title() {
        let item = NewsItem::new("  工信部发布   通信业统计公报  ", "", "2024-01-01", "工信部")
            .unwrap();
        assert_eq!(item.title(), "工信部发布 通信业统计公报");
    }

    #[test]
    fn test_new_rejects_blank_title() {
        assert!(NewsItem::new("   \n\t", "", "", "src").is_none());
    }

    #[test]
    fn test_new_truncates_long_title() {
        let long = "电".repeat(150);
        let item = NewsItem::new(&long, "", "", "src").unwrap();
        assert_eq!(item.title().chars().count(), MAX_TITLE_CHARS);
    }
}
