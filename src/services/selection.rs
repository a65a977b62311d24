//! Cross-source deduplication and bounded selection.

use std::collections::HashSet;

use crate::models::NewsItem;
use crate::utils::truncate_chars;

/// Number of leading title characters that identify a story.
pub const DEDUP_KEY_CHARS: usize = 30;

/// Dedup key of a title: its first [`DEDUP_KEY_CHARS`] characters, case-sensitive.
pub fn dedup_key(title: &str) -> &str {
    truncate_chars(title.trim(), DEDUP_KEY_CHARS)
}

/// Drop items whose key was already seen, keeping first appearances in order.
pub fn dedup(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(dedup_key(item.title()).to_string()) {
            deduped.push(item);
        }
    }
    deduped
}

/// Deduplicate, then keep at most `count` items.
pub fn select(items: Vec<NewsItem>, count: usize) -> Vec<NewsItem> {
    let mut selected = dedup(items);
    selected.truncate(count);
    selected
}
