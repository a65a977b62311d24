// src/utils/url.rs

//! URL manipulation utilities.

/// Turn a scraped `href` into an absolute link.
///
/// Links already starting with `http` are kept; anything else is prefixed with
/// the source's base URL.
///
/// # Examples
/// ```
/// use telecom_digest::utils::url::resolve_link;
///
/// assert_eq!(
///     resolve_link("https://example.com", "news/1.html"),
///     "https://example.com/news/1.html"
/// );
/// ```
pub fn resolve_link(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    // Already absolute
    if href.starts_with("http") {
        return href.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}
