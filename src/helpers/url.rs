//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped in a single path segment (everything but RFC 3986 unreserved)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Site path of a post detail page, before the root is applied
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    format!("/{}/{}/", config.post_dir.trim_matches('/'), encode_segment(slug))
}

/// Site path of a tag detail page; the tag name is percent-encoded
pub fn tag_path(config: &SiteConfig, tag: &str) -> String {
    format!("/{}/{}/", config.tag_dir.trim_matches('/'), encode_segment(tag))
}

/// Site path of the tag index
pub fn tag_index_path(config: &SiteConfig) -> String {
    format!("/{}/", config.tag_dir.trim_matches('/'))
}

/// Percent-encode one path segment.
///
/// `.` and `..` are encoded as well, since they are path navigation and not
/// names.
pub fn encode_segment(segment: &str) -> String {
    match segment {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => utf8_percent_encode(segment, SEGMENT).to_string(),
    }
}

/// Decode a percent-encoded path segment, keeping it as-is if it is not valid UTF-8
pub fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
