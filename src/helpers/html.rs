//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

use super::url::url_for;
use crate::config::SiteConfig;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Escape text for use in element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove markup and decode the entities produced by `escape_html`
pub fn strip_tags(html: &str) -> String {
    TAG_RE
        .replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Cut `text` to at most `length` characters, appending `omission` when
/// anything was dropped
pub fn truncate(text: &str, length: usize, omission: &str) -> String {
    match text.char_indices().nth(length) {
        Some((idx, _)) => format!("{}{}", &text[..idx], omission),
        None => text.to_string(),
    }
}

/// Generate a CSS link tag
///
/// # Examples
/// ```ignore
/// css(&config, "style.css") // -> <link rel="stylesheet" href="/blog/css/style.css">
/// ```
pub fn css(config: &SiteConfig, path: &str) -> String {
    let path = if is_external(path) {
        path.to_string()
    } else {
        let path = if path.ends_with(".css") {
            path.to_string()
        } else {
            format!("{}.css", path)
        };
        url_for(config, &format!("css/{}", path.trim_start_matches('/')))
    };

    format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(&path))
}

/// Generate an anchor tag; `text` is escaped
///
/// # Examples
/// ```ignore
/// link_to(&config, "/about/", "About", None) // -> <a href="/blog/about/">About</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str, class: Option<&str>) -> String {
    let href = if is_external(path) {
        path.to_string()
    } else {
        url_for(config, path)
    };

    let class_attr = class
        .map(|c| format!(r#" class="{}""#, escape_html(c)))
        .unwrap_or_default();

    if is_external(path) {
        format!(
            r#"<a{} href="{}" target="_blank" rel="noopener">{}</a>"#,
            class_attr,
            escape_html(&href),
            escape_html(text)
        )
    } else {
        format!(
            r#"<a{} href="{}">{}</a>"#,
            class_attr,
            escape_html(&href),
            escape_html(text)
        )
    }
}

/// Generate a meta tag
pub fn meta_tag(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        escape_html(name),
        escape_html(content)
    )
}

fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}
