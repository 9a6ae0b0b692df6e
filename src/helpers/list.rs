//! List helper functions for generating tag lists, tag clouds and post lists

use super::html::escape_html;
use super::url::{post_path, tag_path, url_for};
use crate::config::SiteConfig;
use crate::model::{Post, TagInfo};

/// Generate a list of tags as HTML
///
/// Tags keep the order they are given in. The `active` tag gets an extra
/// `current` class.
pub fn list_tags(
    config: &SiteConfig,
    tags: &[TagInfo],
    show_count: bool,
    class: Option<&str>,
    active: Option<&str>,
) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let class = escape_html(class.unwrap_or("tag-list"));
    let mut html = format!(r#"<ul class="{}">"#, class);

    for tag in tags {
        let url = url_for(config, &tag_path(config, tag.name()));
        let current = if active == Some(tag.name()) {
            " current"
        } else {
            ""
        };

        html.push_str(&format!(
            r#"<li class="{}-item{}"><a class="{}-link" href="{}">{}</a>"#,
            class,
            current,
            class,
            escape_html(&url),
            escape_html(tag.name())
        ));

        if show_count {
            html.push_str(&format!(
                r#"<span class="{}-count">{}</span>"#,
                class,
                tag.count()
            ));
        }

        html.push_str("</li>");
    }

    html.push_str("</ul>");
    html
}

/// Generate a list of posts, newest first as given
pub fn list_posts(config: &SiteConfig, posts: &[Post], amount: Option<usize>) -> String {
    let mut html = r#"<ul class="post-list">"#.to_string();

    for post in posts.iter().take(amount.unwrap_or(usize::MAX)) {
        let url = url_for(config, &post_path(config, post.slug()));
        html.push_str(&format!(
            r#"<li class="post-list-item"><a class="post-list-link" href="{}">{}</a></li>"#,
            escape_html(&url),
            escape_html(post.title())
        ));
    }

    html.push_str("</ul>");
    html
}

/// Generate a tag cloud, font size scaled by post count
pub fn tagcloud(
    config: &SiteConfig,
    tags: &[TagInfo],
    min_font: f32,
    max_font: f32,
    unit: &str,
) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let min_count = tags.iter().map(TagInfo::count).min().unwrap_or(1) as f32;
    let max_count = tags.iter().map(TagInfo::count).max().unwrap_or(1) as f32;
    let count_range = (max_count - min_count).max(1.0);

    let mut html = r#"<div class="tagcloud">"#.to_string();

    let mut sorted: Vec<_> = tags.iter().collect();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));

    for tag in sorted {
        let url = url_for(config, &tag_path(config, tag.name()));
        let ratio = (tag.count() as f32 - min_count) / count_range;
        let size = min_font + ratio * (max_font - min_font);

        html.push_str(&format!(
            r#"<a href="{}" style="font-size: {:.2}{}">{}</a> "#,
            escape_html(&url),
            size,
            unit,
            escape_html(tag.name())
        ));
    }

    html.push_str("</div>");
    html
}
