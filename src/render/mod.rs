//! Page renderer - turns a `RenderContext` into a complete HTML document
//!
//! The layout is built in code: a shared page shell plus one body renderer
//! per [`PageKind`]. Everything taken from posts or configuration is escaped;
//! post bodies are inserted as rendered markup.

use crate::config::SiteConfig;
use crate::helpers::{
    escape_html, list_posts, list_tags, meta_tag, tag_index_path, tagcloud, time_tag, Helpers,
};
use crate::model::{PageKind, Post, RenderContext};

/// Script that reloads the page when the dev server says so
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
    var ws = new WebSocket(scheme + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
"#;

/// Renders pages for one site
#[derive(Debug, Clone)]
pub struct PageRenderer {
    helpers: Helpers,
    livereload: bool,
}

impl PageRenderer {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            helpers: Helpers::new(config),
            livereload: false,
        }
    }

    /// Inject the live reload client into every page
    pub fn with_livereload(mut self, enable: bool) -> Self {
        self.livereload = enable;
        self
    }

    fn config(&self) -> &SiteConfig {
        self.helpers.config()
    }

    /// Render a full page
    pub fn render(&self, ctx: &RenderContext) -> String {
        let main = match ctx.page_kind() {
            PageKind::Detail => match &ctx.post {
                Some(post) => self.render_post(post),
                None => String::new(),
            },
            PageKind::TagDetail => self.render_tag(ctx),
            PageKind::TagIndex => self.render_tag_index(ctx),
            PageKind::Listing => self.render_listing(ctx),
            PageKind::Plain => format!("<h1>{}</h1>", escape_html(&ctx.title)),
        };

        self.layout(&ctx.title, Some(&ctx.path), main_class(ctx.page_kind()), &main)
    }

    /// Render the page served for unknown paths
    pub fn render_not_found(&self, path: &str) -> String {
        let main = format!(
            r#"<h1>Page not found</h1><p>Nothing lives at <code>{}</code>.</p><p>{}</p>"#,
            escape_html(path),
            self.helpers.link_to("/", "Back to home", None)
        );
        self.layout("Page not found", None, "not-found", &main)
    }

    fn layout(&self, title: &str, path: Option<&str>, class: &str, main: &str) -> String {
        let config = self.config();
        let page_title = if title == config.title {
            escape_html(title)
        } else {
            format!("{} | {}", escape_html(title), escape_html(&config.title))
        };

        let mut html = String::with_capacity(main.len() + 1024);
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!(r#"<html lang="{}">"#, escape_html(&config.language)));
        html.push_str("<head>");
        html.push_str(r#"<meta charset="utf-8">"#);
        html.push_str(&meta_tag("viewport", "width=device-width, initial-scale=1"));
        if !config.description.is_empty() {
            html.push_str(&meta_tag("description", &config.description));
        }
        html.push_str(&meta_tag("author", &config.author));
        html.push_str(&format!("<title>{}</title>", page_title));
        if let Some(path) = path.filter(|_| !config.url.is_empty()) {
            html.push_str(&format!(
                r#"<link rel="canonical" href="{}">"#,
                escape_html(&self.helpers.full_url_for(path))
            ));
        }
        html.push_str(&self.helpers.css("style"));
        html.push_str("</head>");

        html.push_str("<body>");
        html.push_str(r#"<header class="site-header">"#);
        html.push_str(&self.helpers.link_to("/", &config.title, Some("site-title")));
        if !config.subtitle.is_empty() {
            html.push_str(&format!(
                r#"<p class="site-subtitle">{}</p>"#,
                escape_html(&config.subtitle)
            ));
        }
        html.push_str(r#"<nav class="site-nav">"#);
        html.push_str(&self.helpers.link_to("/", "Home", None));
        html.push_str(&self.helpers.link_to(&tag_index_path(config), "Tags", None));
        html.push_str("</nav></header>");

        html.push_str(&format!(r#"<main class="{}">"#, class));
        html.push_str(main);
        html.push_str("</main>");

        html.push_str(&format!(
            r#"<footer class="site-footer">&copy; {}</footer>"#,
            escape_html(&config.author)
        ));
        if self.livereload {
            html.push_str(LIVE_RELOAD_SCRIPT);
        }
        html.push_str("</body></html>\n");
        html
    }

    fn render_post(&self, post: &Post) -> String {
        let mut html = String::from(r#"<article class="post">"#);
        html.push_str(&format!(
            r#"<h1 class="post-title">{}</h1>"#,
            escape_html(post.title())
        ));
        html.push_str(&self.post_meta(post));
        html.push_str(&self.post_details(post));
        html.push_str(r#"<div class="post-content">"#);
        html.push_str(&post.body_html());
        html.push_str("</div>");
        html.push_str(&self.post_tags(post));
        html.push_str("</article>");
        html
    }

    fn render_listing(&self, ctx: &RenderContext) -> String {
        if ctx.posts().is_empty() {
            return r#"<p class="empty">No posts yet.</p>"#.to_string();
        }
        ctx.posts().iter().map(|p| self.post_summary(p)).collect()
    }

    fn render_tag_index(&self, ctx: &RenderContext) -> String {
        let mut html = format!("<h1>{}</h1>", escape_html(&ctx.title));
        if ctx.tags().is_empty() {
            html.push_str(r#"<p class="empty">No tags yet.</p>"#);
            return html;
        }
        html.push_str(&tagcloud(self.config(), ctx.tags(), 12.0, 30.0, "px"));
        html.push_str(&list_tags(self.config(), ctx.tags(), true, None, None));
        html
    }

    fn render_tag(&self, ctx: &RenderContext) -> String {
        let mut html = format!("<h1>{}</h1>", escape_html(&ctx.title));
        html.push_str(&list_posts(self.config(), ctx.posts(), None));
        html.push_str(r#"<aside class="tags">"#);
        html.push_str(&list_tags(
            self.config(),
            ctx.tags(),
            true,
            None,
            ctx.active_tag.as_deref(),
        ));
        html.push_str("</aside>");
        html
    }

    fn post_summary(&self, post: &Post) -> String {
        let mut html = String::from(r#"<article class="post-summary">"#);
        html.push_str(&format!(
            r#"<h2 class="post-title"><a href="{}">{}</a></h2>"#,
            escape_html(&self.helpers.post_url(post.slug())),
            escape_html(post.title())
        ));
        html.push_str(&self.post_meta(post));
        if let Some(excerpt) = &post.meta().excerpt {
            html.push_str(&format!(
                r#"<p class="post-excerpt">{}</p>"#,
                escape_html(excerpt)
            ));
        }
        html.push_str(&self.post_tags(post));
        html.push_str("</article>");
        html
    }

    fn post_meta(&self, post: &Post) -> String {
        let date = match post.meta().published_at() {
            Some(date) => time_tag(&date, post.display_date()),
            None => escape_html(post.display_date()),
        };
        format!(r#"<div class="post-meta">{}</div>"#, date)
    }

    /// Word count and last update, shown on the detail page only
    fn post_details(&self, post: &Post) -> String {
        let mut parts = Vec::new();
        if let Some(tree) = &post.content_tree {
            parts.push(format!(
                r#"<span class="post-words">{} words</span>"#,
                tree.word_count()
            ));
        }
        if let Some(modified) = post.meta().modified_at() {
            parts.push(format!(
                r#"<span class="post-updated">Updated {}</span>"#,
                time_tag(&modified, &self.helpers.date(&modified, None))
            ));
        }
        if parts.is_empty() {
            return String::new();
        }
        format!(r#"<div class="post-details">{}</div>"#, parts.join(" "))
    }

    fn post_tags(&self, post: &Post) -> String {
        if post.tags().is_empty() {
            return String::new();
        }
        let links: Vec<String> = post
            .tags()
            .iter()
            .map(|tag| {
                format!(
                    r#"<a class="post-tag" href="{}">#{}</a>"#,
                    escape_html(&self.helpers.tag_url(tag)),
                    escape_html(tag)
                )
            })
            .collect();
        format!(r#"<div class="post-tags">{}</div>"#, links.join(" "))
    }
}

fn main_class(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Detail => "post-detail",
        PageKind::TagDetail => "tag-detail",
        PageKind::TagIndex => "tag-index",
        PageKind::Listing => "post-listing",
        PageKind::Plain => "plain",
    }
}
