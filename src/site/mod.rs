//! Site module - maps URL paths to render contexts
//!
//! A [`Site`] is the in-memory view of a loaded blog: the configuration, every
//! post and the tags collected from them. Both the generator and the dev
//! server ask it for the [`RenderContext`] of a path.

use crate::config::SiteConfig;
use crate::content::ContentLoader;
use crate::error::Result;
use crate::helpers::{decode_segment, post_path, tag_index_path, tag_path};
use crate::model::{PostSet, RenderContext, TagInfo};
use crate::Blog;

/// A page of the site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Listing,
    /// `/<post_dir>/<slug>/`
    Post(String),
    /// `/<tag_dir>/`
    TagIndex,
    /// `/<tag_dir>/<tag>/`, holding the decoded tag segment
    Tag(String),
}

impl Route {
    /// Parse a request path.
    ///
    /// The configured `root` prefix, trailing slashes and a trailing
    /// `index.html` are all optional. Returns `None` for paths that do not
    /// match any route shape.
    pub fn parse(config: &SiteConfig, path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let root = config.root.trim_matches('/');
        let mut rest = path.trim_start_matches('/');
        if !root.is_empty() {
            if let Some(stripped) = rest.strip_prefix(root) {
                if stripped.is_empty() || stripped.starts_with('/') {
                    rest = stripped;
                }
            }
        }

        let rest = rest.trim_matches('/');
        let rest = if rest == "index.html" {
            ""
        } else {
            rest.strip_suffix("/index.html").unwrap_or(rest)
        };
        let rest = rest.trim_end_matches('/');

        if rest.is_empty() {
            return Some(Route::Listing);
        }

        let tag_dir = config.tag_dir.trim_matches('/');
        if rest == tag_dir {
            return Some(Route::TagIndex);
        }
        if let Some(segment) = single_segment(rest, tag_dir) {
            return Some(Route::Tag(decode_segment(segment)));
        }

        let post_dir = config.post_dir.trim_matches('/');
        if let Some(segment) = single_segment(rest, post_dir) {
            return Some(Route::Post(decode_segment(segment)));
        }

        None
    }

    /// Canonical site path of the route, before `root` is applied
    pub fn path(&self, config: &SiteConfig) -> String {
        match self {
            Route::Listing => "/".to_string(),
            Route::Post(slug) => post_path(config, slug),
            Route::TagIndex => tag_index_path(config),
            Route::Tag(name) => tag_path(config, name),
        }
    }
}

/// The segment after `<dir>/` if it is the last one
fn single_segment<'a>(rest: &'a str, dir: &str) -> Option<&'a str> {
    if dir.is_empty() {
        return None;
    }
    let segment = rest.strip_prefix(dir)?.strip_prefix('/')?;
    if segment.is_empty() || segment.contains('/') {
        None
    } else {
        Some(segment)
    }
}

/// A loaded site
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    posts: PostSet,
    tags: Vec<TagInfo>,
}

impl Site {
    /// Build a site from already loaded posts
    pub fn new(config: SiteConfig, posts: PostSet) -> Self {
        let tags = posts.tags();
        Self {
            config,
            posts,
            tags,
        }
    }

    /// Load every post of a blog
    pub fn load(blog: &Blog) -> Result<Self> {
        let posts = ContentLoader::new(blog).load_posts()?;
        tracing::info!("Loaded {} posts", posts.len());
        Ok(Self::new(blog.config.clone(), posts))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn posts(&self) -> &PostSet {
        &self.posts
    }

    /// Tags in order of first appearance
    pub fn tags(&self) -> &[TagInfo] {
        &self.tags
    }

    /// Find a tag by its name or the slug of its name
    pub fn find_tag(&self, name: &str) -> Option<&TagInfo> {
        self.tags
            .iter()
            .find(|t| t.name() == name)
            .or_else(|| self.tags.iter().find(|t| t.slug() == name))
    }

    /// Every page of the site: listing, tag index, posts, then tags
    pub fn routes(&self) -> Vec<Route> {
        let mut routes = vec![Route::Listing, Route::TagIndex];
        routes.extend(self.posts.iter().map(|p| Route::Post(p.slug().to_string())));
        routes.extend(self.tags.iter().map(|t| Route::Tag(t.name().to_string())));
        routes
    }

    /// Context for a request path; `None` when nothing lives there
    pub fn context_for(&self, path: &str) -> Option<RenderContext> {
        let route = Route::parse(&self.config, path)?;
        self.context_for_route(&route)
    }

    /// Context for a route; `None` for unknown slugs and tags
    pub fn context_for_route(&self, route: &Route) -> Option<RenderContext> {
        let context = match route {
            Route::Listing => RenderContext::new(self.config.title.clone(), route.path(&self.config))
                .with_posts(self.posts.to_vec()),
            Route::Post(slug) => {
                let post = self.posts.get(slug)?;
                RenderContext::new(post.title(), route.path(&self.config)).with_post(post.clone())
            }
            Route::TagIndex => RenderContext::new("Tags", route.path(&self.config))
                .with_tags(self.tags.clone()),
            Route::Tag(name) => {
                let tag = self.find_tag(name)?;
                let canonical = Route::Tag(tag.name().to_string());
                RenderContext::new(format!("Tag: {}", tag.name()), canonical.path(&self.config))
                    .with_active_tag(tag.name())
                    .with_posts(tag.posts().to_vec())
                    .with_tags(self.tags.clone())
            }
        };
        Some(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageKind, Post, PostMeta};

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        let meta = PostMeta::new(slug.to_uppercase(), date, slug).with_tags(tags.to_vec());
        Post::from_meta(meta, format!("<p>{}</p>", slug))
    }

    fn sample_site(config: SiteConfig) -> Site {
        let mut posts = PostSet::from_posts(vec![
            post("a", "2024-01-01", &["go", "C++"]),
            post("b", "2024-02-01", &["go"]),
            post("c", "2024-03-01", &["rust"]),
        ])
        .unwrap();
        posts.sort_newest_first();
        Site::new(config, posts)
    }

    #[test]
    fn test_route_parse() {
        let config = SiteConfig::default();
        assert_eq!(Route::parse(&config, "/"), Some(Route::Listing));
        assert_eq!(Route::parse(&config, ""), Some(Route::Listing));
        assert_eq!(Route::parse(&config, "/index.html"), Some(Route::Listing));
        assert_eq!(Route::parse(&config, "/tags"), Some(Route::TagIndex));
        assert_eq!(Route::parse(&config, "/tags/"), Some(Route::TagIndex));
        assert_eq!(
            Route::parse(&config, "/tags/go"),
            Some(Route::Tag("go".to_string()))
        );
        assert_eq!(
            Route::parse(&config, "/tags/c%2B%2B/index.html"),
            Some(Route::Tag("c++".to_string()))
        );
        assert_eq!(
            Route::parse(&config, "/posts/hello/?ref=home"),
            Some(Route::Post("hello".to_string()))
        );
        assert_eq!(
            Route::parse(&config, "/posts/fooindex.html"),
            Some(Route::Post("fooindex.html".to_string()))
        );
        assert_eq!(
            Route::parse(&config, "/tags/index.html"),
            Some(Route::TagIndex)
        );
        assert_eq!(Route::parse(&config, "/posts/"), None);
        assert_eq!(Route::parse(&config, "/posts/a/b/"), None);
        assert_eq!(Route::parse(&config, "/about/"), None);
    }

    #[test]
    fn test_route_parse_with_root() {
        let config = SiteConfig {
            root: "/blog/".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(Route::parse(&config, "/blog/"), Some(Route::Listing));
        assert_eq!(
            Route::parse(&config, "/blog/posts/x/"),
            Some(Route::Post("x".to_string()))
        );
        assert_eq!(
            Route::parse(&config, "/posts/x/"),
            Some(Route::Post("x".to_string()))
        );
    }

    #[test]
    fn test_route_path() {
        let config = SiteConfig::default();
        assert_eq!(Route::Listing.path(&config), "/");
        assert_eq!(Route::TagIndex.path(&config), "/tags/");
        assert_eq!(Route::Post("a".into()).path(&config), "/posts/a/");
        assert_eq!(Route::Tag("C++".into()).path(&config), "/tags/C%2B%2B/");
    }

    #[test]
    fn test_tag_detail_context() {
        let site = sample_site(SiteConfig::default());
        let ctx = site.context_for("/tags/go").unwrap();

        assert_eq!(ctx.page_kind(), PageKind::TagDetail);
        assert_eq!(ctx.title, "Tag: go");
        assert_eq!(ctx.active_tag.as_deref(), Some("go"));
        assert_eq!(ctx.path, "/tags/go/");

        let slugs: Vec<_> = ctx.posts().iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert!(ctx.posts().iter().all(|p| p.has_tag("go")));
        assert_eq!(ctx.tags().len(), 3);
    }

    #[test]
    fn test_tag_lookup_by_slug() {
        let site = sample_site(SiteConfig::default());
        let ctx = site.context_for("/tags/c/").unwrap();
        assert_eq!(ctx.active_tag.as_deref(), Some("C++"));
        assert_eq!(ctx.path, "/tags/C%2B%2B/");
    }

    #[test]
    fn test_listing_and_index_contexts() {
        let site = sample_site(SiteConfig::default());

        let listing = site.context_for("/").unwrap();
        assert_eq!(listing.page_kind(), PageKind::Listing);
        assert_eq!(listing.title, "My Blog");
        assert_eq!(listing.posts().len(), 3);

        let index = site.context_for("/tags/index.html").unwrap();
        assert_eq!(index.page_kind(), PageKind::TagIndex);
        assert_eq!(index.title, "Tags");
        assert_eq!(index.path, "/tags/");
        assert_eq!(index.tags()[0].name(), "rust");
    }

    #[test]
    fn test_detail_context() {
        let site = sample_site(SiteConfig::default());
        let ctx = site.context_for("/posts/b").unwrap();
        assert_eq!(ctx.page_kind(), PageKind::Detail);
        assert_eq!(ctx.title, "B");
        assert_eq!(ctx.path, "/posts/b/");
    }

    #[test]
    fn test_unknown_paths() {
        let site = sample_site(SiteConfig::default());
        assert!(site.context_for("/posts/missing/").is_none());
        assert!(site.context_for("/tags/python/").is_none());
        assert!(site.context_for("/nowhere/").is_none());
    }

    #[test]
    fn test_routes_cover_every_page() {
        let site = sample_site(SiteConfig::default());
        let routes = site.routes();
        assert_eq!(routes.len(), 2 + 3 + 3);
        assert!(routes
            .iter()
            .all(|route| site.context_for_route(route).is_some()));
    }
}
