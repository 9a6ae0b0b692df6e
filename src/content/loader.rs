//! Content loader - loads posts from the content directory

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer};
use crate::error::{Error, Result};
use crate::helpers::{format_date, normalize_date, truncate};
use crate::model::{Outcome, Post, PostMeta, PostSet};
use crate::Blog;

/// What happened to one source file
#[derive(Debug, Serialize)]
pub struct SourceReport {
    /// Path relative to the content directory
    pub source: String,
    pub outcome: Outcome<Post>,
}

/// Loads posts from `<content_dir>/<post_dir>`
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(blog.config.highlight.clone());
        Self { blog, renderer }
    }

    /// Load every post, skipping files that fail to load.
    ///
    /// Posts are sorted newest first. Two posts with the same slug are an
    /// error.
    pub fn load_posts(&self) -> Result<PostSet> {
        let mut posts = Vec::new();

        for report in self.load_each() {
            match report.outcome.into_result() {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {}: {}", report.source, e);
                }
            }
        }

        let mut set = PostSet::from_posts(posts)?;
        set.sort_newest_first();
        Ok(set)
    }

    /// Load every post file and report each outcome. Skipped drafts are not
    /// reported.
    pub fn load_each(&self) -> Vec<SourceReport> {
        let posts_dir = self.blog.posts_dir();
        if !posts_dir.exists() {
            tracing::debug!("No posts directory at {:?}", posts_dir);
            return Vec::new();
        }

        let mut reports = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let source = self.source_name(path);
            match self.load_post(path).transpose() {
                Some(result) => reports.push(SourceReport {
                    source,
                    outcome: result.into(),
                }),
                None => tracing::debug!("Skipping draft {}", source),
            }
        }

        reports
    }

    /// Load a single post from a file; `None` for a skipped draft
    pub fn load_post(&self, path: &Path) -> Result<Option<Post>> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t).naive_local());

        self.parse_post(&self.source_name(path), &raw, modified)
    }

    /// Build a post from the raw file text.
    ///
    /// `file_modified` stands in for the date when the front-matter has none.
    pub fn parse_post(
        &self,
        source: &str,
        raw: &str,
        file_modified: Option<NaiveDateTime>,
    ) -> Result<Option<Post>> {
        let config = &self.blog.config;

        let (fm, body) = FrontMatter::parse(raw, Path::new(source))?;

        if fm.is_draft() && !config.render_drafts {
            return Ok(None);
        }

        let stem = Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(stem)
            .to_string();

        let slug = fm.slug.clone().unwrap_or_else(|| slug::slugify(stem));

        let date = match fm.date.as_deref() {
            Some(date) => normalize_date(date).unwrap_or_else(|| {
                tracing::warn!("Unrecognized date {:?} in {}", date, source);
                date.trim().to_string()
            }),
            None => file_modified
                .unwrap_or_else(|| Local::now().naive_local())
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
        };

        let modified = fm
            .modified
            .as_deref()
            .map(|m| normalize_date(m).unwrap_or_else(|| m.trim().to_string()));

        let tags: Vec<String> = fm
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let (excerpt_md, full_body) = MarkdownRenderer::split_excerpt(body);
        let tree = self.renderer.render(&full_body);

        let excerpt = match (fm.excerpt.as_deref(), excerpt_md) {
            (Some(excerpt), _) => Some(excerpt.trim().to_string()),
            (None, Some(md)) => Some(collapse_whitespace(
                &self.renderer.render(md).text_content(),
            )),
            (None, None) if config.auto_excerpt > 0 => Some(truncate(
                &collapse_whitespace(&tree.text_content()),
                config.auto_excerpt,
                "…",
            )),
            (None, None) => None,
        }
        .filter(|e| !e.is_empty());

        let meta = PostMeta {
            title,
            date,
            slug,
            excerpt,
            tags: if fm.tags.is_empty() { None } else { Some(tags) },
            modified,
        };
        meta.validate()?;

        let formatted_date = meta
            .published_at()
            .map(|d| format_date(&d, &config.date_format));

        let mut post = Post::from_meta(meta, String::new()).with_tree(tree);
        post.formatted_date = formatted_date;

        Ok(Some(post))
    }

    fn source_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.blog.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::model::Body;

    fn blog_in(dir: &Path, config: SiteConfig) -> Blog {
        Blog::with_config(dir, config)
    }

    fn write_post(blog: &Blog, name: &str, content: &str) {
        let dir = blog.posts_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_parse_post_fields() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        let loader = ContentLoader::new(&blog);

        let raw = r#"---
title: Hello World
date: 2024-01-15
tags: [rust, " go ", ""]
updated: 2024-02-01 08:00
---

Intro paragraph.

<!-- more -->

# Details

More text.
"#;
        let post = loader
            .parse_post("posts/hello-world.md", raw, None)
            .unwrap()
            .unwrap();

        assert_eq!(post.title(), "Hello World");
        assert_eq!(post.slug(), "hello-world");
        assert_eq!(post.meta().date, "2024-01-15");
        assert_eq!(post.meta().modified.as_deref(), Some("2024-02-01T08:00:00"));
        assert_eq!(post.tags(), ["rust", "go"]);
        assert_eq!(post.meta().excerpt.as_deref(), Some("Intro paragraph."));
        assert_eq!(post.formatted_date.as_deref(), Some("Jan 15, 2024"));
        assert!(post.content.contains("<h1>Details</h1>"));
        assert!(!post.content.contains("more"));
    }

    #[test]
    fn test_content_matches_tree() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        let loader = ContentLoader::new(&blog);

        let post = loader
            .parse_post("posts/a.md", "# A\n\n```rust\nlet x = 1;\n```\n", None)
            .unwrap()
            .unwrap();

        match post.body() {
            Body::Tree(tree) => assert_eq!(tree.to_html(), post.content),
            Body::Html(_) => panic!("loaded posts carry a tree"),
        }
    }

    #[test]
    fn test_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            auto_excerpt: 10,
            ..SiteConfig::default()
        };
        let blog = blog_in(dir.path(), config);
        let loader = ContentLoader::new(&blog);

        let mtime = chrono::NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let post = loader
            .parse_post("posts/My Notes.md", "Some body text that runs long.", Some(mtime))
            .unwrap()
            .unwrap();

        assert_eq!(post.title(), "My Notes");
        assert_eq!(post.slug(), "my-notes");
        assert_eq!(post.meta().date, "2023-06-01T12:00:00");
        assert_eq!(post.meta().excerpt.as_deref(), Some("Some body …"));
        assert!(post.meta().tags.is_none());
    }

    #[test]
    fn test_drafts_skipped_unless_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let raw = "---\ntitle: Draft\ndraft: true\n---\nWIP\n";

        let blog = blog_in(dir.path(), SiteConfig::default());
        assert!(ContentLoader::new(&blog)
            .parse_post("posts/d.md", raw, None)
            .unwrap()
            .is_none());

        let config = SiteConfig {
            render_drafts: true,
            ..SiteConfig::default()
        };
        let blog = blog_in(dir.path(), config);
        assert!(ContentLoader::new(&blog)
            .parse_post("posts/d.md", raw, None)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_invalid_slug_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        let err = ContentLoader::new(&blog)
            .parse_post("posts/x.md", "---\ntitle: X\nslug: has space\n---\n", None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSlug(_)));
    }

    #[test]
    fn test_load_posts_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());

        write_post(&blog, "a.md", "---\ntitle: A\ndate: 2024-01-01\ntags: go\n---\nA body\n");
        write_post(&blog, "b.md", "---\ntitle: B\ndate: 2024-02-01\ntags: go\n---\nB body\n");
        write_post(&blog, "broken.md", "---\ntitle: [oops\n---\nbody\n");
        write_post(&blog, "notes.txt", "not markdown");

        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["b", "a"]);

        let reports = ContentLoader::new(&blog).load_each();
        assert_eq!(reports.len(), 3);
        let broken = reports
            .iter()
            .find(|r| r.source.ends_with("broken.md"))
            .unwrap();
        assert!(matches!(
            broken.outcome.error(),
            Some(Error::FrontMatter { path, .. }) if path.ends_with("broken.md")
        ));
    }

    #[test]
    fn test_duplicate_slugs_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());

        write_post(&blog, "one.md", "---\ntitle: One\nslug: same\n---\n");
        write_post(&blog, "two.md", "---\ntitle: Two\nslug: same\n---\n");

        let err = ContentLoader::new(&blog).load_posts().unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug { ref slug, .. } if slug == "same"));
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path(), SiteConfig::default());
        assert!(ContentLoader::new(&blog).load_posts().unwrap().is_empty());
    }
}
