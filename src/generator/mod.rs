//! Generator module - writes every page of a site as static HTML

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::helpers::decode_segment;
use crate::render::PageRenderer;
use crate::site::Site;
use crate::Blog;

/// Static site generator
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: PageRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Self {
        Self {
            blog,
            renderer: PageRenderer::new(blog.config.clone()),
        }
    }

    /// Generate the entire site, returning the number of pages written
    pub fn generate(&self, site: &Site) -> Result<usize> {
        fs::create_dir_all(&self.blog.output_dir).with_context(|| {
            format!("Failed to create output directory {:?}", self.blog.output_dir)
        })?;

        let copied = self.copy_static_assets()?;
        if copied > 0 {
            tracing::info!("Copied {} static files", copied);
        }

        let mut written: HashMap<PathBuf, String> = HashMap::new();
        for route in site.routes() {
            let Some(ctx) = site.context_for_route(&route) else {
                continue;
            };

            let output_path = page_output_path(&self.blog.output_dir, &ctx.path);
            if let Some(first) = written.get(&output_path) {
                bail!(
                    "Pages {} and {} would both be written to {:?}",
                    first,
                    ctx.path,
                    output_path
                );
            }

            let html = self.renderer.render(&ctx);

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            fs::write(&output_path, html)
                .with_context(|| format!("Failed to write {:?}", output_path))?;

            tracing::debug!("Generated: {:?}", output_path);
            written.insert(output_path, ctx.path);
        }

        Ok(written.len())
    }

    /// Copy `<static_dir>` into the output directory verbatim
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.output_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// Where the page for a canonical site path lives under the output directory.
///
/// Segments are decoded so that static file servers find them. A segment
/// that would decode into a path separator or into `.`/`..` keeps its
/// encoded form, and a literal `.`/`..` segment is dropped.
pub fn page_output_path(output_dir: &Path, site_path: &str) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    for segment in site_path.split('/').filter(|s| !s.is_empty()) {
        let decoded = decode_segment(segment);
        if is_plain_name(&decoded) {
            path.push(decoded);
        } else if is_plain_name(segment) {
            path.push(segment);
        }
    }
    path.join("index.html")
}

/// A single file name component that cannot navigate the tree
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_page_output_path() {
        let out = Path::new("/out");
        assert_eq!(page_output_path(out, "/"), Path::new("/out/index.html"));
        assert_eq!(
            page_output_path(out, "/posts/hello/"),
            Path::new("/out/posts/hello/index.html")
        );
        assert_eq!(
            page_output_path(out, "/tags/c%2B%2B/"),
            Path::new("/out/tags/c++/index.html")
        );
        assert_eq!(
            page_output_path(out, "/tags/a%2Fb/"),
            Path::new("/out/tags/a%2Fb/index.html")
        );
        assert_eq!(
            page_output_path(out, "/tags/%2E%2E/"),
            Path::new("/out/tags/%2E%2E/index.html")
        );
        assert_eq!(
            page_output_path(out, "/tags/../x/./"),
            Path::new("/out/tags/x/index.html")
        );
    }

    #[test]
    fn test_dot_tags_get_their_own_pages() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        write(
            &blog.posts_dir().join("dots.md"),
            "---\ntitle: Dots\ndate: 2024-01-01\ntags: ['..', '.']\n---\nBody\n",
        );

        let site = Site::load(&blog).unwrap();
        let pages = Generator::new(&blog).generate(&site).unwrap();
        assert_eq!(pages, 5);

        let out = &blog.output_dir;
        let home = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains(r#"<main class="post-listing">"#));
        let tags = fs::read_to_string(out.join("tags/index.html")).unwrap();
        assert!(tags.contains(r#"<main class="tag-index">"#));

        let up = fs::read_to_string(out.join("tags/%2E%2E/index.html")).unwrap();
        assert!(up.contains("<h1>Tag: ..</h1>"));
        let here = fs::read_to_string(out.join("tags/%2E/index.html")).unwrap();
        assert!(here.contains("<h1>Tag: .</h1>"));
    }

    #[test]
    fn test_colliding_pages_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        write(
            &blog.posts_dir().join("slash.md"),
            "---\ntitle: Slash\ntags: ['a/b', 'a%2Fb']\n---\nBody\n",
        );

        let site = Site::load(&blog).unwrap();
        let err = Generator::new(&blog).generate(&site).unwrap_err();
        assert!(err.to_string().contains("would both be written"));
    }

    #[test]
    fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        write(
            &blog.posts_dir().join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\ntags: [go]\n---\n# Hi\n",
        );
        write(
            &blog.posts_dir().join("second.md"),
            "---\ntitle: Second\ndate: 2024-01-02\ntags: [go, rust]\n---\nBody\n",
        );
        write(&blog.static_dir.join("css/style.css"), "body {}");

        let site = Site::load(&blog).unwrap();
        let pages = Generator::new(&blog).generate(&site).unwrap();

        // listing, tag index, two posts, two tags
        assert_eq!(pages, 6);

        let out = &blog.output_dir;
        assert!(out.join("index.html").exists());
        assert!(out.join("tags/index.html").exists());
        assert!(out.join("tags/go/index.html").exists());
        assert!(out.join("tags/rust/index.html").exists());
        assert_eq!(
            fs::read_to_string(out.join("css/style.css")).unwrap(),
            "body {}"
        );

        let post = fs::read_to_string(out.join("posts/hello/index.html")).unwrap();
        assert!(post.contains("<h1>Hi</h1>"));
        assert!(post.contains("<title>Hello | My Blog</title>"));
    }

    #[test]
    fn test_generate_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        let site = Site::load(&blog).unwrap();
        let pages = Generator::new(&blog).generate(&site).unwrap();

        assert_eq!(pages, 2);
        let index = fs::read_to_string(blog.output_dir.join("index.html")).unwrap();
        assert!(index.contains("No posts yet."));
    }
}
