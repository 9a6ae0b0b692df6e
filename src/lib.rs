//! tagpress: a small markdown blog engine
//!
//! Posts are markdown files with front-matter. They are loaded into a
//! [`model::PostSet`], grouped by tag, and turned into pages through
//! [`model::RenderContext`] values that either get written as static HTML or
//! served on demand by the development server.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod model;
pub mod render;
pub mod server;
pub mod site;

pub use error::Error;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the blog root
pub const CONFIG_FILE: &str = "_config.yml";

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
    /// Output directory for `build`
    pub output_dir: PathBuf,
    /// Directory of files copied as they are
    pub static_dir: PathBuf,
}

impl Blog {
    /// Open the blog in a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open the blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let output_dir = base_dir.join(&config.output_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            content_dir,
            output_dir,
            static_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Directory holding the post sources
    pub fn posts_dir(&self) -> PathBuf {
        self.content_dir.join(&self.config.post_dir)
    }

    /// Load every post into a site
    pub fn load_site(&self) -> Result<site::Site> {
        Ok(site::Site::load(self)?)
    }

    /// Build the static site, returning the number of pages written
    pub fn build(&self) -> Result<usize> {
        commands::build::run(self)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_blog_dirs_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Notes\ncontent_dir: src\npost_dir: writing\noutput_dir: dist\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Notes");
        assert_eq!(blog.posts_dir(), dir.path().join("src/writing"));
        assert_eq!(blog.output_dir, dir.path().join("dist"));
        assert_eq!(blog.static_dir, dir.path().join("static"));
    }

    #[test]
    fn test_blog_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.posts_dir(), dir.path().join("content/posts"));
    }
}
