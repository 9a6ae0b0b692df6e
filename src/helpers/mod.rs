//! Helper functions for page rendering
//!
//! URL generation, HTML escaping, date formatting and list markup shared by
//! the content loader and the page renderer.

mod date;
mod html;
mod list;
mod url;

pub use date::*;
pub use html::*;
pub use list::*;
pub use url::*;

use chrono::NaiveDateTime;

use crate::config::SiteConfig;

/// Helpers bound to one site configuration
#[derive(Debug, Clone)]
pub struct Helpers {
    config: SiteConfig,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// Get full_url_for helper
    pub fn full_url_for(&self, path: &str) -> String {
        full_url_for(&self.config, path)
    }

    /// URL of a post detail page
    pub fn post_url(&self, slug: &str) -> String {
        self.url_for(&post_path(&self.config, slug))
    }

    /// URL of a tag detail page
    pub fn tag_url(&self, tag: &str) -> String {
        self.url_for(&tag_path(&self.config, tag))
    }

    /// Get css helper
    pub fn css(&self, path: &str) -> String {
        css(&self.config, path)
    }

    /// Get link_to helper
    pub fn link_to(&self, path: &str, text: &str, class: Option<&str>) -> String {
        link_to(&self.config, path, text, class)
    }

    /// Format a date, using the site's `date_format` when none is given
    pub fn date(&self, date: &NaiveDateTime, format: Option<&str>) -> String {
        format_date(date, format.unwrap_or(&self.config.date_format))
    }
}
