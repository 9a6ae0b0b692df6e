//! Payload handed to the page renderer

use serde::Serialize;

use super::{Post, TagInfo};

/// Data for rendering a single page.
///
/// Which optional fields are set depends on the kind of page; the page
/// assembly in `site` fills the right subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Post>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tag: Option<String>,
    pub path: String,
}

/// The kind of page a context describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// A single post
    Detail,
    /// Posts filtered by one tag
    TagDetail,
    /// All tags
    TagIndex,
    /// A list of posts
    Listing,
    /// Title only
    Plain,
}

impl RenderContext {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            posts: None,
            post: None,
            tags: None,
            active_tag: None,
            path: path.into(),
        }
    }

    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = Some(posts);
        self
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.post = Some(post);
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagInfo>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_active_tag(mut self, tag: impl Into<String>) -> Self {
        self.active_tag = Some(tag.into());
        self
    }

    /// Infer the page kind from the populated fields
    pub fn page_kind(&self) -> PageKind {
        if self.post.is_some() {
            PageKind::Detail
        } else if self.active_tag.is_some() {
            PageKind::TagDetail
        } else if self.tags.is_some() {
            PageKind::TagIndex
        } else if self.posts.is_some() {
            PageKind::Listing
        } else {
            PageKind::Plain
        }
    }

    pub fn posts(&self) -> &[Post] {
        self.posts.as_deref().unwrap_or_default()
    }

    pub fn tags(&self) -> &[TagInfo] {
        self.tags.as_deref().unwrap_or_default()
    }
}
