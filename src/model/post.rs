//! Post metadata and materialized posts

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::Document;
use crate::error::{Error, Result};
use crate::helpers::parse_date;

/// Descriptive metadata for a blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// Display title
    pub title: String,

    /// Publication date, ISO-like
    pub date: String,

    /// URL-safe identifier, unique within a content set
    pub slug: String,

    /// Short summary shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Tag names in author order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Last modification date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl PostMeta {
    /// Create metadata with the required fields only
    pub fn new(title: impl Into<String>, date: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            slug: slug.into(),
            excerpt: None,
            tags: None,
            modified: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Check the title and slug invariants
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::MissingTitle(self.slug.clone()));
        }
        if !is_url_safe(&self.slug) {
            return Err(Error::InvalidSlug(self.slug.clone()));
        }
        Ok(())
    }

    /// Tag names, empty when the post has none
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags().iter().any(|t| t == name)
    }

    /// Parsed publication date
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    pub fn modified_at(&self) -> Option<NaiveDateTime> {
        self.modified.as_deref().and_then(parse_date)
    }
}

/// Whether `slug` only contains ASCII alphanumerics, `-` and `_`
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A fully materialized post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Rendered body as markup
    pub content: String,

    /// Rendered body as a document tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_tree: Option<Document>,

    /// Display-ready rendering of `date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
}

/// The preferred encoding of a post body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    Tree(&'a Document),
    Html(&'a str),
}

impl Post {
    /// Widen metadata into a post with a markup body
    pub fn from_meta(meta: PostMeta, content: impl Into<String>) -> Self {
        Self {
            meta,
            content: content.into(),
            content_tree: None,
            formatted_date: None,
        }
    }

    /// Attach a document tree; `content` is re-derived from it so the two
    /// encodings never disagree
    pub fn with_tree(mut self, tree: Document) -> Self {
        self.content = tree.to_html();
        self.content_tree = Some(tree);
        self
    }

    pub fn with_formatted_date(mut self, formatted: impl Into<String>) -> Self {
        self.formatted_date = Some(formatted.into());
        self
    }

    pub fn meta(&self) -> &PostMeta {
        &self.meta
    }

    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn tags(&self) -> &[String] {
        self.meta.tags()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.meta.has_tag(name)
    }

    /// The body to render: the tree when present, the markup otherwise
    pub fn body(&self) -> Body<'_> {
        match &self.content_tree {
            Some(tree) => Body::Tree(tree),
            None => Body::Html(&self.content),
        }
    }

    pub fn body_html(&self) -> Cow<'_, str> {
        match self.body() {
            Body::Tree(tree) => Cow::Owned(tree.to_html()),
            Body::Html(html) => Cow::Borrowed(html),
        }
    }

    /// Display date, falling back to the raw date string
    pub fn display_date(&self) -> &str {
        self.formatted_date.as_deref().unwrap_or(&self.meta.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Node};

    fn meta() -> PostMeta {
        PostMeta {
            title: "Hello".to_string(),
            date: "2024-01-15".to_string(),
            slug: "hello".to_string(),
            excerpt: Some("First words".to_string()),
            tags: Some(vec!["rust".to_string(), "go".to_string()]),
            modified: Some("2024-02-01".to_string()),
        }
    }

    #[test]
    fn test_widening_preserves_meta() {
        let original = meta();
        let post = Post::from_meta(original.clone(), "<p>hi</p>");
        assert_eq!(post.meta(), &original);
        assert_eq!(post.slug(), "hello");
        assert_eq!(post.content, "<p>hi</p>");
        assert!(post.content_tree.is_none());
        assert!(post.formatted_date.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(meta().validate().is_ok());

        let blank = PostMeta::new("  ", "2024-01-15", "x");
        assert!(matches!(blank.validate(), Err(Error::MissingTitle(_))));

        let spaced = PostMeta::new("T", "2024-01-15", "not a slug");
        assert!(matches!(spaced.validate(), Err(Error::InvalidSlug(s)) if s == "not a slug"));

        let empty = PostMeta::new("T", "2024-01-15", "");
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_tags_absent() {
        let m = PostMeta::new("T", "2024-01-15", "t");
        assert!(m.tags().is_empty());
        assert!(!m.has_tag("go"));
        assert!(meta().has_tag("go"));
    }

    #[test]
    fn test_published_at() {
        let m = meta();
        assert_eq!(
            m.published_at().unwrap().format("%Y-%m-%d").to_string(),
            "2024-01-15"
        );
        assert!(m.modified_at().is_some());
        assert!(PostMeta::new("T", "someday", "t").published_at().is_none());
    }

    #[test]
    fn test_tree_takes_precedence() {
        let tree = Document::new(vec![Element::new("p").child(Node::text("tree")).into()]);
        let post = Post::from_meta(meta(), "<p>stale</p>").with_tree(tree.clone());

        assert_eq!(post.body(), Body::Tree(&tree));
        assert_eq!(post.content, "<p>tree</p>");
        assert_eq!(post.body_html(), "<p>tree</p>");

        let plain = Post::from_meta(meta(), "<p>plain</p>");
        assert_eq!(plain.body(), Body::Html("<p>plain</p>"));
    }

    #[test]
    fn test_json_field_names() {
        let post = Post::from_meta(meta(), "<p>hi</p>")
            .with_tree(Document::default())
            .with_formatted_date("Jan 15, 2024");
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["slug"], "hello");
        assert_eq!(json["formattedDate"], "Jan 15, 2024");
        assert!(json.get("contentTree").is_some());
        assert!(json.get("meta").is_none());

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }
}
