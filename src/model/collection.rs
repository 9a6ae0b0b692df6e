//! Post collections keyed by slug

use indexmap::IndexMap;
use std::cmp::Ordering;

use super::{Post, TagInfo};
use crate::error::{Error, Result};

/// An ordered set of posts with unique slugs
#[derive(Debug, Clone, Default)]
pub struct PostSet {
    posts: IndexMap<String, Post>,
}

impl PostSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, failing on the first repeated slug
    pub fn from_posts<I: IntoIterator<Item = Post>>(posts: I) -> Result<Self> {
        let mut set = Self::new();
        for post in posts {
            set.insert(post)?;
        }
        Ok(set)
    }

    /// Append a post; its slug must not already be present
    pub fn insert(&mut self, post: Post) -> Result<()> {
        if let Some(existing) = self.posts.get(post.slug()) {
            return Err(Error::DuplicateSlug {
                slug: post.slug().to_string(),
                first: existing.title().to_string(),
                second: post.title().to_string(),
            });
        }
        self.posts.insert(post.slug().to_string(), post);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.get(slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    /// Posts carrying `tag`, in set order
    pub fn tagged(&self, tag: &str) -> Vec<Post> {
        self.iter().filter(|p| p.has_tag(tag)).cloned().collect()
    }

    /// Aggregate the tags of every post
    pub fn tags(&self) -> Vec<TagInfo> {
        TagInfo::collect(self.iter())
    }

    /// Order by publication date, newest first; ties and unparsable dates
    /// fall back to the slug
    pub fn sort_newest_first(&mut self) {
        self.posts.sort_by(|_, a, _, b| {
            match (a.meta().published_at(), b.meta().published_at()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.slug().cmp(b.slug()))
        });
    }

    pub fn to_vec(&self) -> Vec<Post> {
        self.posts.values().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a PostSet {
    type Item = &'a Post;
    type IntoIter = indexmap::map::Values<'a, String, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostMeta;

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        Post::from_meta(
            PostMeta::new(format!("Title {}", slug), date, slug).with_tags(tags.iter().copied()),
            "",
        )
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let err = PostSet::from_posts(vec![
            post("a", "2024-01-01", &[]),
            post("a", "2024-01-02", &[]),
        ])
        .unwrap_err();

        match err {
            Error::DuplicateSlug { slug, first, second } => {
                assert_eq!(slug, "a");
                assert_eq!(first, "Title a");
                assert_eq!(second, "Title a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let set = PostSet::from_posts(vec![
            post("b", "2024-01-01", &["go"]),
            post("a", "2024-01-02", &["go", "rust"]),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("b").unwrap().meta().date, "2024-01-01");
        assert!(set.get("zzz").is_none());

        let slugs: Vec<_> = set.iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut set = PostSet::from_posts(vec![
            post("old", "2023-05-01", &[]),
            post("undated", "whenever", &[]),
            post("new", "2024-03-01 10:00", &[]),
            post("also-new", "2024-03-01 10:00", &[]),
        ])
        .unwrap();
        set.sort_newest_first();

        let slugs: Vec<_> = set.iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["also-new", "new", "old", "undated"]);
    }

    #[test]
    fn test_tagged_and_tags() {
        let set = PostSet::from_posts(vec![
            post("a", "2024-01-01", &["go"]),
            post("b", "2024-01-02", &["rust"]),
            post("c", "2024-01-03", &["go"]),
        ])
        .unwrap();

        let go: Vec<_> = set.tagged("go").into_iter().map(|p| p.meta.slug).collect();
        assert_eq!(go, vec!["a", "c"]);

        let tags = set.tags();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name(), "go");
        assert_eq!(tags[0].count(), 2);
    }
}
