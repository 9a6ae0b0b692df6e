//! Tag aggregation

use indexmap::IndexMap;
use serde::Serialize;

use super::Post;

/// The posts sharing one tag
///
/// Only built through [`TagInfo::new`] and [`TagInfo::collect`], which keep
/// `count` equal to the number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    name: String,
    count: usize,
    posts: Vec<Post>,
}

impl TagInfo {
    /// Build a tag from the posts carrying it; posts without the tag are dropped
    pub fn new(name: impl Into<String>, posts: Vec<Post>) -> Self {
        let name = name.into();
        let posts: Vec<Post> = posts.into_iter().filter(|p| p.has_tag(&name)).collect();
        Self {
            count: posts.len(),
            name,
            posts,
        }
    }

    /// Derive every tag of a post collection.
    ///
    /// Tags appear in order of first use; posts keep their input order. A tag
    /// listed twice on the same post counts once.
    pub fn collect<'a, I>(posts: I) -> Vec<TagInfo>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut grouped: IndexMap<&'a str, Vec<Post>> = IndexMap::new();

        for post in posts {
            for (i, tag) in post.tags().iter().enumerate() {
                if post.tags()[..i].contains(tag) {
                    continue;
                }
                grouped.entry(tag.as_str()).or_default().push(post.clone());
            }
        }

        grouped
            .into_iter()
            .map(|(name, posts)| TagInfo {
                name: name.to_string(),
                count: posts.len(),
                posts,
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn slug(&self) -> String {
        slug::slugify(&self.name)
    }
}

/// Sort tags by post count (descending), then by name
pub fn sort_by_count(tags: &mut [TagInfo]) {
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostMeta;

    fn post(slug: &str, tags: &[&str]) -> Post {
        Post::from_meta(
            PostMeta::new(slug.to_uppercase(), "2024-01-01", slug).with_tags(tags.iter().copied()),
            "",
        )
    }

    #[test]
    fn test_collect_two_posts_same_tag() {
        let posts = vec![post("a", &["go"]), post("b", &["go"])];
        let tags = TagInfo::collect(&posts);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name(), "go");
        assert_eq!(tags[0].count(), 2);
        let slugs: Vec<_> = tags[0].posts().iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn test_collect_order_and_invariants() {
        let posts = vec![
            post("a", &["rust", "go"]),
            post("b", &[]),
            post("c", &["go", "web", "go"]),
            post("d", &["web"]),
        ];
        let tags = TagInfo::collect(&posts);

        let names: Vec<_> = tags.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["rust", "go", "web"]);

        for tag in &tags {
            assert_eq!(tag.count(), tag.posts().len());
            assert!(tag.posts().iter().all(|p| p.has_tag(tag.name())));
        }

        let go = tags.iter().find(|t| t.name() == "go").unwrap();
        assert_eq!(go.count(), 2);
    }

    #[test]
    fn test_collect_untagged() {
        let posts = vec![post("a", &[]), post("b", &[])];
        assert!(TagInfo::collect(&posts).is_empty());
    }

    #[test]
    fn test_new_filters_foreign_posts() {
        let tag = TagInfo::new("go", vec![post("a", &["go"]), post("b", &["rust"])]);
        assert_eq!(tag.count(), 1);
        assert_eq!(tag.posts()[0].slug(), "a");
    }

    #[test]
    fn test_sort_by_count() {
        let posts = vec![
            post("a", &["b-tag", "a-tag"]),
            post("b", &["c-tag", "a-tag"]),
            post("c", &["b-tag"]),
        ];
        let mut tags = TagInfo::collect(&posts);
        sort_by_count(&mut tags);
        let names: Vec<_> = tags.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a-tag", "b-tag", "c-tag"]);
    }

    #[test]
    fn test_serialize() {
        let tags = TagInfo::collect(&[post("a", &["go"])]);
        let json = serde_json::to_value(&tags[0]).unwrap();
        assert_eq!(json["name"], "go");
        assert_eq!(json["count"], 1);
        assert_eq!(json["posts"][0]["slug"], "a");
    }
}
