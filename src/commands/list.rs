//! List site content

use anyhow::Result;

use crate::model::sort_by_count;
use crate::site::Site;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let site = Site::load(blog)?;
    for line in lines(&site, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

fn lines(site: &Site, content_type: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            lines.push(format!("Posts ({}):", site.posts().len()));
            for post in site.posts() {
                let tags = if post.tags().is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", post.tags().join(", "))
                };
                lines.push(format!(
                    "  {} - {} ({}){}",
                    post.meta().date,
                    post.title(),
                    post.slug(),
                    tags
                ));
            }
        }
        "tag" | "tags" => {
            let mut tags = site.tags().to_vec();
            sort_by_count(&mut tags);
            lines.push(format!("Tags ({}):", tags.len()));
            for tag in &tags {
                lines.push(format!("  {} ({})", tag.name(), tag.count()));
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(lines)
}
