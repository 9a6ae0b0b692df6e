//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::model::is_url_safe;
use crate::Blog;

/// Create a new post from the scaffold, returning its path.
///
/// The file name comes from `new_post_name`; `:title` is replaced by the
/// slug, which defaults to the slugified title.
pub fn create_post(blog: &Blog, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    if title.trim().is_empty() {
        bail!("A post needs a title");
    }

    let now = chrono::Local::now();
    let explicit_slug = slug.is_some();
    let slug = match slug {
        Some(slug) => slug.to_string(),
        None => slug::slugify(title),
    };
    if !is_url_safe(&slug) {
        bail!("Slug {:?} is not URL-safe", slug);
    }

    let target_dir = blog.posts_dir();
    fs::create_dir_all(&target_dir)?;

    let filename = blog
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string())
        .replace(":i_month", &now.format("%-m").to_string())
        .replace(":i_day", &now.format("%-d").to_string());
    let file_path = target_dir.join(filename);

    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = blog.base_dir.join("scaffolds/post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        "---\ntitle: {{ title }}\ndate: {{ date }}\ntags:\n---\n".to_string()
    };

    let mut content = scaffold
        .replace("{{ title }}", &yaml_string(title))
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string());

    // A custom slug is recorded so that renaming the file keeps the URL
    if explicit_slug {
        if let Some(rest) = content.strip_prefix("---\n") {
            content = format!("---\nslug: {}\n{}", slug, rest);
        }
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a title when it would not survive as a plain YAML scalar
fn yaml_string(s: &str) -> String {
    let plain = !s.is_empty()
        && !s.starts_with(|c: char| "!&*-?[]{}|>@`\"'%#,:".contains(c) || c.is_whitespace())
        && !s.ends_with(char::is_whitespace)
        && !s.contains(": ")
        && !s.contains(" #");
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "''"))
    }
}
