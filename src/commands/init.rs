//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# tagpress configuration

# Site
title: My Blog
subtitle: ''
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content
post_dir: posts
tag_dir: tags
output_dir: public
static_dir: static

# Writing
new_post_name: ':title.md'
render_drafts: false
auto_excerpt: 200
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Date format (Moment.js tokens)
date_format: MMM D, YYYY
"#;

const POST_SCAFFOLD: &str = r#"---
title: {{ title }}
date: {{ date }}
tags:
---
"#;

const DEFAULT_STYLE: &str = r#"body { max-width: 42rem; margin: 2rem auto; padding: 0 1rem; font-family: system-ui, sans-serif; line-height: 1.6; }
.site-header { display: flex; flex-wrap: wrap; align-items: baseline; gap: 1rem; }
.site-nav a { margin-right: .75rem; }
.post-meta { color: #666; font-size: .9rem; }
.post-tag { margin-right: .5rem; }
.tag-list-item.current a { font-weight: bold; }
pre { overflow-x: auto; padding: .75rem; }
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join(CONFIG_FILE).exists() {
        bail!("{:?} already contains a {}", target_dir, CONFIG_FILE);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("static/css"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    fs::write(target_dir.join("scaffolds/post.md"), POST_SCAFFOLD)?;
    fs::write(target_dir.join("static/css/style.css"), DEFAULT_STYLE)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
tags: [welcome]
---

Welcome to your new blog! This is your very first post.

<!-- more -->

## Quick Start

### Create a new post

```bash
$ tagpress new "My New Post"
```

### Run server

```bash
$ tagpress serve
```

### Build static files

```bash
$ tagpress build
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blog;

    #[test]
    fn test_init_site_loads() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "My Blog");

        let site = blog.load_site().unwrap();
        assert_eq!(site.posts().len(), 1);
        let post = site.posts().get("hello-world").unwrap();
        assert_eq!(post.tags(), ["welcome"]);
        assert_eq!(
            post.meta().excerpt.as_deref(),
            Some("Welcome to your new blog! This is your very first post.")
        );
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
