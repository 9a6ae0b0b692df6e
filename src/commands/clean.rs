//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Remove the output directory if it exists
pub fn run(blog: &Blog) -> Result<()> {
    if blog.output_dir.exists() {
        fs::remove_dir_all(&blog.output_dir)?;
        tracing::info!("Deleted: {:?}", blog.output_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        fs::create_dir_all(blog.output_dir.join("posts")).unwrap();
        fs::write(blog.output_dir.join("index.html"), "x").unwrap();

        run(&blog).unwrap();
        assert!(!blog.output_dir.exists());

        // Nothing to clean is fine
        run(&blog).unwrap();
    }
}
