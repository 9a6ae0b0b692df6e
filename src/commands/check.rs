//! Check every post source without building

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use crate::content::ContentLoader;
use crate::error::Error;
use crate::model::{Outcome, PostMeta};
use crate::Blog;

/// The check result for one source file
#[derive(Debug, Serialize)]
pub struct CheckEntry {
    pub source: String,
    #[serde(flatten)]
    pub outcome: Outcome<PostMeta>,
}

/// Load every source and report per-file outcomes.
///
/// A post reusing a slug seen earlier is reported as a failure.
pub fn check(blog: &Blog) -> Vec<CheckEntry> {
    let mut seen: HashMap<String, String> = HashMap::new();

    ContentLoader::new(blog)
        .load_each()
        .into_iter()
        .map(|report| {
            let duplicate = report.outcome.value().and_then(|post| match seen.get(post.slug()) {
                Some(first) => Some(Error::DuplicateSlug {
                    slug: post.slug().to_string(),
                    first: first.clone(),
                    second: post.title().to_string(),
                }),
                None => {
                    seen.insert(post.slug().to_string(), post.title().to_string());
                    None
                }
            });
            let outcome = match duplicate {
                Some(error) => Outcome::Err(error),
                None => report.outcome.map(|post| post.meta),
            };
            CheckEntry {
                source: report.source,
                outcome,
            }
        })
        .collect()
}

/// Print the check results; returns whether every source passed
pub fn run(blog: &Blog, json: bool) -> Result<bool> {
    let entries = check(blog);
    let failures = entries.iter().filter(|e| e.outcome.is_err()).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            match &entry.outcome {
                Outcome::Ok(meta) => println!("ok     {} ({})", entry.source, meta.slug),
                Outcome::Err(e) => println!("error  {}: {}", entry.source, e),
            }
        }
        println!(
            "{} sources checked, {} failed",
            entries.len(),
            failures
        );
    }

    Ok(failures == 0)
}
