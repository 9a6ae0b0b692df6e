//! Build static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::server::is_relevant;
use crate::site::Site;
use crate::Blog;

/// Build the static site, returning the number of pages written
pub fn run(blog: &Blog) -> Result<usize> {
    let start = Instant::now();

    let site = Site::load(blog)?;
    let pages = Generator::new(blog).generate(&site)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages in {:.2}s",
        pages,
        duration.as_secs_f64()
    );

    Ok(pages)
}

/// Watch for file changes and rebuild
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    // Changes arriving together are rebuilt once, after they settle
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&blog.content_dir, &blog.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }
    let config_path = blog.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let blog = blog.clone();
    let rebuilds = tokio::task::spawn_blocking(move || rebuild_on_events(blog, rx)).await?;
    tracing::debug!("Watcher stopped after {} rebuilds", rebuilds);

    // Keep the watcher alive until the loop ends
    drop(debouncer);
    Ok(())
}

/// Rebuild once per debounced batch that touches a relevant file, until the
/// sending side goes away. Returns how many rebuilds ran.
fn rebuild_on_events(mut blog: Blog, rx: Receiver<DebounceEventResult>) -> usize {
    let mut rebuilds = 0;

    for result in rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
        if changed.is_empty() {
            continue;
        }
        for event in &changed {
            tracing::info!("File changed: {}", event.path.display());
        }

        // Configuration may have moved directories, so start over
        match Blog::new(&blog.base_dir) {
            Ok(fresh) => blog = fresh,
            Err(e) => {
                tracing::error!("Failed to reload configuration: {:#}", e);
                continue;
            }
        }
        if let Err(e) = run(&blog) {
            tracing::error!("Build failed: {:#}", e);
        }
        rebuilds += 1;
    }

    rebuilds
}
