//! Content module - front-matter, markdown rendering and post loading

mod frontmatter;
pub mod loader;
mod markdown;

pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, SourceReport};
pub use markdown::MarkdownRenderer;
