//! Data model shared by content loading, page assembly and rendering

mod collection;
mod context;
mod document;
mod outcome;
mod post;
mod tag;

pub use collection::PostSet;
pub use context::{PageKind, RenderContext};
pub use document::{Document, Element, Node};
pub use outcome::Outcome;
pub use post::{is_url_safe, Body, Post, PostMeta};
pub use tag::{sort_by_count, TagInfo};
