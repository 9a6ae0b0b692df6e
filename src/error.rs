//! Error types shared by the content and model layers

use std::path::PathBuf;

/// Errors produced while loading and validating blog content
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("post {0:?} has an empty title")]
    MissingTitle(String),

    #[error("slug {0:?} is not URL-safe")]
    InvalidSlug(String),

    #[error("slug {slug:?} is used by both {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

/// Result with the crate error as the default error type
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
