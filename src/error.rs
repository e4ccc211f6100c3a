//! Error types for the footer/merge pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdf-footer-merge library
#[derive(Error, Debug)]
pub enum Error {
    /// Input PDF is missing, unreadable or cannot be parsed
    #[error("Cannot read PDF {}: {source}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Output PDF cannot be created or written
    #[error("Cannot write PDF {}: {source}", path.display())]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Bad command-line or pipeline argument
    #[error("{0}")]
    Argument(String),

    /// A page object could not be stamped or moved
    #[error("Malformed page {page} in {}: {reason}", path.display())]
    MalformedPage {
        path: PathBuf,
        page: u32,
        reason: String,
    },

    /// Footer overlay could not be generated
    #[error("Footer overlay error: {0}")]
    Overlay(String),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<lopdf::Error>) -> Self {
        Error::DocumentRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<lopdf::Error>) -> Self {
        Error::DocumentWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}
