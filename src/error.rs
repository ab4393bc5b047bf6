//! Error type shared by document loading and persistence.

use core::fmt;
use std::io;

/// Errors raised while loading books or configuration.
///
/// Bookmark stores report failures as `bool`/`Option` instead.
#[derive(Debug)]
pub enum TreadError {
    /// Underlying file system failure.
    Io(io::Error),
    /// JSON payload could not be decoded.
    Json(serde_json::Error),
    /// Chapter index outside the document.
    ChapterOutOfBounds {
        /// Requested chapter index.
        index: usize,
        /// Number of chapters in the document.
        chapter_count: usize,
    },
    /// Document payload decoded but is not usable.
    InvalidDocument(String),
}

impl fmt::Display for TreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {}", err),
            Self::Json(err) => write!(f, "json error: {}", err),
            Self::ChapterOutOfBounds {
                index,
                chapter_count,
            } => write!(
                f,
                "chapter index {} out of bounds (chapter_count={})",
                index, chapter_count
            ),
            Self::InvalidDocument(msg) => write!(f, "invalid document: {}", msg),
        }
    }
}

impl std::error::Error for TreadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TreadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for TreadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
