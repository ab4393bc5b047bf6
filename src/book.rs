//! In-memory book model: metadata plus chapters in spine order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::FormattingConfig;
use crate::error::TreadError;
use crate::text_import::format_plain_text;

/// Chapter break marker recognised by [`Document::from_plain_text`].
pub const PLAIN_TEXT_CHAPTER_BREAK: char = '\u{0c}';

/// A single chapter of text with inline `[tag]...[/tag]` span markers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Display title.
    pub title: String,
    /// Plain text content, one paragraph per line.
    pub content: String,
    /// Stable identifier from the source container.
    #[serde(default)]
    pub id: String,
}

impl Chapter {
    /// Create a chapter.
    pub fn new(title: impl Into<String>, content: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            id: id.into(),
        }
    }
}

/// Descriptive metadata for a book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookMetadata {
    /// Book title; bookmarks are keyed by this value.
    pub title: String,
    /// Author.
    pub author: String,
    /// Language tag.
    pub language: String,
    /// Publisher.
    pub publisher: String,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            author: "Unknown Author".to_string(),
            language: "Unknown".to_string(),
            publisher: "Unknown".to_string(),
        }
    }
}

impl BookMetadata {
    /// Metadata with `title` and defaults for every other field.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A book: metadata plus chapters in spine order. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    metadata: BookMetadata,
    chapters: Vec<Chapter>,
}

impl Document {
    /// Build a document from already-extracted chapters.
    pub fn new(metadata: BookMetadata, chapters: Vec<Chapter>) -> Self {
        Self { metadata, chapters }
    }

    /// Decode a document from its JSON form
    /// (`{"metadata": {...}, "chapters": [{"title", "content", "id"}]}`).
    ///
    /// Chapters with a blank title are named `Chapter N`.
    pub fn from_json_slice(payload: &[u8]) -> Result<Self, TreadError> {
        let mut doc: Self = serde_json::from_slice(payload)?;
        for (index, chapter) in doc.chapters.iter_mut().enumerate() {
            if chapter.title.trim().is_empty() {
                chapter.title = format!("Chapter {}", index + 1);
            }
        }
        log::debug!(
            "decoded document title={:?} chapters={}",
            doc.metadata.title,
            doc.chapters.len()
        );
        Ok(doc)
    }

    /// Read and decode a JSON document from `path`.
    pub fn open_json(path: impl AsRef<Path>) -> Result<Self, TreadError> {
        let payload = fs::read(path)?;
        Self::from_json_slice(&payload)
    }

    /// Open a book file: `.json` documents are decoded, anything else is
    /// imported as plain text titled by the file stem.
    pub fn open(path: impl AsRef<Path>, cfg: &FormattingConfig) -> Result<Self, TreadError> {
        let path = path.as_ref();
        if has_extension(path, "json") {
            return Self::open_json(path);
        }
        let text = String::from_utf8(fs::read(path)?).map_err(|err| {
            TreadError::InvalidDocument(format!("{} is not UTF-8 text: {}", path.display(), err))
        })?;
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| BookMetadata::default().title);
        Ok(Self::from_plain_text(title, &text, cfg))
    }

    /// Build a document from raw plain text.
    ///
    /// Form feeds split the text into chapters. Each chapter is titled by
    /// its first non-blank line (or `Chapter N`) and formatted with
    /// [`format_plain_text`]. Chapters with no content are skipped.
    pub fn from_plain_text(title: impl Into<String>, text: &str, cfg: &FormattingConfig) -> Self {
        let mut chapters = Vec::with_capacity(8);
        for raw in text.split(PLAIN_TEXT_CHAPTER_BREAK) {
            let content = format_plain_text(raw, cfg);
            if content.trim().is_empty() {
                continue;
            }
            let number = chapters.len() + 1;
            let title = raw
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Chapter {}", number));
            chapters.push(Chapter::new(title, content, format!("chapter-{}", number)));
        }
        Self::new(BookMetadata::titled(title), chapters)
    }

    /// Book metadata.
    pub fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    /// Book title.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Chapters in spine order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Number of chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// True when the document has nothing to read.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapter at `index`, if any.
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Chapter at `index`, or a bounds error.
    pub fn try_chapter(&self, index: usize) -> Result<&Chapter, TreadError> {
        self.chapters
            .get(index)
            .ok_or(TreadError::ChapterOutOfBounds {
                index,
                chapter_count: self.chapters.len(),
            })
    }
}

/// True when `path` ends in `.{ext}`, ignoring ASCII case.
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|found| found.to_str())
        .is_some_and(|found| found.eq_ignore_ascii_case(ext))
}
