//! Book library: the readable files in a directory with their metadata and
//! bookmark progress.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::book::{has_extension, Document};
use crate::bookmarks::BookmarkStore;
use crate::config::FormattingConfig;

/// File extensions listed as books.
pub const BOOK_EXTENSIONS: &[&str] = &["json", "txt"];

/// Title shown for a book file that could not be loaded.
pub const UNREADABLE_TITLE: &str = "[Error reading]";

/// One row of the library listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookInfo {
    /// File name inside the library directory.
    pub filename: String,
    /// Book title, or [`UNREADABLE_TITLE`].
    pub title: String,
    /// Author, or the load error for an unreadable file.
    pub author: String,
    /// Percent of chapters before the saved bookmark.
    pub progress: usize,
}

impl BookInfo {
    /// True when the file failed to load.
    pub fn is_unreadable(&self) -> bool {
        self.title == UNREADABLE_TITLE
    }
}

/// Book files directly inside `dir`, sorted by path. A missing or unreadable
/// directory lists nothing.
pub fn book_files(dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("library dir {} not readable: {}", dir.display(), err);
            return Vec::new();
        }
    };
    let mut out: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| BOOK_EXTENSIONS.iter().any(|ext| has_extension(path, ext)))
        .collect();
    out.sort();
    out
}

/// Chapter-level reading progress for a bookmark at `chapter_index`.
pub fn chapter_progress(chapter_index: usize, chapter_count: usize) -> usize {
    if chapter_count == 0 {
        return 0;
    }
    (chapter_index * 100 / chapter_count).min(100)
}

/// Describe the book at `path`. Load failures become an unreadable row.
pub fn book_info(
    path: &Path,
    store: &dyn BookmarkStore,
    formatting: &FormattingConfig,
) -> BookInfo {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match Document::open(path, formatting) {
        Ok(doc) => {
            let progress = store
                .load_bookmark(doc.title())
                .map_or(0, |bookmark| {
                    chapter_progress(bookmark.chapter_index, doc.chapter_count())
                });
            BookInfo {
                filename,
                title: doc.title().to_string(),
                author: doc.metadata().author.clone(),
                progress,
            }
        }
        Err(err) => {
            log::warn!("unable to read book {}: {}", path.display(), err);
            BookInfo {
                filename,
                title: UNREADABLE_TITLE.to_string(),
                author: err.to_string(),
                progress: 0,
            }
        }
    }
}

/// List every book in `dir` with its bookmark progress.
pub fn list_books(
    dir: impl AsRef<Path>,
    store: &dyn BookmarkStore,
    formatting: &FormattingConfig,
) -> Vec<BookInfo> {
    let books: Vec<BookInfo> = book_files(dir)
        .iter()
        .map(|path| book_info(path, store, formatting))
        .collect();
    log::debug!("library listed {} books", books.len());
    books
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_whole_chapters_before_bookmark() {
        assert_eq!(chapter_progress(0, 4), 0);
        assert_eq!(chapter_progress(1, 3), 33);
        assert_eq!(chapter_progress(3, 4), 75);
        assert_eq!(chapter_progress(2, 0), 0);
        assert_eq!(chapter_progress(9, 4), 100);
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let dir = std::env::temp_dir().join(format!("tread-no-library-{}", std::process::id()));
        assert!(book_files(&dir).is_empty());
    }
}
