//! Per-book reading position persistence.
//!
//! A store keeps a single `current` bookmark per book, keyed by the book
//! title. Failures never propagate as errors: saves report `false`, loads
//! report `None`, and the cause is logged.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const CURRENT_KEY: &str = "current";
static BOOKMARK_WRITE_NONCE: AtomicUsize = AtomicUsize::new(0);

/// Saved reading position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Chapter index in spine order.
    #[serde(rename = "chapter")]
    pub chapter_index: usize,
    /// Page index within the chapter under the layout active when saved.
    #[serde(rename = "page")]
    pub page_index: usize,
    /// Local ISO-8601 timestamp of the save.
    pub timestamp: String,
    /// Chapter title at the saved position.
    #[serde(default)]
    pub title: String,
}

impl Bookmark {
    /// Bookmark stamped with the current local time.
    pub fn now(chapter_index: usize, page_index: usize, title: impl Into<String>) -> Self {
        Self {
            chapter_index,
            page_index,
            timestamp: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            title: title.into(),
        }
    }
}

/// Storage hooks for bookmarks.
pub trait BookmarkStore {
    /// Overwrite the current bookmark for `book_title`. Returns `false` on failure.
    fn save_bookmark(&self, book_title: &str, bookmark: &Bookmark) -> bool;

    /// Most recently saved bookmark for `book_title`, if any.
    fn load_bookmark(&self, book_title: &str) -> Option<Bookmark>;

    /// Whether `book_title` has a saved bookmark.
    fn has_bookmark(&self, book_title: &str) -> bool {
        self.load_bookmark(book_title).is_some()
    }

    /// Remove the bookmark for `book_title`. Returns `false` on failure.
    fn delete_bookmark(&self, _book_title: &str) -> bool {
        false
    }
}

/// Reduce a book title to a file-name-safe stem.
///
/// Keeps alphanumerics, spaces, `-` and `_`, trims trailing whitespace and
/// turns the remaining spaces into underscores.
pub fn sanitize_title(book_title: &str) -> String {
    let kept: String = book_title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim_end().replace(' ', "_")
}

/// File-backed bookmark store: `<root>/<sanitized title>.json`.
///
/// Each file is a JSON object whose `current` key holds the bookmark. Other
/// keys are preserved across saves. Writes go through a temp file and a
/// rename so a crash never leaves a truncated bookmark behind.
#[derive(Clone, Debug)]
pub struct FileBookmarkStore {
    root: PathBuf,
}

impl FileBookmarkStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory for bookmark files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic bookmark path for `book_title`.
    pub fn bookmark_path(&self, book_title: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", sanitize_title(book_title)))
    }

    fn load_entries(&self, book_title: &str) -> Map<String, Value> {
        let path = self.bookmark_path(book_title);
        let Ok(payload) = fs::read(&path) else {
            return Map::new();
        };
        match serde_json::from_slice::<Value>(&payload) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::warn!("ignoring unreadable bookmark file {}", path.display());
                Map::new()
            }
        }
    }

    fn write_entries(&self, book_title: &str, entries: &Map<String, Value>) -> std::io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let final_path = self.bookmark_path(book_title);
        let nonce = BOOKMARK_WRITE_NONCE.fetch_add(1, Ordering::Relaxed);
        let temp_path = self.root.join(format!(
            "{}.json.tmp-{}-{}",
            sanitize_title(book_title),
            std::process::id(),
            nonce
        ));

        let result = write_json_file(&temp_path, entries)
            .and_then(|()| fs::rename(&temp_path, &final_path));
        if result.is_err() {
            remove_file_quiet(&temp_path);
        }
        result
    }
}

impl BookmarkStore for FileBookmarkStore {
    fn save_bookmark(&self, book_title: &str, bookmark: &Bookmark) -> bool {
        let mut entries = self.load_entries(book_title);
        let value = match serde_json::to_value(bookmark) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("could not encode bookmark for {:?}: {}", book_title, err);
                return false;
            }
        };
        entries.insert(CURRENT_KEY.to_string(), value);
        match self.write_entries(book_title, &entries) {
            Ok(()) => {
                log::debug!(
                    "saved bookmark for {:?} at chapter={} page={}",
                    book_title,
                    bookmark.chapter_index,
                    bookmark.page_index
                );
                true
            }
            Err(err) => {
                log::warn!("could not save bookmark for {:?}: {}", book_title, err);
                false
            }
        }
    }

    fn load_bookmark(&self, book_title: &str) -> Option<Bookmark> {
        let mut entries = self.load_entries(book_title);
        let value = entries.remove(CURRENT_KEY)?;
        match serde_json::from_value(value) {
            Ok(bookmark) => Some(bookmark),
            Err(err) => {
                log::warn!("malformed bookmark for {:?}: {}", book_title, err);
                None
            }
        }
    }

    fn delete_bookmark(&self, book_title: &str) -> bool {
        let path = self.bookmark_path(book_title);
        if !path.exists() {
            return true;
        }
        let mut entries = self.load_entries(book_title);
        if entries.remove(CURRENT_KEY).is_none() {
            return true;
        }
        let result = if entries.is_empty() {
            fs::remove_file(&path)
        } else {
            self.write_entries(book_title, &entries)
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                log::warn!("could not delete bookmark for {:?}: {}", book_title, err);
                false
            }
        }
    }
}

/// Volatile bookmark store for sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryBookmarkStore {
    entries: RefCell<HashMap<String, Bookmark>>,
}

impl MemoryBookmarkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookmarkStore for MemoryBookmarkStore {
    fn save_bookmark(&self, book_title: &str, bookmark: &Bookmark) -> bool {
        self.entries
            .borrow_mut()
            .insert(sanitize_title(book_title), bookmark.clone());
        true
    }

    fn load_bookmark(&self, book_title: &str) -> Option<Bookmark> {
        self.entries
            .borrow()
            .get(&sanitize_title(book_title))
            .cloned()
    }

    fn delete_bookmark(&self, book_title: &str) -> bool {
        self.entries.borrow_mut().remove(&sanitize_title(book_title));
        true
    }
}

fn write_json_file(path: &Path, entries: &Map<String, Value>) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.flush()?;
    let file: File = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()
}

fn remove_file_quiet(path: &Path) {
    let _ = fs::remove_file(path);
}
