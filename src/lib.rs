//! tread -- book model, configuration and bookmark storage for a paginated
//! terminal reader.
//!
//! This crate owns the data side of the reader: chapters in spine order,
//! plain-text import, the JSON configuration file, the per-book bookmark
//! store and the library listing. Layout and navigation live in `tread-render`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tread::{Config, Document, FileBookmarkStore, BookmarkStore};
//!
//! # fn example() -> Result<(), tread::TreadError> {
//! let config = Config::load("config.json");
//! let doc = Document::open_json("book.json")?;
//! let store = FileBookmarkStore::new("bookmarks");
//! if let Some(bookmark) = store.load_bookmark(doc.title()) {
//!     println!("resume at chapter {}", bookmark.chapter_index + 1);
//! }
//! # let _ = config;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod book;
pub mod bookmarks;
pub mod config;
pub mod error;
pub mod library;
pub mod text_import;

pub use book::{BookMetadata, Chapter, Document};
pub use bookmarks::{
    sanitize_title, Bookmark, BookmarkStore, FileBookmarkStore, MemoryBookmarkStore,
};
pub use config::{
    BookmarkConfig, Breakpoint, Config, DisplayConfig, FormattingConfig, Keybinds, ReadingConfig,
    DEFAULT_BOOKS_DIR,
};
pub use error::TreadError;
pub use library::{list_books, BookInfo};
pub use text_import::format_plain_text;
