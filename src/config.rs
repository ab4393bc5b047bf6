//! Reader configuration loaded from `config.json`.
//!
//! Every section and field is optional in the file; anything missing falls
//! back to the built-in defaults. A file that cannot be read or decoded is
//! reported with `log::warn!` and replaced wholesale by [`Config::default`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TreadError;

/// Library directory used when `books_dir` is absent or empty.
pub const DEFAULT_BOOKS_DIR: &str = "books";

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for books, relative to the config file's directory.
    pub books_dir: String,
    /// Key bindings for reading mode and the chapter menu.
    pub keybinds: Keybinds,
    /// Plain-text import formatting.
    pub formatting: FormattingConfig,
    /// Bookmark automation.
    pub bookmarks: BookmarkConfig,
    /// Viewport chrome and responsive breakpoints.
    pub display: DisplayConfig,
    /// Reading-mode defaults.
    pub reading: ReadingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            books_dir: DEFAULT_BOOKS_DIR.to_string(),
            keybinds: Keybinds::default(),
            formatting: FormattingConfig::default(),
            bookmarks: BookmarkConfig::default(),
            display: DisplayConfig::default(),
            reading: ReadingConfig::default(),
        }
    }
}

impl Config {
    /// Library directory for a configuration read from `config_path`.
    ///
    /// A relative `books_dir` is joined onto the directory holding the
    /// config file; an empty one means [`DEFAULT_BOOKS_DIR`].
    pub fn books_dir_for(&self, config_path: impl AsRef<Path>) -> PathBuf {
        let books_dir = match self.books_dir.trim() {
            "" => DEFAULT_BOOKS_DIR,
            dir => dir,
        };
        let books_dir = Path::new(books_dir);
        if books_dir.is_absolute() {
            return books_dir.to_path_buf();
        }
        config_path
            .as_ref()
            .parent()
            .map_or_else(|| books_dir.to_path_buf(), |root| root.join(books_dir))
    }

    /// Load configuration from `path`, falling back to defaults on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "could not load config {}: {}; using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, surfacing I/O and decode errors.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, TreadError> {
        let payload = fs::read(path)?;
        Self::from_json_slice(&payload)
    }

    /// Decode configuration from a JSON payload.
    pub fn from_json_slice(payload: &[u8]) -> Result<Self, TreadError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Key bindings. Each action maps to every key sequence that triggers it.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybinds {
    pub quit: Vec<String>,
    pub chapter_menu: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub next_chapter: Vec<String>,
    pub prev_chapter: Vec<String>,
    pub start: Vec<String>,
    pub end: Vec<String>,
    pub bookmark_save: Vec<String>,
    pub bookmark_goto: Vec<String>,
    pub chapter_menu_down: Vec<String>,
    pub chapter_menu_up: Vec<String>,
    pub chapter_menu_select: Vec<String>,
    pub chapter_menu_close: Vec<String>,
    pub help: Vec<String>,
    pub toggle_double_page: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|key| (*key).to_string()).collect()
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            quit: keys(&["q"]),
            chapter_menu: keys(&["c"]),
            next_page: keys(&["j", "\u{1b}[B", " ", "\u{1b}[6~"]),
            prev_page: keys(&["k", "\u{1b}[A", "b", "\u{1b}[5~"]),
            next_chapter: keys(&["n"]),
            prev_chapter: keys(&["p"]),
            start: keys(&["s"]),
            end: keys(&["e"]),
            bookmark_save: keys(&["b"]),
            bookmark_goto: keys(&["g"]),
            chapter_menu_down: keys(&["\u{1b}[B", "j"]),
            chapter_menu_up: keys(&["\u{1b}[A", "k"]),
            chapter_menu_select: keys(&["\r"]),
            chapter_menu_close: keys(&["q", "c"]),
            help: keys(&["h"]),
            toggle_double_page: keys(&["d"]),
        }
    }
}

/// Formatting applied when importing plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Blank lines emitted after each paragraph.
    pub paragraph_spacing: usize,
    /// Keep source line breaks as paragraph boundaries.
    pub preserve_line_breaks: bool,
    /// Spaces prefixed to each paragraph.
    pub paragraph_indent: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            paragraph_spacing: 1,
            preserve_line_breaks: true,
            paragraph_indent: 0,
        }
    }
}

/// Bookmark automation switches.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkConfig {
    pub auto_bookmark_on_exit: bool,
    pub auto_load_bookmark_on_open: bool,
}

impl Default for BookmarkConfig {
    fn default() -> Self {
        Self {
            auto_bookmark_on_exit: true,
            auto_load_bookmark_on_open: true,
        }
    }
}

/// One responsive breakpoint: applies to viewports up to `max_width` columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoint {
    /// Breakpoint name (`small`, `medium`, ...).
    pub name: String,
    /// Inclusive upper bound on viewport width.
    pub max_width: usize,
    /// Horizontal padding on each side of the text column.
    pub padding_x: usize,
    /// Whether viewports in this range default to double-page mode.
    pub double_page_mode: bool,
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_width: 9999,
            padding_x: 30,
            double_page_mode: false,
        }
    }
}

impl Breakpoint {
    fn named(name: &str, max_width: usize, padding_x: usize) -> Self {
        Self {
            name: name.to_string(),
            max_width,
            padding_x,
            double_page_mode: false,
        }
    }
}

/// Display chrome configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pick horizontal padding from `breakpoints` instead of the fallback.
    pub responsive_padding: bool,
    /// Padding used when responsive padding is off or nothing matches.
    pub fallback_padding_x: usize,
    /// Draw a panel border around the page.
    pub show_border: bool,
    /// Responsive breakpoints; order in the file does not matter.
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            responsive_padding: true,
            fallback_padding_x: 30,
            show_border: true,
            breakpoints: vec![
                Breakpoint::named("small", 80, 2),
                Breakpoint::named("medium", 120, 8),
                Breakpoint::named("large", 160, 20),
                Breakpoint::named("extra_large", 9999, 35),
            ],
        }
    }
}

impl DisplayConfig {
    /// Narrowest breakpoint whose `max_width` accommodates `viewport_width`.
    pub fn breakpoint_for(&self, viewport_width: usize) -> Option<&Breakpoint> {
        self.breakpoints
            .iter()
            .filter(|bp| viewport_width <= bp.max_width)
            .min_by_key(|bp| bp.max_width)
    }

    /// Horizontal padding for a viewport of `viewport_width` columns.
    pub fn padding_x_for(&self, viewport_width: usize) -> usize {
        if !self.responsive_padding {
            return self.fallback_padding_x;
        }
        self.breakpoint_for(viewport_width)
            .map(|bp| bp.padding_x)
            .unwrap_or(self.fallback_padding_x)
    }

    /// Double-page default for a viewport of `viewport_width` columns.
    pub fn double_page_for(&self, viewport_width: usize) -> bool {
        self.breakpoint_for(viewport_width)
            .map(|bp| bp.double_page_mode)
            .unwrap_or(false)
    }
}

/// Reading-mode defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    /// Start new sessions in double-page mode.
    pub double_page_mode: bool,
    /// Separator drawn between the two columns of a double page.
    pub double_page_separator: String,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            double_page_mode: false,
            double_page_separator: " │ ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let cfg = Config::from_json_slice(br#"{"reading": {"double_page_mode": true}}"#)
            .expect("partial config should decode");
        assert!(cfg.reading.double_page_mode);
        assert_eq!(cfg.reading.double_page_separator, " │ ");
        assert_eq!(cfg.keybinds, Keybinds::default());
        assert_eq!(cfg.display.breakpoints.len(), 4);
    }

    #[test]
    fn breakpoint_lookup_uses_narrowest_match_regardless_of_order() {
        let display = DisplayConfig {
            breakpoints: vec![
                Breakpoint::named("wide", 9999, 35),
                Breakpoint::named("narrow", 80, 2),
            ],
            ..DisplayConfig::default()
        };
        assert_eq!(display.padding_x_for(60), 2);
        assert_eq!(display.padding_x_for(81), 35);
    }

    #[test]
    fn padding_falls_back_when_responsive_padding_is_off() {
        let display = DisplayConfig {
            responsive_padding: false,
            fallback_padding_x: 12,
            ..DisplayConfig::default()
        };
        assert_eq!(display.padding_x_for(60), 12);
    }

    #[test]
    fn padding_falls_back_when_no_breakpoint_matches() {
        let display = DisplayConfig {
            breakpoints: vec![Breakpoint::named("small", 80, 2)],
            ..DisplayConfig::default()
        };
        assert_eq!(display.padding_x_for(200), 30);
        assert!(!display.double_page_for(200));
    }

    #[test]
    fn breakpoint_double_page_flag_is_read() {
        let cfg = Config::from_json_slice(
            br#"{"display": {"breakpoints": [
                {"name": "small", "max_width": 100, "padding_x": 2},
                {"name": "wide", "max_width": 9999, "padding_x": 4, "double_page_mode": true}
            ]}}"#,
        )
        .expect("config should decode");
        assert!(!cfg.display.double_page_for(90));
        assert!(cfg.display.double_page_for(180));
    }

    #[test]
    fn books_dir_resolves_against_config_directory() {
        let cfg = Config::default();
        assert_eq!(
            cfg.books_dir_for("/home/reader/tread/config.json"),
            PathBuf::from("/home/reader/tread/books")
        );
        assert_eq!(cfg.books_dir_for("config.json"), PathBuf::from("books"));

        let blank = Config::from_json_slice(br#"{"books_dir": "  "}"#).expect("config should decode");
        assert_eq!(
            blank.books_dir_for("/etc/tread/config.json"),
            PathBuf::from("/etc/tread/books")
        );

        let custom =
            Config::from_json_slice(br#"{"books_dir": "shelf/novels"}"#).expect("config should decode");
        assert_eq!(
            custom.books_dir_for("/etc/tread/config.json"),
            PathBuf::from("/etc/tread/shelf/novels")
        );
    }

    #[test]
    fn absolute_books_dir_is_used_as_is() {
        let root = std::env::temp_dir().join("tread-shelf");
        let cfg = Config {
            books_dir: root.to_string_lossy().into_owned(),
            ..Config::default()
        };
        assert_eq!(cfg.books_dir_for("/etc/tread/config.json"), root);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(
            Config::from_json_slice(b"{not json"),
            Err(TreadError::Json(_))
        ));
    }
}
