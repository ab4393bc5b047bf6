//! Key to command mapping and the chapter menu model.

use tread::{Document, Keybinds};

/// Action requested while reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReaderCommand {
    Quit,
    ChapterMenu,
    Help,
    SaveBookmark,
    GotoBookmark,
    NextPage,
    PrevPage,
    NextChapter,
    PrevChapter,
    Start,
    End,
    ToggleDoublePage,
}

impl ReaderCommand {
    /// Command bound to `key`, if any.
    ///
    /// Matching is case-insensitive. When a key is bound to several commands
    /// the first in this order wins: quit, chapter menu, help, bookmark save,
    /// bookmark goto, next page, previous page, next chapter, previous
    /// chapter, start, end, toggle double page.
    pub fn resolve(key: &str, binds: &Keybinds) -> Option<Self> {
        let key = key.to_lowercase();
        let table: [(&[String], Self); 12] = [
            (binds.quit.as_slice(), Self::Quit),
            (binds.chapter_menu.as_slice(), Self::ChapterMenu),
            (binds.help.as_slice(), Self::Help),
            (binds.bookmark_save.as_slice(), Self::SaveBookmark),
            (binds.bookmark_goto.as_slice(), Self::GotoBookmark),
            (binds.next_page.as_slice(), Self::NextPage),
            (binds.prev_page.as_slice(), Self::PrevPage),
            (binds.next_chapter.as_slice(), Self::NextChapter),
            (binds.prev_chapter.as_slice(), Self::PrevChapter),
            (binds.start.as_slice(), Self::Start),
            (binds.end.as_slice(), Self::End),
            (binds.toggle_double_page.as_slice(), Self::ToggleDoublePage),
        ];
        table
            .into_iter()
            .find(|(bound, _)| is_bound(bound, &key))
            .map(|(_, command)| command)
    }
}

/// Action requested while the chapter menu is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Close,
    Select,
    Down,
    Up,
    Help,
}

impl MenuCommand {
    /// Menu command bound to `key`, if any. Close wins over navigation.
    pub fn resolve(key: &str, binds: &Keybinds) -> Option<Self> {
        let key = key.to_lowercase();
        let table: [(&[String], Self); 5] = [
            (binds.chapter_menu_close.as_slice(), Self::Close),
            (binds.chapter_menu_select.as_slice(), Self::Select),
            (binds.chapter_menu_down.as_slice(), Self::Down),
            (binds.chapter_menu_up.as_slice(), Self::Up),
            (binds.help.as_slice(), Self::Help),
        ];
        table
            .into_iter()
            .find(|(bound, _)| is_bound(bound, &key))
            .map(|(_, command)| command)
    }
}

fn is_bound(bound: &[String], key: &str) -> bool {
    bound.iter().any(|candidate| candidate.to_lowercase() == key)
}

/// Rows of the menu panel that are not chapter entries.
pub const MENU_CHROME_LINES: usize = 4;

/// Chapter menu state: a cursor over the chapter list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChapterMenu {
    cursor: usize,
}

/// Slice of the chapter list visible in the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuWindow {
    pub start: usize,
    pub end: usize,
}

impl MenuWindow {
    pub fn more_above(&self) -> bool {
        self.start > 0
    }

    pub fn more_below(&self, chapter_count: usize) -> bool {
        self.end < chapter_count
    }
}

impl ChapterMenu {
    /// Menu with the cursor on `chapter_index`.
    pub fn at(chapter_index: usize) -> Self {
        Self {
            cursor: chapter_index,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move down one entry. Returns `false` at the last chapter.
    pub fn move_down(&mut self, chapter_count: usize) -> bool {
        if self.cursor + 1 < chapter_count {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move up one entry. Returns `false` at the first chapter.
    pub fn move_up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Entries shown for a panel of `visible_height` rows, keeping the
    /// cursor centred where the list allows it.
    pub fn window(&self, visible_height: usize, chapter_count: usize) -> MenuWindow {
        let available = visible_height.saturating_sub(MENU_CHROME_LINES).max(1);
        let start = self
            .cursor
            .saturating_sub(available / 2)
            .min(chapter_count.saturating_sub(available));
        let end = (start + available).min(chapter_count);
        MenuWindow { start, end }
    }

    /// Menu panel text for `doc`, padded to `visible_height` rows.
    ///
    /// The first visible entry is replaced by a marker when chapters are
    /// scrolled off the top.
    pub fn lines(&self, doc: &Document, visible_height: usize) -> Vec<String> {
        let count = doc.chapter_count();
        let window = self.window(visible_height, count);
        let mut lines = Vec::with_capacity(visible_height.max(MENU_CHROME_LINES + 2));
        lines.push("[bold]Table of Contents[/bold]".to_string());
        lines.push(String::new());
        for (idx, chapter) in doc
            .chapters()
            .iter()
            .enumerate()
            .take(window.end)
            .skip(window.start)
        {
            let marker = if idx == self.cursor { '>' } else { ' ' };
            lines.push(format!("{marker} {:2}. {}", idx + 1, chapter.title));
        }
        if window.more_above() && lines.len() > 2 {
            lines[2] = "... (more chapters above)".to_string();
        }
        if window.more_below(count) {
            lines.push("... (more chapters below)".to_string());
        }
        lines.push(String::new());
        lines.push("Press Enter to select, 'c' to close, ↑↓ to navigate".to_string());
        if lines.len() < visible_height {
            lines.resize(visible_height, String::new());
        }
        lines
    }
}
