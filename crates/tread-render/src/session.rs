//! Reading session: position, overlays and navigation across pages and
//! chapters.
//!
//! Every navigation step that depends on page counts takes the
//! [`LayoutParams`] in force, so moves stay consistent when the viewport is
//! resized between them. The page index is re-clamped whenever pages are
//! recomputed.

use serde::{Deserialize, Serialize};
use tread::{Bookmark, BookmarkStore, Config, Document};

use crate::command::{ChapterMenu, MenuCommand, ReaderCommand};
use crate::layout::{configured_double_page, ChapterLayoutCache, DoublePageMode, LayoutParams, Viewport};
use crate::paginate::Page;

/// Reading position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub chapter_index: usize,
    pub page_index: usize,
}

impl Position {
    pub fn new(chapter_index: usize, page_index: usize) -> Self {
        Self {
            chapter_index,
            page_index,
        }
    }
}

/// Integer progress percentages for the current position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProgressInfo {
    /// Percent of the current chapter before this page.
    pub chapter_progress: usize,
    /// Percent of the book before this page.
    pub overall_progress: usize,
    pub total_chapters: usize,
}

impl ProgressInfo {
    /// Progress at `position` in a chapter of `page_count` pages.
    ///
    /// Both values truncate toward zero; an empty chapter or book reports 0.
    pub fn compute(position: Position, page_count: usize, total_chapters: usize) -> Self {
        let chapter_progress = if page_count == 0 {
            0
        } else {
            position.page_index * 100 / page_count
        };
        let overall_progress = if total_chapters == 0 {
            0
        } else {
            (position.chapter_index * 100 + chapter_progress) / total_chapters
        };
        Self {
            chapter_progress,
            overall_progress,
            total_chapters,
        }
    }
}

/// What the renderer needs to draw one screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub page: Page,
    pub position: Position,
    pub page_count: usize,
    pub progress: ProgressInfo,
}

impl PageView {
    pub fn lines(&self) -> &[String] {
        self.page.lines()
    }
}

/// Navigation state machine over one document.
#[derive(Clone, Debug)]
pub struct ReadingSession {
    document: Document,
    config: Config,
    position: Position,
    double_page: DoublePageMode,
    show_chapter_list: bool,
    show_help: bool,
    notification: Option<String>,
    menu: ChapterMenu,
    cache: ChapterLayoutCache,
}

impl ReadingSession {
    /// Session at the start of `document`.
    pub fn new(document: Document, config: Config) -> Self {
        Self {
            document,
            config,
            position: Position::default(),
            double_page: DoublePageMode::Unset,
            show_chapter_list: false,
            show_help: false,
            notification: None,
            menu: ChapterMenu::default(),
            cache: ChapterLayoutCache::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// True when the document has no chapters to show.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    pub fn double_page_mode(&self) -> DoublePageMode {
        self.double_page
    }

    /// Layout params for `viewport` under the session's config and override.
    pub fn layout_params(&self, viewport: Viewport) -> LayoutParams {
        LayoutParams::resolve(
            viewport,
            &self.config.display,
            &self.config.reading,
            self.double_page,
        )
    }

    /// Effective double-page mode at `viewport_width`.
    pub fn effective_double_page(&self, viewport_width: usize) -> bool {
        self.double_page.resolve(configured_double_page(
            viewport_width,
            &self.config.display,
            &self.config.reading,
        ))
    }

    fn page_count(&mut self, chapter_index: usize, params: &LayoutParams) -> usize {
        match self.document.chapter(chapter_index) {
            Some(chapter) => self
                .cache
                .pages(chapter_index, &chapter.content, params)
                .len(),
            None => 0,
        }
    }

    fn clamp_page(&mut self, params: &LayoutParams) -> usize {
        let count = self.page_count(self.position.chapter_index, params);
        self.position.page_index = self.position.page_index.min(count.saturating_sub(1));
        count
    }

    /// Pages of the current chapter, with the page index clamped into range.
    pub fn pages(&mut self, params: &LayoutParams) -> &[Page] {
        self.clamp_page(params);
        match self.document.chapter(self.position.chapter_index) {
            Some(chapter) => self
                .cache
                .pages(self.position.chapter_index, &chapter.content, params),
            None => &[],
        }
    }

    /// Current page plus progress. Re-clamps the page index first.
    pub fn current_view(&mut self, params: &LayoutParams) -> PageView {
        let page_count = self.clamp_page(params);
        let position = self.position;
        let page = match self.document.chapter(position.chapter_index) {
            Some(chapter) => self
                .cache
                .pages(position.chapter_index, &chapter.content, params)
                .get(position.page_index)
                .cloned(),
            None => None,
        }
        .unwrap_or_else(|| Page::blank(params.visible_height.max(1)));
        PageView {
            page,
            position,
            page_count,
            progress: ProgressInfo::compute(position, page_count, self.document.chapter_count()),
        }
    }

    /// Progress at the current position.
    pub fn progress(&mut self, params: &LayoutParams) -> ProgressInfo {
        let page_count = self.clamp_page(params);
        ProgressInfo::compute(self.position, page_count, self.document.chapter_count())
    }

    /// Advance one page, crossing into the next chapter at the end of this
    /// one. Returns `false` at the end of the book.
    pub fn next_page(&mut self, params: &LayoutParams) -> bool {
        let count = self.clamp_page(params);
        if self.position.page_index + 1 < count {
            self.position.page_index += 1;
            log::debug!("next page -> {:?}", self.position);
            return true;
        }
        self.next_chapter()
    }

    /// Go back one page, landing on the last page of the previous chapter
    /// at the start of this one. Returns `false` at the start of the book.
    pub fn prev_page(&mut self, params: &LayoutParams) -> bool {
        self.clamp_page(params);
        if self.position.page_index > 0 {
            self.position.page_index -= 1;
            log::debug!("prev page -> {:?}", self.position);
            return true;
        }
        if self.position.chapter_index == 0 {
            return false;
        }
        let chapter_index = self.position.chapter_index - 1;
        let count = self.page_count(chapter_index, params);
        self.position = Position::new(chapter_index, count.saturating_sub(1));
        log::debug!("prev page crossed chapter -> {:?}", self.position);
        true
    }

    /// First page of the next chapter. Returns `false` in the last chapter.
    pub fn next_chapter(&mut self) -> bool {
        if self.position.chapter_index + 1 < self.document.chapter_count() {
            self.position = Position::new(self.position.chapter_index + 1, 0);
            log::debug!("next chapter -> {}", self.position.chapter_index);
            return true;
        }
        false
    }

    /// First page of the previous chapter. Returns `false` in the first one.
    pub fn prev_chapter(&mut self) -> bool {
        if self.position.chapter_index > 0 {
            self.position = Position::new(self.position.chapter_index - 1, 0);
            log::debug!("prev chapter -> {}", self.position.chapter_index);
            return true;
        }
        false
    }

    /// First page of `chapter_index`. Returns `false` when out of range.
    pub fn navigate_to_chapter(&mut self, chapter_index: usize) -> bool {
        if chapter_index < self.document.chapter_count() {
            self.position = Position::new(chapter_index, 0);
            return true;
        }
        false
    }

    /// Jump to `position`. The page index is clamped on the next layout.
    pub fn seek(&mut self, position: Position) -> bool {
        if position.chapter_index < self.document.chapter_count() {
            self.position = position;
            return true;
        }
        false
    }

    pub fn goto_start(&mut self) {
        self.position = Position::default();
    }

    /// Last page of the last chapter under `params`.
    pub fn goto_end(&mut self, params: &LayoutParams) {
        let Some(last) = self.document.chapter_count().checked_sub(1) else {
            return;
        };
        let count = self.page_count(last, params);
        self.position = Position::new(last, count.saturating_sub(1));
    }

    /// Flip the double-page override. The position is left for the next
    /// layout to clamp.
    pub fn toggle_double_page(&mut self, viewport_width: usize) {
        let computed = configured_double_page(
            viewport_width,
            &self.config.display,
            &self.config.reading,
        );
        self.double_page = self.double_page.toggled(computed);
        let mode = if self.double_page.resolve(computed) {
            "double page"
        } else {
            "single page"
        };
        self.notification = Some(format!("[blue]Switched to {mode} mode[/blue]"));
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Mark the help overlay as shown.
    pub fn dismiss_help(&mut self) {
        self.show_help = false;
    }

    pub fn show_chapter_list(&self) -> bool {
        self.show_chapter_list
    }

    /// Open the chapter menu with the cursor on the current chapter.
    pub fn open_chapter_list(&mut self) {
        self.menu = ChapterMenu::at(self.position.chapter_index);
        self.show_chapter_list = true;
    }

    pub fn chapter_menu(&self) -> &ChapterMenu {
        &self.menu
    }

    /// Chapter menu panel text for `params`.
    pub fn chapter_menu_lines(&self, params: &LayoutParams) -> Vec<String> {
        self.menu.lines(&self.document, params.visible_height)
    }

    /// Handle a key while the chapter menu is open.
    ///
    /// Cursor moves take the reader along to the highlighted chapter.
    /// Closing the menu, by either key, leaves the reader on its first page.
    pub fn apply_menu(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Close | MenuCommand::Select => {
                self.navigate_to_chapter(self.menu.cursor());
                self.show_chapter_list = false;
            }
            MenuCommand::Down => {
                if self.menu.move_down(self.document.chapter_count()) {
                    self.navigate_to_chapter(self.menu.cursor());
                }
            }
            MenuCommand::Up => {
                if self.menu.move_up() {
                    self.navigate_to_chapter(self.menu.cursor());
                }
            }
            MenuCommand::Help => self.show_help = true,
        }
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// One-shot message for the renderer; cleared once taken.
    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    pub fn set_notification(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
    }

    /// Save the current position for this book.
    pub fn save_bookmark(&self, store: &dyn BookmarkStore) -> bool {
        let title = self
            .document
            .chapter(self.position.chapter_index)
            .map(|chapter| chapter.title.clone())
            .unwrap_or_else(|| format!("Chapter {}", self.position.chapter_index + 1));
        let bookmark = Bookmark::now(self.position.chapter_index, self.position.page_index, title);
        store.save_bookmark(self.document.title(), &bookmark)
    }

    /// Move to the saved bookmark. Returns `false` when there is none or it
    /// points past the last chapter.
    pub fn load_bookmark(&mut self, store: &dyn BookmarkStore) -> bool {
        match store.load_bookmark(self.document.title()) {
            Some(bookmark) => self.seek(Position::new(bookmark.chapter_index, bookmark.page_index)),
            None => false,
        }
    }

    pub fn has_bookmark(&self, store: &dyn BookmarkStore) -> bool {
        store.has_bookmark(self.document.title())
    }

    /// Human-readable description of the saved bookmark.
    pub fn bookmark_info(&self, store: &dyn BookmarkStore) -> String {
        let Some(bookmark) = store.load_bookmark(self.document.title()) else {
            return "No bookmark found".to_string();
        };
        match self.document.chapter(bookmark.chapter_index) {
            Some(chapter) => format!(
                "Chapter {}: {} (Page {})",
                bookmark.chapter_index + 1,
                chapter.title,
                bookmark.page_index + 1
            ),
            None => format!(
                "Chapter {} (Page {})",
                bookmark.chapter_index + 1,
                bookmark.page_index + 1
            ),
        }
    }

    /// Resume from the saved bookmark when the config asks for it.
    pub fn resume(&mut self, store: &dyn BookmarkStore) -> bool {
        if !self.config.bookmarks.auto_load_bookmark_on_open {
            return false;
        }
        self.load_bookmark(store)
    }

    /// Save on exit when the config asks for it.
    pub fn auto_save(&mut self, store: &dyn BookmarkStore) -> bool {
        if !self.config.bookmarks.auto_bookmark_on_exit {
            return false;
        }
        let saved = self.save_bookmark(store);
        if saved {
            self.notification = Some("[green]Auto-saved bookmark[/green]".to_string());
        }
        saved
    }

    fn goto_bookmark(&mut self, store: &dyn BookmarkStore) {
        let message = if !self.has_bookmark(store) {
            "[yellow]No bookmark found for this book![/yellow]".to_string()
        } else if self.load_bookmark(store) {
            format!("Jumped to bookmark: {}", self.bookmark_info(store))
        } else {
            "[red]Failed to load bookmark![/red]".to_string()
        };
        self.notification = Some(message);
    }

    /// Execute `command` for `viewport`. Returns `false` on quit.
    pub fn apply(
        &mut self,
        command: ReaderCommand,
        viewport: Viewport,
        store: &dyn BookmarkStore,
    ) -> bool {
        let params = self.layout_params(viewport);
        match command {
            ReaderCommand::Quit => return false,
            ReaderCommand::ChapterMenu => self.open_chapter_list(),
            ReaderCommand::Help => self.show_help = true,
            ReaderCommand::SaveBookmark => {
                let message = if self.save_bookmark(store) {
                    "Bookmark saved!"
                } else {
                    "[red]Failed to save bookmark![/red]"
                };
                self.notification = Some(message.to_string());
            }
            ReaderCommand::GotoBookmark => self.goto_bookmark(store),
            ReaderCommand::NextPage => {
                self.next_page(&params);
            }
            ReaderCommand::PrevPage => {
                self.prev_page(&params);
            }
            ReaderCommand::NextChapter => {
                self.next_chapter();
            }
            ReaderCommand::PrevChapter => {
                self.prev_chapter();
            }
            ReaderCommand::Start => self.goto_start(),
            ReaderCommand::End => self.goto_end(&params),
            ReaderCommand::ToggleDoublePage => self.toggle_double_page(viewport.width),
        }
        true
    }

    /// Header line for `view`: book, overall percent, chapter and page.
    pub fn status_line(&self, view: &PageView) -> String {
        let chapter = self
            .document
            .chapter(view.position.chapter_index)
            .map_or("Unknown", |chapter| chapter.title.as_str());
        format!(
            "{} [{}%] | {} ({}/{})",
            self.document.title(),
            view.progress.overall_progress,
            chapter,
            view.position.page_index + 1,
            view.page_count.max(1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tread::{BookMetadata, Chapter, MemoryBookmarkStore};

    fn session(contents: &[&str]) -> ReadingSession {
        let chapters = contents
            .iter()
            .enumerate()
            .map(|(i, content)| Chapter::new(format!("Ch{}", i + 1), *content, format!("c{i}")))
            .collect();
        ReadingSession::new(
            Document::new(BookMetadata::titled("Book"), chapters),
            Config::default(),
        )
    }

    #[test]
    fn progress_uses_integer_truncation() {
        let info = ProgressInfo::compute(Position::new(1, 1), 3, 3);
        assert_eq!(info.chapter_progress, 33);
        assert_eq!(info.overall_progress, 44);
        assert_eq!(ProgressInfo::compute(Position::new(0, 0), 0, 0), ProgressInfo::default());
    }

    #[test]
    fn current_view_clamps_page_index() {
        let mut s = session(&["a\nb\nc\nd"]);
        assert!(s.seek(Position::new(0, 9)));
        let view = s.current_view(&LayoutParams::single(10, 2));
        assert_eq!(view.position, Position::new(0, 1));
        assert_eq!(view.page_count, 2);
        assert_eq!(view.lines(), &["c", "d"]);
    }

    #[test]
    fn empty_chapter_shows_one_blank_page() {
        let mut s = session(&[""]);
        let view = s.current_view(&LayoutParams::single(10, 3));
        assert_eq!(view.page_count, 1);
        assert!(view.page.is_blank());
    }

    #[test]
    fn toggle_sets_notification_and_keeps_position() {
        let mut s = session(&["a", "b"]);
        s.next_chapter();
        s.toggle_double_page(100);
        assert_eq!(s.double_page_mode(), DoublePageMode::Forced(true));
        assert_eq!(s.take_notification().as_deref(), Some("[blue]Switched to double page mode[/blue]"));
        assert_eq!(s.take_notification(), None);
        assert_eq!(s.position(), Position::new(1, 0));
    }

    #[test]
    fn menu_cursor_moves_chapter_and_closing_resets_page() {
        let mut s = session(&["a", "b", "c"]);
        assert!(s.seek(Position::new(0, 2)));
        s.open_chapter_list();
        s.apply_menu(MenuCommand::Down);
        assert_eq!(s.position().chapter_index, 1);
        assert!(s.show_chapter_list());
        s.apply_menu(MenuCommand::Close);
        assert_eq!(s.position(), Position::new(1, 0));
        assert!(!s.show_chapter_list());

        s.open_chapter_list();
        s.apply_menu(MenuCommand::Down);
        s.apply_menu(MenuCommand::Down);
        assert_eq!(s.position().chapter_index, 2);
        s.apply_menu(MenuCommand::Up);
        s.apply_menu(MenuCommand::Select);
        assert_eq!(s.position(), Position::new(1, 0));
    }

    #[test]
    fn closing_menu_without_moving_returns_to_chapter_start() {
        let mut s = session(&["a", "b"]);
        assert!(s.seek(Position::new(1, 3)));
        s.open_chapter_list();
        s.apply_menu(MenuCommand::Close);
        assert_eq!(s.position(), Position::new(1, 0));
    }

    #[test]
    fn goto_bookmark_reports_missing_then_jumps() {
        let store = MemoryBookmarkStore::new();
        let viewport = Viewport::new(100, 40);
        let mut s = session(&["a", "b"]);
        assert!(s.apply(ReaderCommand::GotoBookmark, viewport, &store));
        assert_eq!(
            s.take_notification().as_deref(),
            Some("[yellow]No bookmark found for this book![/yellow]")
        );

        s.next_chapter();
        s.apply(ReaderCommand::SaveBookmark, viewport, &store);
        assert_eq!(s.take_notification().as_deref(), Some("Bookmark saved!"));
        s.goto_start();
        s.apply(ReaderCommand::GotoBookmark, viewport, &store);
        assert_eq!(s.position(), Position::new(1, 0));
        assert_eq!(
            s.take_notification().as_deref(),
            Some("Jumped to bookmark: Chapter 2: Ch2 (Page 1)")
        );
        assert!(!s.apply(ReaderCommand::Quit, viewport, &store));
    }

    #[test]
    fn status_line_reports_book_chapter_and_page() {
        let mut s = session(&["a\nb\nc", "d"]);
        let params = LayoutParams::single(10, 1);
        s.next_page(&params);
        let view = s.current_view(&params);
        assert_eq!(s.status_line(&view), "Book [16%] | Ch1 (2/3)");
    }
}
