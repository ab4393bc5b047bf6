//! Reflow, pagination, double-page composition and the reading session for
//! `tread`.
//!
//! Layout is a pure function of chapter text and [`LayoutParams`]:
//! [`reflow`] wraps text, [`paginate`] cuts fixed-height pages that keep
//! inline `[tag]` spans balanced, and [`compose`] pairs pages side by side.
//! [`ReadingSession`] drives navigation on top of that.

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod command;
mod compose;
mod layout;
pub mod markup;
mod paginate;
mod panel;
mod reflow;
mod session;

pub use command::{ChapterMenu, MenuCommand, MenuWindow, ReaderCommand, MENU_CHROME_LINES};
pub use compose::{column_width, compose};
pub use layout::{
    configured_double_page, layout_chapter, ChapterLayoutCache, DisplayDimensions, DoublePageMode,
    LayoutParams, Viewport, COLUMN_GUTTER, DEFAULT_SEPARATOR, MIN_COLUMN_TEXT_WIDTH, PANEL_BORDER,
    PANEL_EXTRA_HEIGHT, PANEL_HEIGHT_OFFSET, PANEL_PADDING_Y,
};
pub use markup::{OpenSpan, SpanStack, SpanTag};
pub use paginate::{finalize_page, paginate, Page, PARAGRAPH_LOOKBACK};
pub use panel::frame;
pub use reflow::reflow;
pub use session::{PageView, Position, ProgressInfo, ReadingSession};
