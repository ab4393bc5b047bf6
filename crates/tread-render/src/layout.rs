//! Viewport geometry, layout parameters and whole-chapter layout.

use serde::Serialize;
use tread::{DisplayConfig, ReadingConfig};

use crate::compose::{column_width, compose};
use crate::paginate::{paginate, Page};
use crate::reflow::reflow;

/// Columns taken by the panel border and its inner margin.
pub const PANEL_BORDER: usize = 4;
/// Blank rows above and below the text inside the panel.
pub const PANEL_PADDING_Y: usize = 1;
/// Rows taken by the panel title, subtitle and prompt.
pub const PANEL_EXTRA_HEIGHT: usize = 3;
/// Extra rows reserved below the panel.
pub const PANEL_HEIGHT_OFFSET: usize = 0;
/// Narrowest wrap width of a double-page column.
pub const MIN_COLUMN_TEXT_WIDTH: usize = 20;
/// Columns kept clear on each side of a double-page column.
pub const COLUMN_GUTTER: usize = 2;
/// Separator used when the configuration does not provide one.
pub const DEFAULT_SEPARATOR: &str = " │ ";

/// Terminal size in character cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Text area left inside the reading panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayDimensions {
    pub panel_width: usize,
    pub padding_x: usize,
    pub text_width: usize,
    pub visible_height: usize,
}

impl DisplayDimensions {
    /// Measure the text area for `viewport` under `display`.
    ///
    /// Width and height never drop below one cell.
    pub fn measure(viewport: Viewport, display: &DisplayConfig) -> Self {
        let padding_x = display.padding_x_for(viewport.width);
        let panel_width = viewport.width.saturating_sub(PANEL_BORDER);
        let text_width = panel_width.saturating_sub(padding_x * 2).max(1);
        let visible_height = viewport
            .height
            .saturating_sub(PANEL_EXTRA_HEIGHT + PANEL_HEIGHT_OFFSET + PANEL_PADDING_Y * 2)
            .max(1);
        Self {
            panel_width,
            padding_x,
            text_width,
            visible_height,
        }
    }
}

/// Session override of the double-page layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DoublePageMode {
    /// Follow the configuration.
    #[default]
    Unset,
    /// Forced on or off for this session.
    Forced(bool),
}

impl DoublePageMode {
    /// Effective mode when the configuration alone would pick `computed`.
    pub fn resolve(self, computed: bool) -> bool {
        match self {
            Self::Unset => computed,
            Self::Forced(enabled) => enabled,
        }
    }

    /// Mode after one toggle.
    pub fn toggled(self, computed: bool) -> Self {
        Self::Forced(!self.resolve(computed))
    }
}

/// Double-page default from the configuration for a given viewport width.
pub fn configured_double_page(
    viewport_width: usize,
    display: &DisplayConfig,
    reading: &ReadingConfig,
) -> bool {
    reading.double_page_mode || display.double_page_for(viewport_width)
}

/// Everything that determines how a chapter is split into pages.
///
/// Layout output is a pure function of chapter content and these params.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LayoutParams {
    pub text_width: usize,
    pub visible_height: usize,
    pub double_page: bool,
    pub separator: String,
}

impl LayoutParams {
    /// Single-column params.
    pub fn single(text_width: usize, visible_height: usize) -> Self {
        Self {
            text_width,
            visible_height,
            double_page: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Two-column params joined by `separator`.
    pub fn double(text_width: usize, visible_height: usize, separator: impl Into<String>) -> Self {
        Self {
            text_width,
            visible_height,
            double_page: true,
            separator: separator.into(),
        }
    }

    /// Params for `viewport` under the given configuration and override.
    pub fn resolve(
        viewport: Viewport,
        display: &DisplayConfig,
        reading: &ReadingConfig,
        mode: DoublePageMode,
    ) -> Self {
        let dims = DisplayDimensions::measure(viewport, display);
        let double_page = mode.resolve(configured_double_page(viewport.width, display, reading));
        let params = if double_page {
            Self::double(
                dims.text_width,
                dims.visible_height,
                reading.double_page_separator.as_str(),
            )
        } else {
            Self::single(dims.text_width, dims.visible_height)
        };
        log::debug!(
            "layout params viewport={}x{} text_width={} height={} double={}",
            viewport.width,
            viewport.height,
            params.text_width,
            params.visible_height,
            params.double_page
        );
        params
    }

    /// Width at which chapter text is wrapped.
    pub fn wrap_width(&self) -> usize {
        if !self.double_page {
            return self.text_width;
        }
        column_width(self.text_width, &self.separator)
            .saturating_sub(COLUMN_GUTTER)
            .max(MIN_COLUMN_TEXT_WIDTH)
    }
}

/// Lay out one chapter: reflow, paginate and, in double-page mode, pair up.
pub fn layout_chapter(content: &str, params: &LayoutParams) -> Vec<Page> {
    let lines = reflow(content, params.wrap_width());
    let pages = paginate(&lines, params.visible_height);
    if params.double_page {
        compose(&pages, params.text_width, &params.separator)
    } else {
        pages
    }
}

/// Memo of the most recent chapter layout.
///
/// Keyed by chapter index and the full [`LayoutParams`], so any resize or
/// mode change misses.
#[derive(Clone, Debug, Default)]
pub struct ChapterLayoutCache {
    key: Option<(usize, LayoutParams)>,
    pages: Vec<Page>,
}

impl ChapterLayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages of chapter `chapter_index`, laying it out on a miss.
    pub fn pages(&mut self, chapter_index: usize, content: &str, params: &LayoutParams) -> &[Page] {
        let hit = matches!(&self.key, Some((idx, cached)) if *idx == chapter_index && cached == params);
        if !hit {
            self.pages = layout_chapter(content, params);
            self.key = Some((chapter_index, params.clone()));
            log::debug!(
                "layout miss chapter={} pages={}",
                chapter_index,
                self.pages.len()
            );
        }
        &self.pages
    }

    /// Drop the cached layout.
    pub fn clear(&mut self) {
        self.key = None;
        self.pages.clear();
    }
}
