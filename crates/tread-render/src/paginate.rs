//! Split reflowed lines into fixed-height pages.

use serde::Serialize;

use crate::markup::{
    is_blank, render_close, render_open, sanitize_line, track_open_from, OpenSpan, SpanStack,
};

/// How many trailing lines of a full page are searched for a paragraph break.
pub const PARAGRAPH_LOOKBACK: usize = 5;

/// One screenful of text lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    lines: Vec<String>,
}

impl Page {
    /// Page holding exactly `lines`.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Page of `height` empty lines.
    pub fn blank(height: usize) -> Self {
        Self {
            lines: vec![String::new(); height],
        }
    }

    /// `lines` padded (or cut) to exactly `height` lines.
    pub fn padded(mut lines: Vec<String>, height: usize) -> Self {
        lines.resize(height, String::new());
        Self { lines }
    }

    /// Lines of this page, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the lines out of this page.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Line count.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// True when every line is blank.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| is_blank(line))
    }
}

/// Split `lines` into pages of exactly `visible_height` lines.
///
/// A full page with more text to follow ends at the newest blank line among
/// its last [`PARAGRAPH_LOOKBACK`] lines when there is one (never the first
/// line); otherwise it is cut hard. Every page is balanced with
/// [`finalize_page`], and spans left open at the end of one page are
/// re-opened at the start of the next.
pub fn paginate<S: AsRef<str>>(lines: &[S], visible_height: usize) -> Vec<Page> {
    let height = visible_height.max(1);
    let mut pages = Vec::with_capacity(lines.len() / height + 1);
    let mut carried = SpanStack::new();
    let mut start = 0usize;

    while start < lines.len() {
        let end = (start + height).min(lines.len());
        let buffer = &lines[start..end];
        let take = if buffer.len() == height && end < lines.len() {
            paragraph_break(buffer).map_or(buffer.len(), |idx| idx + 1)
        } else {
            buffer.len()
        };
        let page_lines = &buffer[..take];

        let finalized = finalize_page(page_lines, &carried);
        carried = track_open_from(carried, page_lines);
        pages.push(Page::padded(finalized, height));
        start += take;
    }

    log::debug!(
        "paginated lines={} height={} pages={}",
        lines.len(),
        height,
        pages.len()
    );
    pages
}

fn paragraph_break<S: AsRef<str>>(buffer: &[S]) -> Option<usize> {
    let floor = buffer.len().saturating_sub(PARAGRAPH_LOOKBACK).max(1);
    (floor..buffer.len())
        .rev()
        .find(|&idx| is_blank(buffer[idx].as_ref()))
}

/// Balance one page of lines.
///
/// Spans in `start_open` are re-opened at the first non-blank line, closes
/// with no matching open are dropped, and spans still open at the end are
/// closed on the last non-blank line. The result has no net open spans.
pub fn finalize_page<S: AsRef<str>>(lines: &[S], start_open: &[OpenSpan]) -> Vec<String> {
    let mut out: Vec<String> = lines.iter().map(|line| line.as_ref().to_string()).collect();
    if !start_open.is_empty() {
        if let Some(first) = out.iter().position(|line| !is_blank(line)) {
            out[first].insert_str(0, &render_open(start_open));
        }
    }

    let mut stack = SpanStack::new();
    for line in out.iter_mut() {
        *line = sanitize_line(&mut stack, line);
    }

    if !stack.is_empty() {
        if let Some(last) = out.iter().rposition(|line| !is_blank(line)) {
            out[last].push_str(&render_close(&stack));
        }
    }
    out
}
