//! Side-by-side double-page composition.

use crate::markup::{
    is_blank, render_close, render_open, sanitize_line, truncate_visible, visible_len, SpanStack,
};
use crate::paginate::Page;

/// Width of one column when `separator` splits `total_width` in two.
pub fn column_width(total_width: usize, separator: &str) -> usize {
    total_width.saturating_sub(visible_len(separator)) / 2
}

/// Pair consecutive pages into two-column pages.
///
/// An odd trailing page gets a blank right column. Each cell is balanced on
/// its own, cut to the column width on visible characters and padded with
/// spaces, so markup never crosses the separator.
pub fn compose(pages: &[Page], total_width: usize, separator: &str) -> Vec<Page> {
    let width = column_width(total_width, separator);
    pages
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => compose_pair(left, right, width, separator),
            [left] => compose_pair(left, &Page::blank(left.height()), width, separator),
            _ => Page::default(),
        })
        .collect()
}

fn compose_pair(left: &Page, right: &Page, width: usize, separator: &str) -> Page {
    let rows = left.height().max(right.height());
    let left_cells = column_cells(left, rows, width);
    let right_cells = column_cells(right, rows, width);
    let lines = left_cells
        .into_iter()
        .zip(right_cells)
        .map(|(l, r)| format!("{l}{separator}{r}"))
        .collect();
    Page::new(lines)
}

fn column_cells(page: &Page, rows: usize, width: usize) -> Vec<String> {
    let mut stack = SpanStack::new();
    (0..rows)
        .map(|row| {
            let line = page.lines().get(row).map_or("", String::as_str);
            let reopen = render_open(&stack);
            let body = sanitize_line(&mut stack, line);
            let cell = if is_blank(&body) {
                body
            } else {
                format!("{reopen}{body}{}", render_close(&stack))
            };
            fit_cell(&cell, width)
        })
        .collect()
}

fn fit_cell(cell: &str, width: usize) -> String {
    let mut out = truncate_visible(cell, width);
    let pad = width.saturating_sub(visible_len(&out));
    out.extend(core::iter::repeat_n(' ', pad));
    out
}
