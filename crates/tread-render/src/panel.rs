//! Text panel around a page: a titled border, or bare padding when the
//! border is switched off.

use crate::layout::DisplayDimensions;
use crate::markup::{strip_markup, truncate_visible, visible_len};

const TOP_LEFT: char = '╭';
const TOP_RIGHT: char = '╮';
const BOTTOM_LEFT: char = '╰';
const BOTTOM_RIGHT: char = '╯';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

/// Frame `lines` for display inside the measured text area.
///
/// Content rows are cut to `dims.text_width` and padded by `dims.padding_x`
/// on both sides. With `show_border` the rows are boxed and `title` is
/// centred in the top edge; without it the title becomes a plain first row.
pub fn frame(
    title: &str,
    lines: &[String],
    dims: &DisplayDimensions,
    show_border: bool,
    padding_y: usize,
) -> Vec<String> {
    let side = " ".repeat(dims.padding_x);
    let blank = " ".repeat(dims.text_width);
    let mut body = Vec::with_capacity(lines.len() + padding_y * 2);
    body.extend((0..padding_y).map(|_| blank.clone()));
    body.extend(lines.iter().map(|line| fit_row(line, dims.text_width)));
    body.extend((0..padding_y).map(|_| blank.clone()));

    if !show_border {
        let mut out = Vec::with_capacity(body.len() + 1);
        out.push(format!("{side}{}", truncate_visible(title, dims.text_width)));
        out.extend(body.into_iter().map(|row| format!("{side}{row}")));
        return out;
    }

    let inner = dims.text_width + dims.padding_x * 2;
    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(top_edge(title, inner));
    out.extend(
        body.into_iter()
            .map(|row| format!("{VERTICAL}{side}{row}{side}{VERTICAL}")),
    );
    let mut bottom = String::with_capacity(inner + 2);
    bottom.push(BOTTOM_LEFT);
    bottom.extend(core::iter::repeat_n(HORIZONTAL, inner));
    bottom.push(BOTTOM_RIGHT);
    out.push(bottom);
    out
}

fn fit_row(line: &str, width: usize) -> String {
    let mut row = truncate_visible(line, width);
    let pad = width.saturating_sub(visible_len(&row));
    row.extend(core::iter::repeat_n(' ', pad));
    row
}

fn top_edge(title: &str, inner: usize) -> String {
    let plain = strip_markup(title);
    let label: String = if plain.is_empty() || inner < 3 {
        String::new()
    } else {
        let text: String = plain.chars().take(inner - 2).collect();
        format!(" {text} ")
    };
    let label_len = label.chars().count();
    let left = (inner - label_len) / 2;
    let right = inner - label_len - left;

    let mut edge = String::with_capacity(inner + 2);
    edge.push(TOP_LEFT);
    edge.extend(core::iter::repeat_n(HORIZONTAL, left));
    edge.push_str(&label);
    edge.extend(core::iter::repeat_n(HORIZONTAL, right));
    edge.push(TOP_RIGHT);
    edge
}
