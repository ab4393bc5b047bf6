//! Greedy word wrap over marked-up text.

use crate::markup::{is_blank, split_words, visible_len};

/// Wrap `text` into lines of at most `width` visible characters.
///
/// Each `\n`-delimited segment is wrapped independently; a blank segment
/// yields exactly one empty line. Words longer than `width` are placed alone
/// on their own line rather than split. A `width` of zero is treated as one.
pub fn reflow(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::with_capacity(text.len() / width + 1);
    for segment in text.split('\n') {
        if is_blank(segment) {
            out.push(String::new());
            continue;
        }
        wrap_segment(segment, width, &mut out);
    }
    out
}

fn wrap_segment(segment: &str, width: usize, out: &mut Vec<String>) {
    let mut line = String::with_capacity(width + 16);
    let mut line_len = 0usize;
    for word in split_words(segment) {
        let word_len = visible_len(word);
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= width {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            out.push(core::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
}
