//! Inline span markup: `[bold]...[/bold]` style markers.
//!
//! Markers are bracketed. An opening marker starts with an ASCII letter and
//! may carry attributes (`[bold red]`); its identity is the first
//! whitespace-delimited token. A closing marker is `[/name]`, and `[/]`
//! closes the innermost open span. A marker never contains `[` or `]`;
//! anything that does not parse as a marker (`[1]`, `[ ]`, a lone `[`) is
//! ordinary visible text.
//!
//! Spans are tracked on a LIFO stack. A close pops the most recently opened
//! span with the same name; a close with no matching open is ignored for
//! tracking and dropped by [`sanitize_line`].

use core::fmt;

use smallvec::SmallVec;

/// Stack of currently open spans, outermost first.
pub type SpanStack = SmallVec<[OpenSpan; 4]>;

/// Inline style identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanTag {
    Bold,
    Italic,
    Underline,
    Code,
    /// Any other style name, kept verbatim.
    Other(Box<str>),
}

impl SpanTag {
    /// Tag for a marker name. Only the first whitespace token is significant.
    pub fn from_name(name: &str) -> Self {
        match first_token(name) {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "code" => Self::Code,
            other => Self::Other(other.into()),
        }
    }

    /// Marker name for this tag.
    pub fn name(&self) -> &str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Code => "code",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for SpanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An open span: its tag plus the full marker body it was opened with, so
/// re-opening on a later page reproduces attributes such as `[bold red]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpenSpan {
    tag: SpanTag,
    body: Box<str>,
}

impl OpenSpan {
    /// Span opened by the marker body (the text between the brackets).
    pub fn new(body: &str) -> Self {
        let body = body.trim();
        Self {
            tag: SpanTag::from_name(body),
            body: body.into(),
        }
    }

    /// Span identity.
    pub fn tag(&self) -> &SpanTag {
        &self.tag
    }

    /// Opening marker, attributes included.
    pub fn open_marker(&self) -> String {
        format!("[{}]", self.body)
    }

    /// Closing marker.
    pub fn close_marker(&self) -> String {
        format!("[/{}]", self.tag.name())
    }
}

impl From<SpanTag> for OpenSpan {
    fn from(tag: SpanTag) -> Self {
        Self {
            body: tag.name().into(),
            tag,
        }
    }
}

/// Target of a closing marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CloseTag {
    /// `[/name]`.
    Named(SpanTag),
    /// `[/]`.
    Innermost,
}

/// One lexical piece of a marked-up line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Visible text.
    Text(&'a str),
    /// Opening marker with the text between its brackets.
    Open { raw: &'a str, body: &'a str },
    /// Closing marker; `name` is empty for `[/]`.
    Close { raw: &'a str, name: &'a str },
}

impl<'a> Segment<'a> {
    /// Source text of this segment.
    pub fn raw(&self) -> &'a str {
        match *self {
            Self::Text(text) => text,
            Self::Open { raw, .. } | Self::Close { raw, .. } => raw,
        }
    }
}

/// Iterator over the segments of a line.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    line: &'a str,
    pos: usize,
}

/// Split `line` into text and marker segments.
pub fn segments(line: &str) -> Segments<'_> {
    Segments { line, pos: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.line;
        if self.pos >= line.len() {
            return None;
        }
        if let Some((end, segment)) = marker_at(line, self.pos) {
            self.pos = end;
            return Some(segment);
        }

        let start = self.pos;
        let mut end = line.len();
        for (offset, ch) in line[start..].char_indices().skip(1) {
            if ch == '[' && marker_at(line, start + offset).is_some() {
                end = start + offset;
                break;
            }
        }
        self.pos = end;
        Some(Segment::Text(&line[start..end]))
    }
}

impl core::iter::FusedIterator for Segments<'_> {}

fn marker_at(line: &str, start: usize) -> Option<(usize, Segment<'_>)> {
    let rest = &line[start..];
    if !rest.starts_with('[') {
        return None;
    }
    let close = rest[1..].find(|c: char| c == '[' || c == ']')? + 1;
    if rest.as_bytes()[close] != b']' {
        return None;
    }
    let raw = &rest[..=close];
    let body = &rest[1..close];
    let end = start + close + 1;

    if let Some(name) = body.strip_prefix('/') {
        let name = name.trim();
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Some((
                end,
                Segment::Close {
                    raw,
                    name: first_token(name),
                },
            ));
        }
        return None;
    }
    if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Some((
            end,
            Segment::Open {
                raw,
                body: body.trim_end(),
            },
        ));
    }
    None
}

fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// Opening and closing tags found on one line, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagScan {
    pub opens: Vec<SpanTag>,
    pub closes: Vec<CloseTag>,
}

/// Collect the opening and closing tags of `line`.
pub fn parse_tags(line: &str) -> TagScan {
    let mut scan = TagScan::default();
    for segment in segments(line) {
        match segment {
            Segment::Open { body, .. } => scan.opens.push(SpanTag::from_name(body)),
            Segment::Close { name: "", .. } => scan.closes.push(CloseTag::Innermost),
            Segment::Close { name, .. } => scan.closes.push(CloseTag::Named(SpanTag::from_name(name))),
            Segment::Text(_) => {}
        }
    }
    scan
}

/// Apply one segment to `stack`. Returns `false` for a close with no match.
fn apply(stack: &mut SpanStack, segment: &Segment<'_>) -> bool {
    match *segment {
        Segment::Text(_) => true,
        Segment::Open { body, .. } => {
            stack.push(OpenSpan::new(body));
            true
        }
        Segment::Close { name: "", .. } => stack.pop().is_some(),
        Segment::Close { name, .. } => {
            let tag = SpanTag::from_name(name);
            match stack.iter().rposition(|open| open.tag == tag) {
                Some(idx) => {
                    stack.remove(idx);
                    true
                }
                None => false,
            }
        }
    }
}

/// Spans still open after reading `lines` in order.
pub fn track_open<S: AsRef<str>>(lines: &[S]) -> SpanStack {
    track_open_from(SpanStack::new(), lines)
}

/// Spans still open after reading `lines`, starting from `stack`.
pub fn track_open_from<S: AsRef<str>>(mut stack: SpanStack, lines: &[S]) -> SpanStack {
    for line in lines {
        for segment in segments(line.as_ref()) {
            apply(&mut stack, &segment);
        }
    }
    stack
}

/// Opening markers for `stack`, outermost first.
pub fn render_open(stack: &[OpenSpan]) -> String {
    stack.iter().map(OpenSpan::open_marker).collect()
}

/// Closing markers for `stack`, innermost first.
pub fn render_close(stack: &[OpenSpan]) -> String {
    stack.iter().rev().map(OpenSpan::close_marker).collect()
}

/// Copy of `line` without unmatched closing markers; `stack` is advanced
/// past the line.
pub fn sanitize_line(stack: &mut SpanStack, line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for segment in segments(line) {
        if apply(stack, &segment) {
            out.push_str(segment.raw());
        }
    }
    out
}

/// Number of visible characters in `line`; markers count as zero.
pub fn visible_len(line: &str) -> usize {
    segments(line)
        .map(|segment| match segment {
            Segment::Text(text) => text.chars().count(),
            _ => 0,
        })
        .sum()
}

/// `line` with every marker removed.
pub fn strip_markup(line: &str) -> String {
    segments(line)
        .filter_map(|segment| match segment {
            Segment::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// Cut `line` to at most `width` visible characters.
///
/// Markers before the cut are kept, markers after it are dropped, and any
/// span still open at the cut is closed so the result stays balanced with
/// respect to what it opened itself.
pub fn truncate_visible(line: &str, width: usize) -> String {
    if visible_len(line) <= width {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut stack = SpanStack::new();
    let mut remaining = width;
    for segment in segments(line) {
        match segment {
            Segment::Text(text) => {
                if remaining == 0 {
                    break;
                }
                let cut = text
                    .char_indices()
                    .nth(remaining)
                    .map(|(idx, _)| idx)
                    .unwrap_or(text.len());
                out.push_str(&text[..cut]);
                remaining -= text[..cut].chars().count();
            }
            _ => {
                if remaining == 0 && matches!(segment, Segment::Open { .. }) {
                    break;
                }
                if apply(&mut stack, &segment) {
                    out.push_str(segment.raw());
                }
            }
        }
    }
    out.push_str(&render_close(&stack));
    out
}

/// Split `text` on whitespace, keeping every marker attached to its word
/// even when the marker body itself contains spaces.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::with_capacity(16);
    let mut word_start: Option<usize> = None;
    let mut idx = 0;
    while idx < text.len() {
        if let Some((end, _)) = marker_at(text, idx) {
            word_start.get_or_insert(idx);
            idx = end;
            continue;
        }
        let Some(ch) = text[idx..].chars().next() else {
            break;
        };
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                words.push(&text[start..idx]);
            }
        } else {
            word_start.get_or_insert(idx);
        }
        idx += ch.len_utf8();
    }
    if let Some(start) = word_start {
        words.push(&text[start..]);
    }
    words
}

/// True when `line` has no visible non-whitespace content and no markers.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(stack: &[OpenSpan]) -> Vec<&str> {
        stack.iter().map(|open| open.tag().name()).collect()
    }

    #[test]
    fn parse_tags_reduces_attributes_to_first_token() {
        let scan = parse_tags("[bold red]Warn[/bold] and [italic]more");
        assert_eq!(scan.opens, vec![SpanTag::Bold, SpanTag::Italic]);
        assert_eq!(scan.closes, vec![CloseTag::Named(SpanTag::Bold)]);
    }

    #[test]
    fn non_marker_brackets_are_visible_text() {
        let line = "see [1] and [ ] or [x";
        assert_eq!(parse_tags(line), TagScan::default());
        assert_eq!(visible_len(line), line.chars().count());
        assert_eq!(strip_markup(line), line);
    }

    #[test]
    fn nested_bracket_is_not_a_marker() {
        let line = "[[bold]x[/bold]";
        assert_eq!(strip_markup(line), "[x");
        assert_eq!(parse_tags(line).opens, vec![SpanTag::Bold]);
    }

    #[test]
    fn close_pops_most_recent_matching_name() {
        let stack = track_open(&["[bold][italic][bold]x", "[/bold]"]);
        assert_eq!(names(&stack), vec!["bold", "italic"]);
    }

    #[test]
    fn unmatched_close_is_ignored_for_tracking() {
        let stack = track_open(&["[/italic][bold]x"]);
        assert_eq!(names(&stack), vec!["bold"]);
    }

    #[test]
    fn innermost_close_pops_top() {
        let stack = track_open(&["[bold][code]x[/]y"]);
        assert_eq!(names(&stack), vec!["bold"]);
    }

    #[test]
    fn render_open_and_close_nest_in_reverse() {
        let stack = track_open(&["[bold red][italic]x"]);
        assert_eq!(render_open(&stack), "[bold red][italic]");
        assert_eq!(render_close(&stack), "[/italic][/bold]");
    }

    #[test]
    fn sanitize_drops_only_unmatched_closes() {
        let mut stack = SpanStack::new();
        stack.push(OpenSpan::from(SpanTag::Italic));
        let out = sanitize_line(&mut stack, "a[/bold]b[/italic]c");
        assert_eq!(out, "ab[/italic]c");
        assert!(stack.is_empty());
    }

    #[test]
    fn visible_len_counts_chars_not_bytes() {
        assert_eq!(visible_len("[bold]héllo[/bold] wörld"), 11);
    }

    #[test]
    fn truncate_closes_severed_span() {
        assert_eq!(truncate_visible("ab[bold]cdef[/bold]g", 4), "ab[bold]cd[/bold]");
    }

    #[test]
    fn truncate_keeps_close_right_at_cut() {
        assert_eq!(truncate_visible("[bold]abc[/bold][italic]de[/italic]", 3), "[bold]abc[/bold]");
    }

    #[test]
    fn truncate_leaves_short_lines_alone() {
        assert_eq!(truncate_visible("[bold]ab[/bold]", 2), "[bold]ab[/bold]");
        assert_eq!(truncate_visible("abc", 0), "");
    }

    #[test]
    fn split_words_keeps_attributed_markers_whole() {
        assert_eq!(
            split_words("  [bold red]Hot[/bold] tea\tnow "),
            vec!["[bold red]Hot[/bold]", "tea", "now"]
        );
    }

    #[test]
    fn open_span_from_tag_renders_plain_marker() {
        let open = OpenSpan::from(SpanTag::Other("dim".into()));
        assert_eq!(open.open_marker(), "[dim]");
        assert_eq!(open.close_marker(), "[/dim]");
    }
}
