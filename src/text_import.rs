//! Plain-text import: normalise raw text into chapter content.
//!
//! Chapter content produced here follows the same conventions as text
//! extracted from EPUB chapters: one paragraph per line, paragraphs separated
//! by `paragraph_spacing` blank lines, optional leading indent.

use crate::config::FormattingConfig;

/// Format raw text into chapter content according to `cfg`.
///
/// With `preserve_line_breaks`, every non-blank source line becomes its own
/// paragraph and runs of blank lines collapse into the configured spacing.
/// Otherwise paragraphs are delimited by blank lines and their internal
/// whitespace is collapsed to single spaces.
pub fn format_plain_text(text: &str, cfg: &FormattingConfig) -> String {
    let paragraphs = if cfg.preserve_line_breaks {
        line_paragraphs(text)
    } else {
        block_paragraphs(text)
    };

    let indent = " ".repeat(cfg.paragraph_indent);
    let mut out: Vec<String> =
        Vec::with_capacity(paragraphs.len() * (1 + cfg.paragraph_spacing));
    for paragraph in paragraphs {
        out.push(format!("{indent}{paragraph}"));
        for _ in 0..cfg.paragraph_spacing {
            out.push(String::new());
        }
    }
    out.join("\n")
}

fn line_paragraphs(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn block_paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(8);
    let mut current: Vec<&str> = Vec::with_capacity(8);
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.extend(line.split_whitespace());
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserved_line_breaks_become_paragraphs() {
        let cfg = FormattingConfig::default();
        let out = format_plain_text("  First line  \nSecond line\n\n\n\nThird", &cfg);
        assert_eq!(out, "First line\n\nSecond line\n\nThird\n");
    }

    #[test]
    fn block_mode_joins_wrapped_lines() {
        let cfg = FormattingConfig {
            preserve_line_breaks: false,
            paragraph_spacing: 1,
            paragraph_indent: 2,
        };
        let out = format_plain_text("one\n  two\tthree\n\n\nfour", &cfg);
        assert_eq!(out, "  one two three\n\n  four\n");
    }

    #[test]
    fn zero_spacing_packs_paragraphs() {
        let cfg = FormattingConfig {
            paragraph_spacing: 0,
            ..FormattingConfig::default()
        };
        assert_eq!(format_plain_text("a\n\nb", &cfg), "a\nb");
    }

    #[test]
    fn blank_input_yields_empty_content() {
        assert_eq!(format_plain_text(" \n\t\n", &FormattingConfig::default()), "");
    }
}
