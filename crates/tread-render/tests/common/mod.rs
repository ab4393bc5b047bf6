#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tread::{BookMetadata, Chapter, Document};
use tread_render::markup::{sanitize_line, SpanStack};

static TEMP_NONCE: AtomicUsize = AtomicUsize::new(0);

const WORDS: &[&str] = &[
    "the", "reader", "turned", "a", "page", "and", "lamp", "light", "fell", "across",
    "harbour", "windows", "while", "somebody", "argued", "about", "[1]", "tides",
    "extraordinarily", "of", "it", "quiet", "x", "é", "naïve", "résumé",
];

const TAGS: &[&str] = &["bold", "italic", "underline", "code", "bold red", "dim"];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn temp_root(label: &str) -> PathBuf {
    let nonce = TEMP_NONCE.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "tread-render-{label}-{}-{nonce}",
        std::process::id()
    ))
}

/// Deterministic marked-up prose with spans crossing lines and paragraphs,
/// stray closes, bracketed non-markers and over-long words.
pub struct TextGen {
    state: u64,
}

impl TextGen {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1,
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, n: u64) -> usize {
        (self.next() % n) as usize
    }

    pub fn chapter(&mut self, paragraphs: usize) -> String {
        let mut out = String::new();
        let mut open: Vec<&str> = Vec::new();
        for p in 0..paragraphs {
            if p > 0 {
                out.push_str(if self.below(4) == 0 { "\n" } else { "\n\n" });
            }
            let words = 1 + self.below(60);
            for w in 0..words {
                if w > 0 {
                    out.push_str(if self.below(10) == 0 { "  " } else { " " });
                }
                if self.below(12) == 0 {
                    let tag = TAGS[self.below(TAGS.len() as u64)];
                    out.push('[');
                    out.push_str(tag);
                    out.push(']');
                    open.push(tag);
                }
                out.push_str(WORDS[self.below(WORDS.len() as u64)]);
                if self.below(40) == 0 {
                    out.push_str("supercalifragilisticexpialidocious");
                }
                if !open.is_empty() && self.below(6) == 0 {
                    if let Some(tag) = open.pop() {
                        let name = tag.split_whitespace().next().unwrap_or(tag);
                        out.push_str(&format!("[/{name}]"));
                    }
                }
                if self.below(80) == 0 {
                    out.push_str("[/italic]");
                }
            }
        }
        out
    }

    pub fn document(&mut self, chapters: usize) -> Document {
        let chapters = (0..chapters)
            .map(|i| {
                let paragraphs = 1 + self.below(30);
                Chapter::new(format!("Chapter {}", i + 1), self.chapter(paragraphs), format!("c{i}"))
            })
            .collect();
        Document::new(BookMetadata::titled("Generated Book"), chapters)
    }
}

/// Panics unless `lines` are balanced on their own: no close without an
/// open, and nothing left open at the end.
pub fn assert_balanced<S: AsRef<str>>(lines: &[S]) {
    let mut stack = SpanStack::new();
    for line in lines {
        let line = line.as_ref();
        assert_eq!(sanitize_line(&mut stack, line), line, "unmatched close in {line:?}");
    }
    assert!(stack.is_empty(), "spans left open: {stack:?}");
}
