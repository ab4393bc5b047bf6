mod common;

use common::{assert_balanced, init_logging, TextGen};
use tread_render::markup::{split_words, strip_markup, visible_len};
use tread_render::{column_width, compose, layout_chapter, paginate, reflow, LayoutParams};

const WIDTHS: &[usize] = &[1, 7, 20, 33, 80];
const HEIGHTS: &[usize] = &[1, 2, 5, 12, 35];

fn corpus() -> Vec<String> {
    let mut gen = TextGen::new(7);
    (0..6).map(|i| gen.chapter(4 + i * 5)).collect()
}

#[test]
fn reflowed_lines_fit_width_unless_single_word() {
    init_logging();
    for text in corpus() {
        for &width in WIDTHS {
            for line in reflow(&text, width) {
                let words = split_words(&line);
                assert!(
                    visible_len(&line) <= width || words.len() == 1,
                    "line {line:?} exceeds width {width}"
                );
            }
        }
    }
}

#[test]
fn reflow_keeps_every_word_in_order() {
    for text in corpus() {
        let expected: Vec<&str> = split_words(&text);
        for &width in WIDTHS {
            let lines = reflow(&text, width);
            let actual: Vec<&str> = lines.iter().flat_map(|line| split_words(line)).collect();
            assert_eq!(actual, expected, "width {width}");
        }
    }
}

#[test]
fn every_page_has_fixed_height_and_balanced_markup() {
    for text in corpus() {
        for &width in WIDTHS {
            let lines = reflow(&text, width);
            for &height in HEIGHTS {
                let pages = paginate(&lines, height);
                assert!(!pages.is_empty());
                for page in &pages {
                    assert_eq!(page.height(), height);
                    assert_balanced(page.lines());
                }
            }
        }
    }
}

#[test]
fn pagination_preserves_visible_text() {
    for text in corpus() {
        let lines = reflow(&text, 20);
        let expected: Vec<String> = lines
            .iter()
            .map(|line| strip_markup(line))
            .filter(|line| !line.trim().is_empty())
            .collect();
        let pages = paginate(&lines, 5);
        let actual: Vec<String> = pages
            .iter()
            .flat_map(|page| page.lines().iter().map(|line| strip_markup(line)))
            .filter(|line| !line.trim().is_empty())
            .collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn double_pages_pair_up_and_stay_inside_columns() {
    let separator = " │ ";
    for text in corpus() {
        let lines = reflow(&text, 20);
        for &height in HEIGHTS {
            let pages = paginate(&lines, height);
            for total_width in [11usize, 45, 83] {
                let doubled = compose(&pages, total_width, separator);
                assert_eq!(doubled.len(), pages.len().div_ceil(2));

                let row_width = column_width(total_width, separator) * 2 + visible_len(separator);
                for page in &doubled {
                    assert_eq!(page.height(), height);
                    for row in page.lines() {
                        assert_eq!(visible_len(row), row_width, "row {row:?}");
                        assert_balanced(&[row]);
                    }
                }

                if pages.len() % 2 == 1 {
                    let last = doubled.last().expect("odd input yields a page");
                    for row in last.lines() {
                        let plain = strip_markup(row);
                        let right = plain
                            .split_once(separator)
                            .map(|(_, right)| right)
                            .expect("separator in every row");
                        assert!(right.chars().all(|c| c == ' '), "right column {right:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn layout_chapter_handles_empty_content() {
    let pages = layout_chapter("", &LayoutParams::single(30, 4));
    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_blank());

    let doubled = layout_chapter("", &LayoutParams::double(60, 4, " │ "));
    assert_eq!(doubled.len(), 1);
    assert_eq!(doubled[0].height(), 4);
}

#[test]
fn scenario_hello_world_wraps_into_two_lines() {
    assert_eq!(reflow("Hello world", 5), vec!["Hello", "world"]);
}

#[test]
fn scenario_page_breaks_at_paragraph_gap() {
    let lines = ["a", "", "b", "", "c"];
    let pages = paginate(&lines, 2);
    assert_eq!(pages[0].lines(), &["a", ""]);
    let rest: Vec<&str> = pages[1..]
        .iter()
        .flat_map(|page| page.lines().iter().map(String::as_str))
        .collect();
    assert_eq!(rest, vec!["b", "", "c", ""]);
}

#[test]
fn scenario_bold_span_closes_at_page_end_and_reopens() {
    let lines = ["[bold]Hello", "world", "", "[bold]tail[/bold]", "more[/bold]"];
    let pages = paginate(&lines, 3);
    assert_eq!(pages[0].lines(), &["[bold]Hello", "world[/bold]", ""]);
    assert_eq!(pages[1].lines(), &["[bold][bold]tail[/bold]", "more[/bold]", ""]);
    for page in &pages {
        assert_balanced(page.lines());
    }
}

#[test]
fn span_continues_across_many_pages() {
    let text = format!("[italic]{}[/italic] after", vec!["word"; 40].join(" "));
    let lines = reflow(&text, 10);
    let pages = paginate(&lines, 3);
    assert!(pages.len() > 3);
    for page in &pages[..pages.len() - 1] {
        let first = page.lines().iter().find(|line| !line.is_empty());
        assert!(first.is_some_and(|line| line.starts_with("[italic]")), "{page:?}");
        assert_balanced(page.lines());
    }
}
