use std::env;
use std::process::ExitCode;
use std::str::FromStr;

use tread::{list_books, BookInfo, Config, Document, FileBookmarkStore};
use tread_render::markup::strip_markup;
use tread_render::{
    frame, DisplayDimensions, PageView, Position, ProgressInfo, ReadingSession, Viewport,
    PANEL_PADDING_Y,
};

const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_BOOKMARK_DIR: &str = "bookmarks";
const LIBRARY_TITLE_CHARS: usize = 40;
const LIBRARY_AUTHOR_CHARS: usize = 25;

#[derive(Clone, Debug)]
struct Args {
    input: Option<String>,
    width: usize,
    height: usize,
    double: Option<bool>,
    chapter: usize,
    page: usize,
    all: bool,
    plain: bool,
    json: bool,
    menu: bool,
    library: bool,
    config_path: String,
    bookmark_dir: String,
    save_bookmark: bool,
    resume: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cfg = parse_args(args)?;
    let config = Config::load(&cfg.config_path);
    let store = FileBookmarkStore::new(&cfg.bookmark_dir);
    if cfg.library {
        return print_library(&config, &store, &cfg);
    }

    let input = cfg.input.as_deref().ok_or("input path required")?;
    let document = Document::open(input, &config.formatting)
        .map_err(|e| format!("unable to open '{}': {}", input, e))?;
    if document.is_empty() {
        return Err(format!("'{}' has no chapters", input));
    }

    let mut session = ReadingSession::new(document, config);
    let viewport = Viewport::new(cfg.width, cfg.height);

    if let Some(double) = cfg.double {
        if session.effective_double_page(viewport.width) != double {
            session.toggle_double_page(viewport.width);
        }
        let _ = session.take_notification();
    }

    if cfg.resume {
        if !session.load_bookmark(&store) {
            return Err(format!("no bookmark for '{}'", session.document().title()));
        }
    } else if !session.seek(Position::new(cfg.chapter, cfg.page)) {
        return Err(format!(
            "chapter {} out of range (chapter_count={})",
            cfg.chapter,
            session.document().chapter_count()
        ));
    }

    let params = session.layout_params(viewport);

    if cfg.menu {
        session.open_chapter_list();
        let lines = session.chapter_menu_lines(&params);
        let title = session.document().title().to_string();
        print_panel(&session, &title, &lines, viewport, cfg.plain);
        return Ok(());
    }

    let view = session.current_view(&params);
    if cfg.all {
        let pages = session.pages(&params).to_vec();
        for (page_index, page) in pages.into_iter().enumerate() {
            let mut page_view = view.clone();
            page_view.position.page_index = page_index;
            page_view.page = page;
            page_view.progress = ProgressInfo::compute(
                page_view.position,
                view.page_count,
                session.document().chapter_count(),
            );
            print_view(&session, &page_view, viewport, &cfg)?;
        }
    } else {
        print_view(&session, &view, viewport, &cfg)?;
    }

    if cfg.save_bookmark {
        if !session.save_bookmark(&store) {
            return Err(format!(
                "unable to save bookmark under {}",
                store.root().display()
            ));
        }
        log::info!(
            "saved bookmark for {:?} at {:?}",
            session.document().title(),
            session.position()
        );
    }
    Ok(())
}

fn print_library(config: &Config, store: &FileBookmarkStore, cfg: &Args) -> Result<(), String> {
    let books_dir = config.books_dir_for(&cfg.config_path);
    let books = list_books(&books_dir, store, &config.formatting);
    if books.is_empty() {
        return Err(format!("no books found in {}", books_dir.display()));
    }
    if cfg.json {
        let payload = serde_json::to_string_pretty(&books).map_err(|e| e.to_string())?;
        println!("{}", payload);
        return Ok(());
    }
    println!("Your Library ({})", books_dir.display());
    println!();
    for book in &books {
        for line in library_entry(book) {
            print_line(&line, cfg.plain);
        }
    }
    Ok(())
}

fn library_entry(book: &BookInfo) -> [String; 3] {
    let progress = if book.progress > 0 {
        format!(" {:3}%", book.progress)
    } else {
        String::new()
    };
    [
        format!("  [bold]{}[/bold]", shorten(&book.title, LIBRARY_TITLE_CHARS)),
        format!(
            "    [dim]by {}[/dim]{}  ({})",
            shorten(&book.author, LIBRARY_AUTHOR_CHARS),
            progress,
            book.filename
        ),
        String::new(),
    ]
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

fn print_view(
    session: &ReadingSession,
    view: &PageView,
    viewport: Viewport,
    cfg: &Args,
) -> Result<(), String> {
    if cfg.json {
        let payload = serde_json::to_string_pretty(view).map_err(|e| e.to_string())?;
        println!("{}", payload);
        return Ok(());
    }
    print_panel(session, &session.status_line(view), view.lines(), viewport, cfg.plain);
    println!();
    Ok(())
}

fn print_panel(
    session: &ReadingSession,
    title: &str,
    lines: &[String],
    viewport: Viewport,
    plain: bool,
) {
    let display = &session.config().display;
    let dims = DisplayDimensions::measure(viewport, display);
    for row in frame(title, lines, &dims, display.show_border, PANEL_PADDING_Y) {
        print_line(&row, plain);
    }
}

fn print_line(line: &str, plain: bool) {
    if plain {
        println!("{}", strip_markup(line));
    } else {
        println!("{}", line);
    }
}

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let v = args
        .get(i + 1)
        .ok_or_else(|| format!("{} requires a value", flag))?;
    v.parse::<T>()
        .map_err(|_| format!("invalid {} value '{}'", flag, v))
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() < 2 {
        return Err("input path or --library required".to_string());
    }

    let mut cfg = Args {
        input: None,
        width: 100,
        height: 40,
        double: None,
        chapter: 0,
        page: 0,
        all: false,
        plain: false,
        json: false,
        menu: false,
        library: false,
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        bookmark_dir: DEFAULT_BOOKMARK_DIR.to_string(),
        save_bookmark: false,
        resume: false,
    };

    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                cfg.width = parse_value(&args, i, "--width")?;
                i += 2;
            }
            "--height" => {
                cfg.height = parse_value(&args, i, "--height")?;
                i += 2;
            }
            "--chapter" => {
                cfg.chapter = parse_value(&args, i, "--chapter")?;
                i += 2;
            }
            "--page" => {
                cfg.page = parse_value(&args, i, "--page")?;
                i += 2;
            }
            "--config" => {
                cfg.config_path = parse_value(&args, i, "--config")?;
                i += 2;
            }
            "--bookmarks" => {
                cfg.bookmark_dir = parse_value(&args, i, "--bookmarks")?;
                i += 2;
            }
            "--double" => {
                cfg.double = Some(true);
                i += 1;
            }
            "--single" => {
                cfg.double = Some(false);
                i += 1;
            }
            "--all" => {
                cfg.all = true;
                i += 1;
            }
            "--plain" => {
                cfg.plain = true;
                i += 1;
            }
            "--json" => {
                cfg.json = true;
                i += 1;
            }
            "--menu" => {
                cfg.menu = true;
                i += 1;
            }
            "--library" => {
                cfg.library = true;
                i += 1;
            }
            "--save-bookmark" => {
                cfg.save_bookmark = true;
                i += 1;
            }
            "--resume" => {
                cfg.resume = true;
                i += 1;
            }
            "--help" | "-h" => return Err("help requested".to_string()),
            other if other.starts_with("--") => {
                return Err(format!("unknown argument '{}'", other))
            }
            other => {
                if cfg.input.is_some() {
                    return Err(format!("unexpected extra input '{}'", other));
                }
                cfg.input = Some(other.to_string());
                i += 1;
            }
        }
    }
    if cfg.input.is_none() && !cfg.library {
        return Err("input path required".to_string());
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err("--width and --height must be positive".to_string());
    }
    Ok(cfg)
}

fn help_text() -> &'static str {
    r#"tread-pages - lay out a book and print pages as the reader would show them

USAGE:
  cargo run -p tread-render --features cli --bin tread-pages -- <book.json|book.txt> [options]
  cargo run -p tread-render --features cli --bin tread-pages -- --library [--config <path>]

OPTIONS:
  --width <cols>      viewport width in cells (default: 100)
  --height <rows>     viewport height in cells (default: 40)
  --double            force double-page layout
  --single            force single-page layout
  --chapter <n>       0-based chapter index (default: 0)
  --page <n>          0-based page index, clamped to the chapter (default: 0)
  --all               print every page of the chapter
  --plain             strip inline markup from output
  --json              print pages as JSON
  --menu              print the chapter menu instead of a page
  --library           list the books directory from the config with progress
  --config <path>     config file (default: config.json)
  --bookmarks <dir>   bookmark directory (default: bookmarks)
  --save-bookmark     save the shown position as the book's bookmark
  --resume            start from the saved bookmark
"#
}
