use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use url::Url;

use crate::io::http::HttpClient;
use crate::model::config::HttpConfig;
use crate::model::item::FilterableItem;
use crate::model::page::Page;
use crate::model::target::{InteractionTarget, LikeState, Resource};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A client that is never asked to send anything.
pub fn test_client() -> HttpClient {
    HttpClient::new(&HttpConfig::default()).unwrap()
}

pub fn blank_page(url: &str) -> Page {
    Page::new(Url::parse(url).unwrap())
}

/// Three post cards, each with a like control:
/// rust (liked, 4), async python (0), css grid (1).
pub fn posts_page() -> Page {
    let mut page = blank_page("https://b.example/blog/");
    let posts = [
        ("Rust ownership tips", "rust-ownership", "borrowing and lifetimes explained", true, 4),
        ("Async Python in practice", "async-python", "asyncio event loops and tasks", false, 0),
        ("CSS grid layouts", "css-grid", "two dimensional page layout with grid", false, 1),
    ];
    for (title, slug, body, engaged, count) in posts {
        let id = page.add_target(InteractionTarget::new(
            Resource::new(format!("/blog/post/{}/like/", slug)),
            LikeState { engaged, count },
        ));
        let mut item = FilterableItem::new(title, body);
        item.link = Some(format!("/blog/post/{}/", slug));
        item.like = Some(id);
        page.items.push(item);
    }
    page
}

pub fn app_with_posts() -> App {
    App::new(posts_page(), test_client(), Theme::default())
}
