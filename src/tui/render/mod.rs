pub mod help_overlay;
mod helpers;
pub mod post_list;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};
use crate::util::unicode::truncate_to_width;

use helpers::spans_width;

/// Main render function, dispatching to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (address + search box) | content | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    post_list::render_post_list(frame, app, chunks[1]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Page address on the first row, the search box and match count below it.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let title = Span::styled(
        " blogdeck ",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let address = app.page.address.current().to_string();
    let room = width.saturating_sub(spans_width(std::slice::from_ref(&title)) + 1);
    let address_line = Line::from(vec![
        title,
        Span::styled(
            truncate_to_width(&address, room),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);

    let input = app.filter.input();
    let mut search = vec![Span::styled(" / ", Style::default().fg(app.theme.dim).bg(bg))];
    if input.text.is_empty() && app.mode != Mode::Search {
        search.push(Span::styled(
            "search posts",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else {
        search.push(Span::styled(
            input.text.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }
    if app.mode == Mode::Search {
        search.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }

    if !app.page.items.is_empty() {
        let count = format!(
            "{} of {} posts ",
            app.filter.match_count(),
            app.page.items.len()
        );
        let used = spans_width(&search);
        let count_width = count.chars().count();
        if used + count_width < width {
            search.push(Span::styled(
                " ".repeat(width - used - count_width),
                Style::default().bg(bg),
            ));
            search.push(Span::styled(count, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph =
        Paragraph::new(vec![address_line, Line::from(search)]).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Push spans for `text`, styling the byte ranges in `hits` with
/// `highlight_style` and everything else with `base_style`.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    hits: &[Range<usize>],
    base_style: Style,
    highlight_style: Style,
) {
    let mut last_end = 0;
    for hit in hits {
        if hit.start > last_end {
            spans.push(Span::styled(text[last_end..hit.start].to_string(), base_style));
        }
        spans.push(Span::styled(text[hit.clone()].to_string(), highlight_style));
        last_end = hit.end;
    }
    if last_end < text.len() || hits.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
