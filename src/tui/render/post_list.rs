use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::target::InteractionTarget;
use crate::ops::highlight::highlight_spans;
use crate::tui::app::{App, Row};

use super::helpers::{fit_to_width, spans_width};
use super::push_highlighted_spans;

/// Width of the like label column
const LABEL_CELLS: usize = 14;

/// Render the post cards (or, on a page without cards, its like controls)
pub fn render_post_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let rows = app.rows();

    if rows.is_empty() {
        let message = if app.filter.shows_no_results() {
            format!(
                " No posts found matching \"{}\". Press Esc to clear the search.",
                app.filter.input().text.trim()
            )
        } else {
            " Nothing to show on this page".to_string()
        };
        let empty = Paragraph::new(message).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor on screen
    let visible_height = area.height as usize;
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let width = area.width as usize;
    let query = app.filter.query().as_str().to_string();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible_height)
        .map(|(i, row)| {
            let is_cursor = i == app.cursor;
            let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
            let mut spans = vec![Span::styled(
                if is_cursor { "\u{258E}" } else { " " },
                Style::default().fg(app.theme.selection_border).bg(row_bg),
            )];

            match *row {
                Row::Post(idx) => {
                    let item = &app.page.items[idx];
                    let target = item.like.and_then(|id| app.page.targets.get(id));
                    spans.push(label_span(app, target, row_bg));
                    let title_style = if is_cursor {
                        Style::default()
                            .fg(app.theme.text_bright)
                            .bg(row_bg)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(app.theme.text).bg(row_bg)
                    };
                    let match_style = Style::default()
                        .fg(app.theme.search_match_fg)
                        .bg(app.theme.search_match_bg);
                    let hits = highlight_spans(&item.title, &query);
                    push_highlighted_spans(&mut spans, &item.title, &hits, title_style, match_style);
                }
                Row::Like(id) => {
                    let target = &app.page.targets[id];
                    spans.push(label_span(app, Some(target), row_bg));
                    spans.push(Span::styled(
                        target.resource.to_string(),
                        Style::default().fg(app.theme.text).bg(row_bg),
                    ));
                    let counts: Vec<&str> = app
                        .page
                        .counts
                        .displays_for(&target.resource)
                        .map(|d| d.text.as_str())
                        .collect();
                    if !counts.is_empty() {
                        spans.push(Span::styled(
                            format!("  {}", counts.join(" ")),
                            Style::default().fg(app.theme.dim).bg(row_bg),
                        ));
                    }
                }
            }

            // Pad cursor line
            if is_cursor {
                let content_width = spans_width(&spans);
                if content_width < width {
                    spans.push(Span::styled(
                        " ".repeat(width - content_width),
                        Style::default().bg(row_bg),
                    ));
                }
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn label_span(app: &App, target: Option<&InteractionTarget>, bg: ratatui::style::Color) -> Span<'static> {
    match target {
        Some(t) => {
            let rep = &t.representation;
            let mut style = Style::default()
                .fg(app.theme.like_color(rep.engaged, rep.loading))
                .bg(bg);
            if t.disabled {
                style = style.add_modifier(Modifier::DIM);
            }
            Span::styled(fit_to_width(&format!(" {}", rep.label), LABEL_CELLS), style)
        }
        None => Span::styled(" ".repeat(LABEL_CELLS), Style::default().bg(bg)),
    }
}
