use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Cells taken by the padded key column
const KEY_CELLS: u16 = 15;

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor up/down"),
            ("g/G", "Jump to first/last post"),
        ],
    ),
    (
        "Posts",
        &[("l/Enter", "Like or unlike the selected post")],
    ),
    (
        "Search",
        &[
            ("/", "Focus the search box"),
            ("Enter", "Search now (in the search box)"),
            ("Esc", "Leave the search box, or clear the search"),
        ],
    ),
    (
        "General",
        &[("?", "Toggle this help"), ("q", "Quit")],
    ),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let desc_cells = BINDINGS
        .iter()
        .flat_map(|(_, bindings)| bindings.iter())
        .map(|(_, desc)| display_width(desc) as u16)
        .max()
        .unwrap_or(0);
    let line_count = 2 + BINDINGS
        .iter()
        .map(|(_, bindings)| bindings.len() + 2)
        .sum::<usize>() as u16;
    // borders plus one trailing cell of padding
    let overlay_area = centered_rect(KEY_CELLS + desc_cells + 3, line_count + 2, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (section, bindings) in BINDINGS {
        lines.push(Line::from(Span::styled(format!(" {}", section), header_style)));
        for (key, desc) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<width$}", key, width = KEY_CELLS as usize - 1), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

/// Center a `width` x `height` rectangle in `area`, shrinking it to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
