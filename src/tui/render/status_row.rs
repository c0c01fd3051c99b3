use chrono::{Local, TimeDelta};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::notice::{Notice, NoticeLevel};
use crate::tui::app::{App, Mode};

use super::helpers::spans_width;

/// How long a notice stays in the status row
const NOTICE_TTL_SECS: i64 = 8;

/// The latest notice, if it is still fresh.
pub fn current_notice(app: &App) -> Option<&Notice> {
    app.page
        .latest_notice()
        .filter(|n| Local::now().signed_duration_since(n.at) < TimeDelta::seconds(NOTICE_TTL_SECS))
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    let hint = match app.mode {
        Mode::Search => Some("Enter search  Esc leave"),
        Mode::Navigate if app.show_key_hints => Some("/ search  l like  ? help  q quit"),
        Mode::Navigate => None,
    };

    if let Some(notice) = current_notice(app) {
        let color = match notice.level {
            NoticeLevel::Error => app.theme.red,
            NoticeLevel::Info => app.theme.green,
        };
        spans.push(Span::styled(
            format!(" {} ", notice.at.format("%H:%M:%S")),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default().fg(color).bg(bg),
        ));
    } else {
        let in_flight = app.page.targets.iter().filter(|t| t.in_flight).count();
        if in_flight > 0 {
            spans.push(Span::styled(
                format!(" {} like request(s) in flight", in_flight),
                Style::default().fg(app.theme.yellow).bg(bg),
            ));
        }
    }

    if let Some(hint) = hint {
        let content_width = spans_width(&spans);
        let hint_width = hint.chars().count();
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn error_notice_is_shown() {
        let mut app = app_with_posts();
        app.like_selected();
        let output = draw(&app);
        assert!(output.contains("Security token missing. Please refresh the page."));
    }

    #[test]
    fn stale_notice_is_hidden() {
        let mut app = app_with_posts();
        app.page.notify(NoticeLevel::Info, "old news");
        if let Some(notice) = app.page.notices.last_mut() {
            notice.at = Local::now() - TimeDelta::seconds(60);
        }
        assert!(current_notice(&app).is_none());
        assert!(!draw(&app).contains("old news"));
    }

    #[test]
    fn search_hint_and_key_hints() {
        let mut app = app_with_posts();
        assert_eq!(draw(&app), "");
        app.show_key_hints = true;
        assert!(draw(&app).contains("q quit"));
        app.mode = Mode::Search;
        assert!(draw(&app).contains("Enter search  Esc leave"));
    }

    #[test]
    fn in_flight_count() {
        let mut app = app_with_posts();
        app.page.cookie = "csrftoken=t".into();
        app.like_selected();
        assert!(draw(&app).contains("1 like request(s) in flight"));
    }
}
