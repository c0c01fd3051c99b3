use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};
use crate::util::unicode::pop_grapheme;

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        // Leave the input, keeping its text and any pending filter run
        KeyCode::Esc => {
            app.filter.blur();
            app.mode = Mode::Navigate;
        }

        // Submit skips the debounce
        KeyCode::Enter => {
            app.filter.submit(&mut app.page);
            app.filter.blur();
            app.mode = Mode::Navigate;
            app.clamp_cursor();
        }

        KeyCode::Backspace => {
            let mut text = app.filter.input().text.clone();
            if pop_grapheme(&mut text) {
                app.filter.on_input(text, Instant::now());
            }
        }

        KeyCode::Char(c) => {
            let mut text = app.filter.input().text.clone();
            text.push(c);
            app.filter.on_input(text, Instant::now());
        }

        _ => {}
    }
}
