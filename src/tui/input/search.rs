use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::manager::TaskManager;

/// Inline search edits `filter.search` live; the list narrows as you type.
pub(super) fn handle_search(m: &mut TaskManager, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel: drop the query
        (_, KeyCode::Esc) => {
            m.filter.search.clear();
            m.mode.back();
            m.recompute();
        }
        // Accept: keep the query as a filter
        (_, KeyCode::Enter) => m.mode.back(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            m.filter.search.clear();
            m.recompute();
        }
        (_, KeyCode::Backspace) => {
            if m.filter.search.pop().is_some() {
                m.recompute();
            }
        }
        (_, KeyCode::Down) => {
            let len = m.view().len();
            m.viewport.move_by(1, len);
        }
        (_, KeyCode::Up) => {
            let len = m.view().len();
            m.viewport.move_by(-1, len);
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            m.filter.search.push(c);
            m.recompute();
        }
        _ => {}
    }
}
