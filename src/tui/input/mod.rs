mod common;
mod navigate;
mod search;
mod select;

use crossterm::event::{KeyCode, KeyEvent};
use tracing::trace;

use super::manager::TaskManager;
use super::message::Intent;
use super::mode::InputMode;

use common::{forward_to_overlay, normalize_key};
use navigate::handle_normal;
use search::handle_search;
use select::{handle_direction, handle_filter_select, handle_group_select, handle_sort_select};

/// Route a key to exactly one handler: inline search first, then the
/// escape special case, then the active overlay, then the mode's handler.
pub(super) fn handle_key(m: &mut TaskManager, key: KeyEvent, out: &mut Vec<Intent>) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);

    if m.mode.mode == InputMode::Search {
        handle_search(m, key);
        return;
    }

    if key.code == KeyCode::Esc && m.overlay().is_none() {
        handle_escape(m);
        return;
    }

    // Overlays own every key, escape included: they unwind themselves
    if !m.overlay().is_none() {
        forward_to_overlay(m, key);
        return;
    }

    match m.mode.mode {
        InputMode::Normal => handle_normal(m, key, out),
        InputMode::FilterSelect => handle_filter_select(m, key),
        InputMode::SortSelect => handle_sort_select(m, key),
        InputMode::GroupSelect => handle_group_select(m, key),
        InputMode::SortDirection | InputMode::GroupDirection => handle_direction(m, key),
        other => trace!(mode = ?other, "key ignored without an overlay"),
    }
}

/// Escape with no overlay open: step back one mode, or from Normal
/// return every view setting to its baseline.
fn handle_escape(m: &mut TaskManager) {
    if m.mode.is_normal() {
        m.reset_view_state();
    } else {
        m.mode.back();
        m.mode.clear_scratch();
    }
}
