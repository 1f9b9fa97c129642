use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::filter::FilterCategory;
use crate::ops::group::GroupField;
use crate::ops::sort::SortField;
use crate::ops::view::FieldKey;
use crate::tui::manager::TaskManager;
use crate::tui::message::PickerPurpose;
use crate::tui::mode::InputMode;

/// Apply a view change and drop back to Normal
fn finish(m: &mut TaskManager) {
    m.mode.clear_scratch();
    m.mode.reset();
    m.recompute();
}

pub(super) fn handle_filter_select(m: &mut TaskManager, key: KeyEvent) {
    let (category, purpose) = match key.code {
        KeyCode::Char('p') => (FilterCategory::Project, PickerPurpose::FilterProjects),
        KeyCode::Char('c') => (FilterCategory::Context, PickerPurpose::FilterContexts),
        KeyCode::Char('f') => (FilterCategory::File, PickerPurpose::FilterFiles),
        KeyCode::Char('r') => {
            m.filter.cycle_priority();
            finish(m);
            return;
        }
        KeyCode::Char('s') => {
            m.filter.status = m.filter.status.cycle();
            finish(m);
            return;
        }
        KeyCode::Char('x') => {
            m.filter.clear();
            finish(m);
            return;
        }
        _ => return,
    };
    m.mode.category = Some(category);
    m.open_filter_picker(purpose);
}

fn field_for_key(code: KeyCode, allow_file: bool) -> Option<FieldKey> {
    match code {
        KeyCode::Char('d') => Some(FieldKey::DueDate),
        KeyCode::Char('p') => Some(FieldKey::Project),
        KeyCode::Char('r') => Some(FieldKey::Priority),
        KeyCode::Char('c') => Some(FieldKey::Context),
        KeyCode::Char('f') if allow_file => Some(FieldKey::File),
        _ => None,
    }
}

pub(super) fn handle_sort_select(m: &mut TaskManager, key: KeyEvent) {
    if key.code == KeyCode::Char('n') {
        m.sort.clear();
        finish(m);
        return;
    }
    if let Some(field) = field_for_key(key.code, false) {
        m.mode.field = Some(field);
        m.mode.transition_to(InputMode::SortDirection);
    }
}

pub(super) fn handle_group_select(m: &mut TaskManager, key: KeyEvent) {
    if key.code == KeyCode::Char('n') {
        m.group.field = None;
        finish(m);
        return;
    }
    if let Some(field) = field_for_key(key.code, true) {
        m.mode.field = Some(field);
        m.mode.transition_to(InputMode::GroupDirection);
    }
}

/// Ascending/descending choice for the field picked in the select step
pub(super) fn handle_direction(m: &mut TaskManager, key: KeyEvent) {
    let ascending = match key.code {
        KeyCode::Char('a') | KeyCode::Enter | KeyCode::Up => true,
        KeyCode::Char('d') | KeyCode::Down => false,
        _ => return,
    };
    let Some(field) = m.mode.field else {
        finish(m);
        return;
    };
    match m.mode.mode {
        InputMode::SortDirection => {
            m.sort.field = SortField::from_key(field).unwrap_or_default();
            m.sort.ascending = ascending;
        }
        InputMode::GroupDirection => {
            m.group.field = Some(GroupField::from_key(field));
            m.group.ascending = ascending;
        }
        _ => {}
    }
    finish(m);
}
