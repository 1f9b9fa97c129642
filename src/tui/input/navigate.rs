use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::manager::TaskManager;
use crate::tui::message::{Intent, PickerPurpose, ViewKind};
use crate::tui::mode::InputMode;

pub(super) fn handle_normal(m: &mut TaskManager, key: KeyEvent, out: &mut Vec<Intent>) {
    let len = m.view().len();
    match (key.modifiers, key.code) {
        // Show the selected task in the agenda
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            if let Some(id) = m.selected_id() {
                out.push(Intent::SwitchView(ViewKind::Agenda));
                out.push(Intent::FocusTask { id });
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
            m.viewport.page_down(len);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => {
            m.viewport.page_up(len);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => out.push(Intent::Quit),
        (KeyModifiers::CONTROL, _) => {}

        // Cursor
        (_, KeyCode::Down | KeyCode::Char('j')) => m.viewport.move_by(1, len),
        (_, KeyCode::Up | KeyCode::Char('k')) => m.viewport.move_by(-1, len),
        (_, KeyCode::Home) => m.viewport.top(len),
        (_, KeyCode::End | KeyCode::Char('G')) => m.viewport.bottom(len),
        (_, KeyCode::Char(']')) => jump_group(m, true),
        (_, KeyCode::Char('[')) => jump_group(m, false),

        // View state
        (_, KeyCode::Char('/')) => m.mode.transition_to(InputMode::Search),
        (_, KeyCode::Char('f')) => m.mode.transition_to(InputMode::FilterSelect),
        (_, KeyCode::Char('o')) => m.mode.transition_to(InputMode::SortSelect),
        (_, KeyCode::Char('g')) => m.mode.transition_to(InputMode::GroupSelect),
        (_, KeyCode::Char('v')) => {
            m.file_view = m.file_view.cycle();
            m.recompute();
        }
        (_, KeyCode::Char('P')) => {
            m.filter.cycle_priority();
            m.recompute();
        }

        // Quick edits on the selected task
        (_, KeyCode::Char('t') | KeyCode::Char(' ')) => {
            if let Some(mut task) = m.selected_task().cloned() {
                task.done = !task.done;
                m.write_task(task, out);
            }
        }
        (_, KeyCode::Char('p')) => {
            if let Some(mut task) = m.selected_task().cloned() {
                task.priority = task.priority.cycle();
                m.write_task(task, out);
            }
        }
        (_, KeyCode::Char('d')) => m.open_date_picker(false),
        (_, KeyCode::Char('D')) => m.open_date_input(),
        (_, KeyCode::Char('s')) => m.open_date_picker(true),
        (_, KeyCode::Char('+')) => m.open_project_picker(),
        (_, KeyCode::Char('@')) => m.open_context_picker(),
        (_, KeyCode::Char('u')) => m.open_url_input(),

        // Task lifecycle
        (_, KeyCode::Char('n') | KeyCode::Char('a')) => m.open_create_input(),
        (_, KeyCode::Enter | KeyCode::Char('e')) => {
            if let Some(task) = m.selected_task().cloned() {
                m.open_editor(task);
            }
        }
        (_, KeyCode::Char('m')) => m.open_board_picker(out),
        (_, KeyCode::Char('J')) => m.open_jump_picker(),
        (_, KeyCode::Char('A')) => m.open_archive_confirm(out),
        (_, KeyCode::Char('x') | KeyCode::Delete) => m.open_delete_confirm(),

        // Other views
        (_, KeyCode::Char('2') | KeyCode::Tab) => out.push(Intent::SwitchView(ViewKind::Board)),
        (_, KeyCode::Char('3')) => out.push(Intent::SwitchView(ViewKind::Notes)),
        (_, KeyCode::Char('4')) => out.push(Intent::SwitchView(ViewKind::Agenda)),
        (_, KeyCode::Char('r')) => out.push(Intent::Reload),
        (_, KeyCode::Char('q')) => out.push(Intent::Quit),
        _ => {}
    }
}

/// Move the cursor to the start of the next or previous group
fn jump_group(m: &mut TaskManager, forward: bool) {
    let starts = m.view().group_starts();
    let cursor = m.viewport.cursor;
    let target = if forward {
        starts.iter().copied().find(|&s| s > cursor)
    } else {
        starts.iter().copied().rev().find(|&s| s < cursor)
    };
    if let Some(index) = target {
        let len = m.view().len();
        m.viewport.move_to(index, len);
    }
}
