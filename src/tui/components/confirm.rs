use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::TaskId;

/// What a confirmation will do when accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Move `count` completed tasks to the archive file
    Archive { count: usize },
    /// Delete one task
    Delete { id: TaskId, name: String },
}

impl ConfirmAction {
    pub fn message(&self) -> String {
        match self {
            ConfirmAction::Archive { count: 1 } => "Archive 1 completed task?".to_string(),
            ConfirmAction::Archive { count } => format!("Archive {} completed tasks?", count),
            ConfirmAction::Delete { name, .. } => format!("Delete \"{}\"?", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmResult {
    pub action: ConfirmAction,
    pub confirmed: bool,
}

/// Yes/no prompt holding the pending action until answered
#[derive(Debug, Clone)]
pub struct ConfirmationModal {
    pub action: ConfirmAction,
}

impl ConfirmationModal {
    pub fn new(action: ConfirmAction) -> Self {
        ConfirmationModal { action }
    }

    pub fn message(&self) -> String {
        self.action.message()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ConfirmResult> {
        let confirmed = match (key.modifiers, key.code) {
            // Confirm: y or Enter
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('y' | 'Y'))
            | (_, KeyCode::Enter) => true,
            // Cancel: n or Esc
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('n' | 'N'))
            | (_, KeyCode::Esc) => false,
            _ => return None,
        };
        Some(ConfirmResult {
            action: self.action.clone(),
            confirmed,
        })
    }
}
