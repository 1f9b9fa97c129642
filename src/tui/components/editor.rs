//! Full task editor.
//!
//! The editor owns the task being edited for its whole lifetime: it is
//! handed a `Task` by value and gives back either the edited copy (save) or
//! the untouched snapshot (cancel) in its `EditorResult`. Field edits open
//! exactly one nested overlay; closing it returns to the field list.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::Task;

use super::date_picker::{DatePicker, DatePickerResult};
use super::picker::{FuzzyPicker, PickerResult};
use super::text_input::{TextInput, TextInputResult};

/// Editable fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Priority,
    DueDate,
    ScheduledDate,
    Projects,
    Contexts,
    Url,
}

impl EditorField {
    pub const ALL: [EditorField; 6] = [
        EditorField::Priority,
        EditorField::DueDate,
        EditorField::ScheduledDate,
        EditorField::Projects,
        EditorField::Contexts,
        EditorField::Url,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditorField::Priority => "Priority",
            EditorField::DueDate => "Due",
            EditorField::ScheduledDate => "Scheduled",
            EditorField::Projects => "Projects",
            EditorField::Contexts => "Contexts",
            EditorField::Url => "URL",
        }
    }

    /// Current value rendered for the field list
    pub fn value(self, task: &Task) -> String {
        let join = |items: &indexmap::IndexSet<String>, prefix: char| {
            items
                .iter()
                .map(|s| format!("{}{}", prefix, s))
                .collect::<Vec<_>>()
                .join(" ")
        };
        match self {
            EditorField::Priority => task.priority.to_string(),
            EditorField::DueDate => task.due_date().map(|d| d.to_string()).unwrap_or_default(),
            EditorField::ScheduledDate => task
                .scheduled_date()
                .map(|d| d.to_string())
                .unwrap_or_default(),
            EditorField::Projects => join(&task.projects, '+'),
            EditorField::Contexts => join(&task.contexts, '@'),
            EditorField::Url => task.url().unwrap_or_default().to_string(),
        }
    }

    fn differs(self, a: &Task, b: &Task) -> bool {
        match self {
            EditorField::Priority => a.priority != b.priority,
            EditorField::DueDate => a.due_date() != b.due_date(),
            EditorField::ScheduledDate => a.scheduled_date() != b.scheduled_date(),
            // IndexSet equality ignores order
            EditorField::Projects => a.projects != b.projects,
            EditorField::Contexts => a.contexts != b.contexts,
            EditorField::Url => a.url() != b.url(),
        }
    }
}

/// The editor's single nested overlay slot
#[derive(Debug, Clone)]
pub enum EditorOverlay {
    Date {
        picker: DatePicker,
        field: EditorField,
    },
    Picker {
        picker: FuzzyPicker,
        field: EditorField,
    },
    Url(TextInput),
}

impl EditorOverlay {
    pub fn field(&self) -> EditorField {
        match self {
            EditorOverlay::Date { field, .. } | EditorOverlay::Picker { field, .. } => *field,
            EditorOverlay::Url(_) => EditorField::Url,
        }
    }
}

enum Outcome {
    Date(EditorField, DatePickerResult),
    Picker(EditorField, PickerResult),
    Url(TextInputResult),
}

/// Outcome of a closed editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorResult {
    pub task: Task,
    pub saved: bool,
    /// Fields that differ from the snapshot (empty on cancel)
    pub changed: Vec<EditorField>,
}

#[derive(Debug, Clone)]
pub struct TaskEditor {
    working: Task,
    original: Task,
    pub field_cursor: usize,
    overlay: Option<EditorOverlay>,
    known_projects: Vec<String>,
    known_contexts: Vec<String>,
    today: NaiveDate,
}

impl TaskEditor {
    pub fn new(
        task: Task,
        known_projects: Vec<String>,
        known_contexts: Vec<String>,
        today: NaiveDate,
    ) -> Self {
        TaskEditor {
            original: task.clone(),
            working: task,
            field_cursor: 0,
            overlay: None,
            known_projects,
            known_contexts,
            today,
        }
    }

    /// The working copy
    pub fn task(&self) -> &Task {
        &self.working
    }

    pub fn original(&self) -> &Task {
        &self.original
    }

    pub fn overlay(&self) -> Option<&EditorOverlay> {
        self.overlay.as_ref()
    }

    pub fn current_field(&self) -> EditorField {
        EditorField::ALL[self.field_cursor.min(EditorField::ALL.len() - 1)]
    }

    pub fn modified_fields(&self) -> Vec<EditorField> {
        EditorField::ALL
            .into_iter()
            .filter(|f| f.differs(&self.working, &self.original))
            .collect()
    }

    pub fn is_modified(&self) -> bool {
        !self.modified_fields().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<EditorResult> {
        if self.overlay.is_some() {
            self.handle_overlay_key(key);
            return None;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                return Some(self.cancel());
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s'))
            | (KeyModifiers::SHIFT | KeyModifiers::NONE, KeyCode::Char('S')) => {
                return Some(self.save());
            }
            (_, KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab) => {
                if self.field_cursor + 1 < EditorField::ALL.len() {
                    self.field_cursor += 1;
                }
            }
            (_, KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab) => {
                self.field_cursor = self.field_cursor.saturating_sub(1);
            }
            (_, KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char(' ')) => {
                self.open_field(self.current_field());
            }
            (_, KeyCode::Char('p')) => self.open_field(EditorField::Priority),
            (_, KeyCode::Char('d')) => self.open_field(EditorField::DueDate),
            (_, KeyCode::Char('s')) => self.open_field(EditorField::ScheduledDate),
            (_, KeyCode::Char('+')) => self.open_field(EditorField::Projects),
            (_, KeyCode::Char('@')) => self.open_field(EditorField::Contexts),
            (_, KeyCode::Char('u')) => self.open_field(EditorField::Url),
            _ => {}
        }
        None
    }

    /// Start editing `field`. Priority cycles in place; everything else
    /// opens a nested overlay.
    pub fn open_field(&mut self, field: EditorField) {
        if let Some(pos) = EditorField::ALL.iter().position(|f| *f == field) {
            self.field_cursor = pos;
        }
        self.overlay = match field {
            EditorField::Priority => {
                self.working.priority = self.working.priority.cycle();
                None
            }
            EditorField::DueDate => Some(EditorOverlay::Date {
                picker: DatePicker::new("Due date", self.working.due_date(), self.today),
                field,
            }),
            EditorField::ScheduledDate => Some(EditorOverlay::Date {
                picker: DatePicker::new(
                    "Scheduled date",
                    self.working.scheduled_date(),
                    self.today,
                ),
                field,
            }),
            EditorField::Projects => Some(EditorOverlay::Picker {
                picker: FuzzyPicker::multi(
                    "Projects",
                    self.known_projects.clone(),
                    self.working.projects.iter().cloned(),
                )
                .with_new_entries(),
                field,
            }),
            EditorField::Contexts => Some(EditorOverlay::Picker {
                picker: FuzzyPicker::multi(
                    "Contexts",
                    self.known_contexts.clone(),
                    self.working.contexts.iter().cloned(),
                )
                .with_new_entries(),
                field,
            }),
            EditorField::Url => Some(EditorOverlay::Url(TextInput::new(
                "URL",
                self.working.url().unwrap_or_default(),
            ))),
        };
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        let outcome = match self.overlay.as_mut() {
            Some(EditorOverlay::Date { picker, field }) => {
                picker.handle_key(key).map(|r| Outcome::Date(*field, r))
            }
            Some(EditorOverlay::Picker { picker, field }) => {
                picker.handle_key(key).map(|r| Outcome::Picker(*field, r))
            }
            Some(EditorOverlay::Url(input)) => input.handle_key(key).map(Outcome::Url),
            None => None,
        };
        let Some(outcome) = outcome else {
            return;
        };
        self.overlay = None;
        match outcome {
            Outcome::Date(field, r) => self.apply_date(field, r),
            Outcome::Picker(field, r) => self.apply_picker(field, r),
            Outcome::Url(r) => self.apply_url(r),
        }
    }

    fn apply_date(&mut self, field: EditorField, result: DatePickerResult) {
        if result.cancelled {
            return;
        }
        match field {
            EditorField::DueDate => self.working.set_due_date(result.date),
            EditorField::ScheduledDate => self.working.set_scheduled_date(result.date),
            _ => {}
        }
    }

    fn apply_picker(&mut self, field: EditorField, result: PickerResult) {
        if result.cancelled {
            return;
        }
        match field {
            EditorField::Projects => self.working.set_projects(result.selection),
            EditorField::Contexts => self.working.set_contexts(result.selection),
            _ => {}
        }
    }

    fn apply_url(&mut self, result: TextInputResult) {
        if !result.cancelled {
            self.working.set_url(Some(result.value.as_str()));
        }
    }

    fn save(&self) -> EditorResult {
        EditorResult {
            task: self.working.clone(),
            saved: true,
            changed: self.modified_fields(),
        }
    }

    fn cancel(&mut self) -> EditorResult {
        self.working = self.original.clone();
        EditorResult {
            task: self.original.clone(),
            saved: false,
            changed: Vec::new(),
        }
    }
}
