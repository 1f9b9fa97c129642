use crate::ops::filter::FilterCategory;
use crate::ops::view::FieldKey;

/// Maximum number of modes remembered for `back()`
const HISTORY_LIMIT: usize = 16;

/// The single active interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    FilterSelect,
    SortSelect,
    GroupSelect,
    SortDirection,
    GroupDirection,
    Search,
    DateInput,
    CreateTask,
    TaskEditor,
    EditDueDate,
    EditScheduledDate,
    EditProject,
    EditContext,
    EditURL,
    Confirmation,
    BoardPicker,
    FuzzyPicker,
}

impl InputMode {
    /// Short name shown in the status row
    pub fn label(self) -> &'static str {
        match self {
            InputMode::Normal => "NORMAL",
            InputMode::FilterSelect => "FILTER",
            InputMode::SortSelect => "SORT",
            InputMode::GroupSelect => "GROUP",
            InputMode::SortDirection => "SORT DIR",
            InputMode::GroupDirection => "GROUP DIR",
            InputMode::Search => "SEARCH",
            InputMode::DateInput => "DATE",
            InputMode::CreateTask => "NEW",
            InputMode::TaskEditor => "EDIT",
            InputMode::EditDueDate => "DUE",
            InputMode::EditScheduledDate => "SCHEDULED",
            InputMode::EditProject => "PROJECT",
            InputMode::EditContext => "CONTEXT",
            InputMode::EditURL => "URL",
            InputMode::Confirmation => "CONFIRM",
            InputMode::BoardPicker => "BOARD",
            InputMode::FuzzyPicker => "PICK",
        }
    }
}

/// Current mode plus the scratch values and history needed to step back.
///
/// No transition is rejected here. Callers set `field`/`category` before
/// entering a mode that needs them and clear them once consumed.
#[derive(Debug, Clone)]
pub struct InputModeContext {
    pub mode: InputMode,
    /// Sort/group key awaiting a direction choice
    pub field: Option<FieldKey>,
    /// Filter category awaiting a value choice
    pub category: Option<FilterCategory>,
    history: Vec<InputMode>,
}

impl Default for InputModeContext {
    fn default() -> Self {
        InputModeContext::new()
    }
}

impl InputModeContext {
    pub fn new() -> Self {
        InputModeContext {
            mode: InputMode::Normal,
            field: None,
            category: None,
            history: Vec::new(),
        }
    }

    /// Enter `mode`, remembering the current one
    pub fn transition_to(&mut self, mode: InputMode) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(self.mode);
        tracing::trace!(from = ?self.mode, to = ?mode, "mode transition");
        self.mode = mode;
    }

    /// Return to the previous mode (Normal when there is none)
    pub fn back(&mut self) {
        let prev = self.history.pop().unwrap_or(InputMode::Normal);
        tracing::trace!(from = ?self.mode, to = ?prev, "mode back");
        self.mode = prev;
    }

    /// Drop all history and return to Normal
    pub fn reset(&mut self) {
        self.history.clear();
        self.mode = InputMode::Normal;
    }

    pub fn clear_scratch(&mut self) {
        self.field = None;
        self.category = None;
    }

    pub fn is_normal(&self) -> bool {
        self.mode == InputMode::Normal
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
