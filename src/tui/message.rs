//! Messages into the task manager and the intents it emits.

use crossterm::event::KeyEvent;

use crate::model::task::{Task, TaskId};

use super::components::{ConfirmResult, DatePickerResult, EditorResult, PickerResult, TextInputResult};

/// Top-level views the host can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    TaskList,
    Board,
    Notes,
    Agenda,
}

impl ViewKind {
    pub fn label(self) -> &'static str {
        match self {
            ViewKind::TaskList => "Tasks",
            ViewKind::Board => "Board",
            ViewKind::Notes => "Notes",
            ViewKind::Agenda => "Agenda",
        }
    }
}

/// What a fuzzy picker was opened for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerPurpose {
    FilterProjects,
    FilterContexts,
    FilterFiles,
    /// Choose a board for the task
    Board(TaskId),
    /// Move the cursor to a visible task; ids in picker item order
    Jump(Vec<TaskId>),
    Projects(TaskId),
    Contexts(TaskId),
}

/// What a text input was opened for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    CreateTask,
    DueDate(TaskId),
    Url(TaskId),
}

/// Which date a date picker edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePurpose {
    Due(TaskId),
    Scheduled(TaskId),
}

/// Everything the task manager reacts to: raw keys, collaborator
/// acknowledgements, and results from its own overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Key(KeyEvent),
    /// Rows available for the task list
    Resize { rows: usize },
    TaskUpdated(Task),
    TaskDeleted(TaskId),
    TasksReloaded(Result<Vec<Task>, String>),
    ArchiveComplete { count: usize },
    BoardsLoaded(Vec<String>),
    TaskMovedToBoard {
        id: TaskId,
        board: String,
        column: usize,
        card: usize,
    },
    FocusTask(TaskId),

    PickerDone {
        purpose: PickerPurpose,
        result: PickerResult,
    },
    InputDone {
        purpose: InputPurpose,
        result: TextInputResult,
    },
    DateDone {
        purpose: DatePurpose,
        result: DatePickerResult,
    },
    ConfirmDone(ConfirmResult),
    EditorDone(EditorResult),
}

/// Side effects requested from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    UpdateTask(Task),
    DeleteTask { id: TaskId },
    Archive { count: usize },
    MoveToBoard { task: Task, board: String },
    FocusTask { id: TaskId },
    OpenBoardAt {
        board: String,
        column: usize,
        card: usize,
    },
    SwitchView(ViewKind),
    Reload,
    Notice(String),
    Quit,
}
