use std::collections::{BTreeSet, VecDeque};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::config::Config;
use crate::model::task::{Task, TaskId};
use crate::ops::filter::{FileViewMode, FilterState};
use crate::ops::group::GroupState;
use crate::ops::sort::SortState;
use crate::ops::view::{DerivedView, Viewport, recompute};

use super::components::{
    ConfirmAction, ConfirmResult, ConfirmationModal, DatePicker, DatePickerResult, EditorResult,
    FuzzyPicker, InputValidator, PickerResult, TaskEditor, TextInput, TextInputResult,
    text_input::validate_date,
};
use super::input;
use super::message::{DatePurpose, InputPurpose, Intent, Msg, PickerPurpose, ViewKind};
use super::mode::{InputMode, InputModeContext};

/// The manager's single overlay slot. At most one sub-component owns
/// input at a time; the editor hosts its own nested slot.
#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    Confirm(ConfirmationModal),
    Picker {
        picker: FuzzyPicker,
        purpose: PickerPurpose,
    },
    Input {
        input: TextInput,
        purpose: InputPurpose,
    },
    DatePicker {
        picker: DatePicker,
        purpose: DatePurpose,
    },
    Editor(TaskEditor),
}

impl Overlay {
    pub fn is_none(&self) -> bool {
        matches!(self, Overlay::None)
    }
}

/// One row of the task list as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLine<'a> {
    Header {
        label: &'a str,
        count: usize,
    },
    Task {
        index: usize,
        selected: bool,
        task: &'a Task,
    },
}

/// Orchestrates the task list: owns the raw tasks, the view state and the
/// derived view, routes every message to exactly one handler, and reports
/// side effects as `Intent`s.
pub struct TaskManager {
    tasks: Vec<Task>,
    view: DerivedView,
    pub filter: FilterState,
    pub sort: SortState,
    pub group: GroupState,
    pub file_view: FileViewMode,
    pub viewport: Viewport,
    pub mode: InputModeContext,
    pub(crate) overlay: Overlay,
    boards: Vec<String>,
    default_file: String,
    archive_file: String,
    today: NaiveDate,
    queue: VecDeque<Msg>,
}

impl TaskManager {
    pub fn new(tasks: Vec<Task>, config: &Config, today: NaiveDate) -> Self {
        let mut manager = TaskManager {
            tasks,
            view: DerivedView::default(),
            filter: FilterState::default(),
            sort: SortState::default(),
            group: GroupState::default(),
            file_view: FileViewMode::All,
            viewport: Viewport::default(),
            mode: InputModeContext::new(),
            overlay: Overlay::None,
            boards: config.boards.clone(),
            default_file: config.default_file.clone(),
            archive_file: config.archive_file.clone(),
            today,
            queue: VecDeque::new(),
        };
        manager.refresh(None);
        manager
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn boards(&self) -> &[String] {
        &self.boards
    }

    pub fn archive_file(&self) -> &str {
        &self.archive_file
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.view.display_tasks.get(self.viewport.cursor)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Process one message, plus anything it queues, to completion
    pub fn update(&mut self, msg: Msg) -> Vec<Intent> {
        let mut out = Vec::new();
        self.queue.push_back(msg);
        while let Some(msg) = self.queue.pop_front() {
            self.dispatch(msg, &mut out);
        }
        for intent in &out {
            debug!(?intent, "intent");
        }
        out
    }

    /// Queue a message to be handled before `update` returns
    pub(crate) fn enqueue(&mut self, msg: Msg) {
        self.queue.push_back(msg);
    }

    fn dispatch(&mut self, msg: Msg, out: &mut Vec<Intent>) {
        match msg {
            Msg::PickerDone { purpose, result } => self.on_picker_done(purpose, result, out),
            Msg::InputDone { purpose, result } => self.on_input_done(purpose, result, out),
            Msg::DateDone { purpose, result } => self.on_date_done(purpose, result, out),
            Msg::ConfirmDone(result) => self.on_confirm_done(result, out),
            Msg::EditorDone(result) => self.on_editor_done(result, out),

            Msg::Key(key) => input::handle_key(self, key, out),
            Msg::Resize { rows } => {
                let len = self.view.len();
                self.viewport.set_visible_rows(rows, len);
            }
            Msg::TaskUpdated(task) => {
                let keep = self.selected_id();
                self.upsert(task);
                self.refresh(keep);
            }
            Msg::TaskDeleted(id) => {
                self.remove(&id);
                self.recompute();
            }
            Msg::TasksReloaded(Ok(tasks)) => {
                debug!(count = tasks.len(), "tasks reloaded");
                let keep = self.selected_id();
                self.tasks = tasks;
                self.refresh(keep);
            }
            Msg::TasksReloaded(Err(err)) => {
                warn!(error = %err, "task reload failed, keeping current tasks");
                out.push(Intent::Notice(format!("Reload failed: {}", err)));
            }
            Msg::ArchiveComplete { count } => {
                out.push(Intent::Notice(archived_notice(count)));
                out.push(Intent::Reload);
            }
            Msg::BoardsLoaded(boards) => self.boards = boards,
            Msg::TaskMovedToBoard {
                id,
                board,
                column,
                card,
            } => {
                self.remove(&id);
                self.recompute();
                out.push(Intent::OpenBoardAt {
                    board,
                    column,
                    card,
                });
                out.push(Intent::SwitchView(ViewKind::Board));
            }
            Msg::FocusTask(id) => self.focus(&id),
        }
    }

    // -- derived view --

    /// Recompute the derived view, keeping the cursor on the selected task
    pub fn recompute(&mut self) {
        let keep = self.selected_id();
        self.refresh(keep);
    }

    fn refresh(&mut self, keep: Option<TaskId>) {
        self.view = recompute(
            &self.tasks,
            &self.filter,
            self.file_view,
            &self.sort,
            &self.group,
        );
        let len = self.view.len();
        match keep.and_then(|id| self.view.position(&id)) {
            Some(pos) => self.viewport.move_to(pos, len),
            None => self.viewport.clamp(len),
        }
    }

    /// Escape baseline: no filters, no sort, grouped by file ascending,
    /// every file shown
    pub fn reset_view_state(&mut self) {
        self.filter.clear();
        self.sort.clear();
        self.group.reset();
        self.file_view = FileViewMode::All;
        self.mode.clear_scratch();
        self.recompute();
    }

    fn focus(&mut self, id: &TaskId) {
        if self.find(id).is_none() {
            debug!(%id, "focus requested for unknown task");
            return;
        }
        if self.view.position(id).is_none() {
            self.reset_view_state();
        }
        if let Some(pos) = self.view.position(id) {
            let len = self.view.len();
            self.viewport.move_to(pos, len);
        }
    }

    // -- task collection --

    fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    fn remove(&mut self, id: &TaskId) {
        self.tasks.retain(|t| &t.id != id);
    }

    /// Apply an edit locally and ask the host to persist it
    pub(crate) fn write_task(&mut self, task: Task, out: &mut Vec<Intent>) {
        let id = task.id.clone();
        self.upsert(task.clone());
        self.refresh(Some(id));
        out.push(Intent::UpdateTask(task));
    }

    /// Every project used by any task, sorted
    pub fn known_projects(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.tasks.iter().flat_map(|t| &t.projects).collect();
        set.into_iter().cloned().collect()
    }

    pub fn known_contexts(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.tasks.iter().flat_map(|t| &t.contexts).collect();
        set.into_iter().cloned().collect()
    }

    pub fn known_files(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.tasks.iter().map(|t| &t.file).collect();
        set.into_iter().cloned().collect()
    }

    /// Completed tasks not yet in the archive file
    pub fn archivable_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.done && t.file != self.archive_file)
            .count()
    }

    // -- opening overlays --

    fn open(&mut self, overlay: Overlay, mode: InputMode) {
        self.overlay = overlay;
        self.mode.transition_to(mode);
    }

    pub(crate) fn open_filter_picker(&mut self, purpose: PickerPurpose) {
        let (title, items, selected) = match purpose {
            PickerPurpose::FilterProjects => ("Filter projects", self.known_projects(), &self.filter.projects),
            PickerPurpose::FilterContexts => ("Filter contexts", self.known_contexts(), &self.filter.contexts),
            PickerPurpose::FilterFiles => ("Filter files", self.known_files(), &self.filter.files),
            _ => return,
        };
        let picker = FuzzyPicker::multi(title, items, selected.iter().cloned());
        self.open(Overlay::Picker { picker, purpose }, InputMode::FuzzyPicker);
    }

    pub(crate) fn open_jump_picker(&mut self) {
        let (names, ids): (Vec<String>, Vec<TaskId>) = self
            .view
            .display_tasks
            .iter()
            .map(|t| (t.name.clone(), t.id.clone()))
            .unzip();
        let picker = FuzzyPicker::single("Jump to task", names);
        self.open(
            Overlay::Picker {
                picker,
                purpose: PickerPurpose::Jump(ids),
            },
            InputMode::FuzzyPicker,
        );
    }

    pub(crate) fn open_board_picker(&mut self, out: &mut Vec<Intent>) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.done {
            out.push(Intent::Notice(
                "Completed tasks can't be moved to a board".to_string(),
            ));
            return;
        }
        if self.boards.is_empty() {
            out.push(Intent::Notice("No boards configured".to_string()));
            return;
        }
        let purpose = PickerPurpose::Board(task.id.clone());
        let picker = FuzzyPicker::single("Move to board", self.boards.clone());
        self.open(Overlay::Picker { picker, purpose }, InputMode::BoardPicker);
    }

    pub(crate) fn open_project_picker(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let picker = FuzzyPicker::multi("Projects", self.known_projects(), task.projects.iter().cloned())
            .with_new_entries();
        let purpose = PickerPurpose::Projects(task.id.clone());
        self.open(Overlay::Picker { picker, purpose }, InputMode::EditProject);
    }

    pub(crate) fn open_context_picker(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let picker = FuzzyPicker::multi("Contexts", self.known_contexts(), task.contexts.iter().cloned())
            .with_new_entries();
        let purpose = PickerPurpose::Contexts(task.id.clone());
        self.open(Overlay::Picker { picker, purpose }, InputMode::EditContext);
    }

    pub(crate) fn open_date_picker(&mut self, scheduled: bool) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id.clone();
        let (picker, purpose, mode) = if scheduled {
            (
                DatePicker::new("Scheduled date", task.scheduled_date(), self.today),
                DatePurpose::Scheduled(id),
                InputMode::EditScheduledDate,
            )
        } else {
            (
                DatePicker::new("Due date", task.due_date(), self.today),
                DatePurpose::Due(id),
                InputMode::EditDueDate,
            )
        };
        self.open(Overlay::DatePicker { picker, purpose }, mode);
    }

    /// Typed due date, validated as yyyy-MM-dd
    pub(crate) fn open_date_input(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let initial = task.due_date().map(|d| d.to_string()).unwrap_or_default();
        let input = TextInput::new("Due (yyyy-MM-dd)", initial).with_validator(InputValidator::Date);
        let purpose = InputPurpose::DueDate(task.id.clone());
        self.open(Overlay::Input { input, purpose }, InputMode::DateInput);
    }

    pub(crate) fn open_url_input(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let input = TextInput::new("URL", task.url().unwrap_or_default());
        let purpose = InputPurpose::Url(task.id.clone());
        self.open(Overlay::Input { input, purpose }, InputMode::EditURL);
    }

    pub(crate) fn open_create_input(&mut self) {
        let input = TextInput::new("New task", "");
        self.open(
            Overlay::Input {
                input,
                purpose: InputPurpose::CreateTask,
            },
            InputMode::CreateTask,
        );
    }

    pub(crate) fn open_editor(&mut self, task: Task) {
        let editor = TaskEditor::new(
            task,
            self.known_projects(),
            self.known_contexts(),
            self.today,
        );
        self.open(Overlay::Editor(editor), InputMode::TaskEditor);
    }

    pub(crate) fn open_archive_confirm(&mut self, out: &mut Vec<Intent>) {
        let count = self.archivable_count();
        if count == 0 {
            out.push(Intent::Notice("No completed tasks to archive".to_string()));
            return;
        }
        let modal = ConfirmationModal::new(ConfirmAction::Archive { count });
        self.open(Overlay::Confirm(modal), InputMode::Confirmation);
    }

    pub(crate) fn open_delete_confirm(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let modal = ConfirmationModal::new(ConfirmAction::Delete {
            id: task.id.clone(),
            name: task.name.clone(),
        });
        self.open(Overlay::Confirm(modal), InputMode::Confirmation);
    }

    // -- result handlers --

    /// Clear the slot and leave the overlay's mode: back to where it was
    /// opened from when cancelled, to Normal once applied.
    fn close_overlay(&mut self, cancelled: bool) {
        self.overlay = Overlay::None;
        if cancelled {
            self.mode.back();
        } else {
            self.mode.reset();
            self.mode.clear_scratch();
        }
    }

    fn on_picker_done(&mut self, purpose: PickerPurpose, result: PickerResult, out: &mut Vec<Intent>) {
        self.close_overlay(result.cancelled);
        if result.cancelled {
            return;
        }
        match purpose {
            PickerPurpose::FilterProjects => {
                self.filter.projects = result.selection.into_iter().collect();
                self.recompute();
            }
            PickerPurpose::FilterContexts => {
                self.filter.contexts = result.selection.into_iter().collect();
                self.recompute();
            }
            PickerPurpose::FilterFiles => {
                self.filter.files = result.selection.into_iter().collect();
                self.recompute();
            }
            PickerPurpose::Board(id) => {
                if let (Some(board), Some(task)) = (result.selection.into_iter().next(), self.find(&id)) {
                    out.push(Intent::MoveToBoard {
                        task: task.clone(),
                        board,
                    });
                }
            }
            PickerPurpose::Jump(ids) => {
                if let Some(id) = result.index.and_then(|i| ids.get(i))
                    && let Some(pos) = self.view.position(id)
                {
                    let len = self.view.len();
                    self.viewport.move_to(pos, len);
                }
            }
            PickerPurpose::Projects(id) => {
                if let Some(mut task) = self.find(&id).cloned() {
                    task.set_projects(result.selection);
                    self.write_task(task, out);
                }
            }
            PickerPurpose::Contexts(id) => {
                if let Some(mut task) = self.find(&id).cloned() {
                    task.set_contexts(result.selection);
                    self.write_task(task, out);
                }
            }
        }
    }

    fn on_input_done(&mut self, purpose: InputPurpose, result: TextInputResult, out: &mut Vec<Intent>) {
        self.close_overlay(result.cancelled);
        if result.cancelled {
            return;
        }
        match purpose {
            InputPurpose::CreateTask => {
                let name = result.value.trim();
                if name.is_empty() {
                    return;
                }
                let task = Task::new(TaskId::generate(), name, self.default_file.clone());
                self.write_task(task.clone(), out);
                self.open_editor(task);
            }
            InputPurpose::DueDate(id) => {
                let date = match validate_date(&result.value) {
                    Ok(date) => date,
                    Err(err) => {
                        warn!(error = %err, "rejected typed due date");
                        return;
                    }
                };
                if let Some(mut task) = self.find(&id).cloned()
                    && task.due_date() != date
                {
                    task.set_due_date(date);
                    self.write_task(task, out);
                }
            }
            InputPurpose::Url(id) => {
                if let Some(mut task) = self.find(&id).cloned() {
                    let before = task.url().map(str::to_string);
                    task.set_url(Some(result.value.as_str()));
                    if task.url().map(str::to_string) != before {
                        self.write_task(task, out);
                    }
                }
            }
        }
    }

    fn on_date_done(&mut self, purpose: DatePurpose, result: DatePickerResult, out: &mut Vec<Intent>) {
        self.close_overlay(result.cancelled);
        if result.cancelled {
            return;
        }
        let (id, scheduled) = match purpose {
            DatePurpose::Due(id) => (id, false),
            DatePurpose::Scheduled(id) => (id, true),
        };
        let Some(mut task) = self.find(&id).cloned() else {
            return;
        };
        let current = if scheduled {
            task.scheduled_date()
        } else {
            task.due_date()
        };
        if current == result.date {
            return;
        }
        if scheduled {
            task.set_scheduled_date(result.date);
        } else {
            task.set_due_date(result.date);
        }
        self.write_task(task, out);
    }

    fn on_confirm_done(&mut self, result: ConfirmResult, out: &mut Vec<Intent>) {
        self.close_overlay(!result.confirmed);
        if !result.confirmed {
            return;
        }
        match result.action {
            ConfirmAction::Archive { count } => out.push(Intent::Archive { count }),
            ConfirmAction::Delete { id, .. } => out.push(Intent::DeleteTask { id }),
        }
    }

    fn on_editor_done(&mut self, result: EditorResult, out: &mut Vec<Intent>) {
        self.close_overlay(!result.saved);
        if result.saved && !result.changed.is_empty() {
            debug!(id = %result.task.id, changed = ?result.changed, "editor saved");
            self.write_task(result.task, out);
        }
    }

    // -- rendering support --

    /// Rows for the visible window: tasks from the scroll offset, with a
    /// header before each group start
    pub fn display_lines(&self) -> Vec<DisplayLine<'_>> {
        let len = self.view.len();
        let start = self.viewport.scroll_offset.min(len);
        let end = (start + self.viewport.visible_rows).min(len);
        let starts = self.view.group_starts();
        let mut lines = Vec::new();

        for index in start..end {
            let group_idx = match starts.binary_search(&index) {
                Ok(g) => Some(g),
                // Window opens mid-group: repeat that group's header
                Err(g) if index == start && g > 0 => Some(g - 1),
                Err(_) => None,
            };
            if let Some(group) = group_idx.and_then(|g| self.view.groups.get(g)) {
                lines.push(DisplayLine::Header {
                    label: &group.label,
                    count: group.tasks.len(),
                });
            }
            lines.push(DisplayLine::Task {
                index,
                selected: index == self.viewport.cursor,
                task: &self.view.display_tasks[index],
            });
        }
        lines
    }
}

fn archived_notice(count: usize) -> String {
    if count == 1 {
        "Archived 1 task".to_string()
    } else {
        format!("Archived {} tasks", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use crate::ops::group::GroupField;
    use crate::tui::components::EditorField;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, name: &str) -> Task {
        Task::new(TaskId::from(id), name, "todo.txt")
    }

    fn manager(tasks: Vec<Task>) -> TaskManager {
        let mut m = TaskManager::new(tasks, &Config::default(), ymd(2025, 1, 1));
        // Flat list unless a test groups explicitly
        m.group.field = None;
        m.recompute();
        m
    }

    fn press(m: &mut TaskManager, code: KeyCode) -> Vec<Intent> {
        m.update(Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ch(m: &mut TaskManager, c: char) -> Vec<Intent> {
        press(m, KeyCode::Char(c))
    }

    fn names(m: &TaskManager) -> Vec<&str> {
        m.view().display_tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn startup_groups_by_file_descending() {
        let m = TaskManager::new(vec![task("1", "a")], &Config::default(), ymd(2025, 1, 1));
        assert_eq!(m.group.field, Some(GroupField::File));
        assert!(!m.group.ascending);
        assert_eq!(m.view().groups.len(), 1);
    }

    #[test]
    fn typing_search_narrows_the_view() {
        let mut m = manager(vec![task("1", "Groceries"), task("2", "Laundry")]);
        ch(&mut m, '/');
        assert_eq!(m.mode.mode, InputMode::Search);
        for c in "groc".chars() {
            ch(&mut m, c);
        }
        assert_eq!(names(&m), vec!["Groceries"]);
        // Enter keeps the query and leaves search
        press(&mut m, KeyCode::Enter);
        assert!(m.mode.is_normal());
        assert_eq!(names(&m), vec!["Groceries"]);
    }

    #[test]
    fn escape_from_normal_restores_baseline() {
        let mut m = manager(vec![task("1", "a"), task("2", "b")]);
        m.filter.search = "a".into();
        m.filter.cycle_priority();
        m.sort.field = crate::ops::sort::SortField::DueDate;
        m.group.field = Some(GroupField::Project);
        m.group.ascending = false;
        m.file_view = FileViewMode::DoneOnly;
        m.recompute();

        press(&mut m, KeyCode::Esc);
        assert!(m.filter.is_empty());
        assert!(!m.sort.is_active());
        assert_eq!(
            m.group,
            GroupState {
                field: Some(GroupField::File),
                ascending: true
            }
        );
        assert_eq!(m.file_view, FileViewMode::All);
        assert_eq!(m.view().len(), 2);
    }

    #[test]
    fn escape_closes_only_the_filter_picker() {
        let mut t = task("1", "Groceries");
        t.projects.insert("home".into());
        let mut m = manager(vec![t, task("2", "Laundry")]);
        m.filter.search = "groc".into();
        m.recompute();

        ch(&mut m, 'f');
        assert_eq!(m.mode.mode, InputMode::FilterSelect);
        ch(&mut m, 'p');
        assert_eq!(m.mode.mode, InputMode::FuzzyPicker);
        assert!(matches!(m.overlay(), Overlay::Picker { .. }));

        press(&mut m, KeyCode::Esc);
        assert!(m.overlay().is_none());
        assert_eq!(m.mode.mode, InputMode::FilterSelect);
        assert_eq!(m.filter.search, "groc");
        assert_eq!(names(&m), vec!["Groceries"]);
    }

    #[test]
    fn priority_filter_cycles_through_letters() {
        let mut m = manager(vec![task("1", "a")]);
        let mut seen = Vec::new();
        for _ in 0..7 {
            ch(&mut m, 'P');
            seen.push(m.filter.priorities.iter().next().copied());
        }
        assert_eq!(
            seen,
            vec![
                Some(Priority::A),
                Some(Priority::B),
                Some(Priority::C),
                Some(Priority::D),
                Some(Priority::E),
                Some(Priority::F),
                None
            ]
        );
    }

    #[test]
    fn sort_by_due_date_through_direction_mode() {
        let mut a = task("1", "ten");
        a.set_due_date(Some(ymd(2025, 1, 10)));
        let mut b = task("2", "five");
        b.set_due_date(Some(ymd(2025, 1, 5)));
        let c = task("3", "none");
        let mut m = manager(vec![a, b, c]);

        ch(&mut m, 'o');
        ch(&mut m, 'd');
        assert_eq!(m.mode.mode, InputMode::SortDirection);
        ch(&mut m, 'a');
        assert!(m.mode.is_normal());
        assert_eq!(names(&m), vec!["five", "ten", "none"]);

        ch(&mut m, 'o');
        ch(&mut m, 'd');
        ch(&mut m, 'd');
        assert_eq!(names(&m), vec!["ten", "five", "none"]);
    }

    #[test]
    fn cursor_stays_on_task_across_recompute() {
        let mut m = manager(vec![task("1", "b"), task("2", "a"), task("3", "c")]);
        ch(&mut m, 'j');
        assert_eq!(m.selected_task().unwrap().name, "a");
        // Editing re-sorts nothing here but still recomputes
        ch(&mut m, 'p');
        assert_eq!(m.selected_task().unwrap().name, "a");
        assert_eq!(m.selected_task().unwrap().priority, Priority::A);
    }

    #[test]
    fn quick_edit_emits_update_and_applies_locally() {
        let mut m = manager(vec![task("1", "a")]);
        let out = ch(&mut m, 't');
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], Intent::UpdateTask(t) if t.done));
        assert!(m.tasks()[0].done);
    }

    #[test]
    fn archive_with_nothing_done_is_a_notice() {
        let mut m = manager(vec![task("1", "a")]);
        let out = ch(&mut m, 'A');
        assert_eq!(
            out,
            vec![Intent::Notice("No completed tasks to archive".into())]
        );
        assert!(m.mode.is_normal());
        assert!(m.overlay().is_none());
    }

    #[test]
    fn archive_confirm_emits_request_then_reload_on_ack() {
        let mut done = task("1", "a");
        done.done = true;
        let mut archived = task("2", "b");
        archived.done = true;
        archived.file = "done.txt".into();
        let mut m = manager(vec![done, archived, task("3", "c")]);

        ch(&mut m, 'A');
        match m.overlay() {
            Overlay::Confirm(modal) => assert_eq!(modal.message(), "Archive 1 completed task?"),
            other => panic!("expected confirm, got {:?}", other),
        }
        let out = ch(&mut m, 'y');
        assert_eq!(out, vec![Intent::Archive { count: 1 }]);
        assert!(m.mode.is_normal());

        let out = m.update(Msg::ArchiveComplete { count: 1 });
        assert_eq!(
            out,
            vec![Intent::Notice("Archived 1 task".into()), Intent::Reload]
        );
    }

    #[test]
    fn delete_cancel_has_no_effect() {
        let mut m = manager(vec![task("1", "a")]);
        ch(&mut m, 'x');
        assert_eq!(m.mode.mode, InputMode::Confirmation);
        let out = ch(&mut m, 'n');
        assert!(out.is_empty());
        assert!(m.mode.is_normal());

        ch(&mut m, 'x');
        let out = ch(&mut m, 'y');
        assert_eq!(out, vec![Intent::DeleteTask { id: "1".into() }]);
        m.update(Msg::TaskDeleted("1".into()));
        assert!(m.view().is_empty());
    }

    #[test]
    fn blank_new_task_aborts_silently() {
        let mut m = manager(vec![]);
        ch(&mut m, 'n');
        assert_eq!(m.mode.mode, InputMode::CreateTask);
        ch(&mut m, ' ');
        let out = press(&mut m, KeyCode::Enter);
        assert!(out.is_empty());
        assert!(m.mode.is_normal());
        assert!(m.tasks().is_empty());
    }

    #[test]
    fn new_task_opens_editor() {
        let mut m = manager(vec![]);
        ch(&mut m, 'n');
        for c in "Call mom".chars() {
            ch(&mut m, c);
        }
        let out = press(&mut m, KeyCode::Enter);
        assert!(matches!(&out[..], [Intent::UpdateTask(t)] if t.name == "Call mom" && t.file == "todo.txt"));
        assert_eq!(m.mode.mode, InputMode::TaskEditor);
        assert!(matches!(m.overlay(), Overlay::Editor(_)));

        // Cancelling the editor keeps the basic task
        let out = press(&mut m, KeyCode::Esc);
        assert!(out.is_empty());
        assert!(m.mode.is_normal());
        assert_eq!(names(&m), vec!["Call mom"]);
    }

    #[test]
    fn editor_save_writes_back_changed_task() {
        let mut m = manager(vec![task("1", "a")]);
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.mode.mode, InputMode::TaskEditor);
        // Cycle priority in the editor, then save
        ch(&mut m, 'p');
        let out = m.update(Msg::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(matches!(&out[..], [Intent::UpdateTask(t)] if t.priority == Priority::A));
        assert_eq!(m.tasks()[0].priority, Priority::A);
        assert!(m.mode.is_normal());
    }

    #[test]
    fn editor_escape_unwinds_one_level() {
        let mut m = manager(vec![task("1", "a")]);
        ch(&mut m, 'e');
        ch(&mut m, 'd');
        match m.overlay() {
            Overlay::Editor(ed) => assert!(ed.overlay().is_some()),
            other => panic!("expected editor, got {:?}", other),
        }
        press(&mut m, KeyCode::Esc);
        match m.overlay() {
            Overlay::Editor(ed) => {
                assert!(ed.overlay().is_none());
                assert_eq!(ed.current_field(), EditorField::DueDate);
            }
            other => panic!("expected editor, got {:?}", other),
        }
        press(&mut m, KeyCode::Esc);
        assert!(m.overlay().is_none());
        assert!(m.mode.is_normal());
    }

    #[test]
    fn typed_due_date_is_validated() {
        let mut m = manager(vec![task("1", "a")]);
        ch(&mut m, 'D');
        assert_eq!(m.mode.mode, InputMode::DateInput);
        for c in "2025-02-30".chars() {
            ch(&mut m, c);
        }
        let out = press(&mut m, KeyCode::Enter);
        assert!(out.is_empty());
        assert_eq!(m.mode.mode, InputMode::DateInput);
        match m.overlay() {
            Overlay::Input { input, .. } => assert!(input.error.is_some()),
            other => panic!("expected input, got {:?}", other),
        }
        press(&mut m, KeyCode::Backspace);
        press(&mut m, KeyCode::Backspace);
        ch(&mut m, '2');
        ch(&mut m, '8');
        let out = press(&mut m, KeyCode::Enter);
        assert!(matches!(&out[..], [Intent::UpdateTask(t)] if t.due_date() == Some(ymd(2025, 2, 28))));
    }

    #[test]
    fn move_to_board_guards_and_ack() {
        let mut m = manager(vec![task("1", "a")]);
        let out = ch(&mut m, 'm');
        assert_eq!(out, vec![Intent::Notice("No boards configured".into())]);

        m.update(Msg::BoardsLoaded(vec!["work.md".into()]));
        ch(&mut m, 'm');
        assert_eq!(m.mode.mode, InputMode::BoardPicker);
        let out = press(&mut m, KeyCode::Enter);
        assert!(matches!(&out[..], [Intent::MoveToBoard { board, .. }] if board == "work.md"));

        let out = m.update(Msg::TaskMovedToBoard {
            id: "1".into(),
            board: "work.md".into(),
            column: 0,
            card: 2,
        });
        assert_eq!(
            out,
            vec![
                Intent::OpenBoardAt {
                    board: "work.md".into(),
                    column: 0,
                    card: 2
                },
                Intent::SwitchView(ViewKind::Board)
            ]
        );
        assert!(m.tasks().is_empty());
    }

    #[test]
    fn done_task_cannot_move_to_board() {
        let mut t = task("1", "a");
        t.done = true;
        let mut m = manager(vec![t]);
        m.update(Msg::BoardsLoaded(vec!["work.md".into()]));
        let out = ch(&mut m, 'm');
        assert!(matches!(&out[..], [Intent::Notice(_)]));
        assert!(m.mode.is_normal());
    }

    #[test]
    fn jump_picker_lands_on_the_chosen_duplicate() {
        let mut m = manager(vec![task("1", "Call mom"), task("2", "Call mom"), task("3", "Pay rent")]);
        ch(&mut m, 'J');
        press(&mut m, KeyCode::Down);
        press(&mut m, KeyCode::Enter);
        assert!(m.mode.is_normal());
        assert_eq!(m.viewport.cursor, 1);
        assert_eq!(m.selected_id(), Some(TaskId::from("2")));
    }

    #[test]
    fn failed_reload_keeps_stale_tasks() {
        let mut m = manager(vec![task("1", "a")]);
        let out = m.update(Msg::TasksReloaded(Err("disk gone".into())));
        assert_eq!(out, vec![Intent::Notice("Reload failed: disk gone".into())]);
        assert_eq!(names(&m), vec!["a"]);
    }

    #[test]
    fn focus_resets_filters_when_task_hidden() {
        let mut m = manager(vec![task("1", "a"), task("2", "b")]);
        m.filter.search = "a".into();
        m.recompute();
        m.update(Msg::FocusTask("2".into()));
        assert!(m.filter.is_empty());
        assert_eq!(m.selected_task().unwrap().name, "b");
    }

    #[test]
    fn display_lines_insert_group_headers() {
        let mut a = task("1", "a");
        a.projects.insert("home".into());
        let mut b = task("2", "b");
        b.projects.insert("work".into());
        let mut m = manager(vec![a, b, task("3", "c")]);
        m.group.field = Some(GroupField::Project);
        m.group.ascending = true;
        m.recompute();

        let rendered: Vec<String> = m
            .display_lines()
            .iter()
            .map(|line| match line {
                DisplayLine::Header { label, count } => format!("# {} ({})", label, count),
                DisplayLine::Task { selected, task, .. } => {
                    format!("{} {}", if *selected { ">" } else { " " }, task.name)
                }
            })
            .collect();
        insta::assert_snapshot!(rendered.join("\n"), @r"
        # home (1)
        > a
        # work (1)
          b
        # (none) (1)
          c
        ");
    }
}
