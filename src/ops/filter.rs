use std::collections::BTreeSet;

use crate::model::task::{Priority, Task};

/// Completion status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Open,
    Done,
}

impl StatusFilter {
    /// Any → Open → Done → Any
    pub fn cycle(self) -> StatusFilter {
        match self {
            StatusFilter::Any => StatusFilter::Open,
            StatusFilter::Open => StatusFilter::Done,
            StatusFilter::Done => StatusFilter::Any,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Any => "any",
            StatusFilter::Open => "open",
            StatusFilter::Done => "done",
        }
    }
}

/// Which file(s) the list shows, independent of FilterState
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileViewMode {
    #[default]
    All,
    TodoOnly,
    DoneOnly,
}

impl FileViewMode {
    /// All → TodoOnly → DoneOnly → All
    pub fn cycle(self) -> FileViewMode {
        match self {
            FileViewMode::All => FileViewMode::TodoOnly,
            FileViewMode::TodoOnly => FileViewMode::DoneOnly,
            FileViewMode::DoneOnly => FileViewMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileViewMode::All => "all",
            FileViewMode::TodoOnly => "todo",
            FileViewMode::DoneOnly => "done",
        }
    }
}

/// Filter categories offered in filter-select mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    Project,
    Context,
    File,
    Priority,
    Status,
}

/// The active filter predicate set. An empty state filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring
    pub search: String,
    pub projects: BTreeSet<String>,
    pub contexts: BTreeSet<String>,
    pub files: BTreeSet<String>,
    pub priorities: BTreeSet<Priority>,
    pub status: StatusFilter,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.projects.is_empty()
            && self.contexts.is_empty()
            && self.files.is_empty()
            && self.priorities.is_empty()
            && self.status == StatusFilter::Any
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// Step the priority filter ∅ → {A} → {B} → … → {F} → ∅.
    /// A multi-priority set (e.g. restored from elsewhere) steps back to ∅.
    pub fn cycle_priority(&mut self) {
        let next = match self.priorities.len() {
            0 => Some(Priority::A),
            1 => self
                .priorities
                .iter()
                .next()
                .map(|p| p.cycle())
                .filter(|p| !p.is_none()),
            _ => None,
        };
        self.priorities.clear();
        if let Some(p) = next {
            self.priorities.insert(p);
        }
    }

    /// Whether a task satisfies every active predicate
    pub fn matches(&self, task: &Task) -> bool {
        if !self.search.is_empty()
            && !task.search_text().contains(&self.search.to_lowercase())
        {
            return false;
        }
        if !self.projects.is_empty() && !task.projects.iter().any(|p| self.projects.contains(p)) {
            return false;
        }
        if !self.contexts.is_empty() && !task.contexts.iter().any(|c| self.contexts.contains(c)) {
            return false;
        }
        if !self.files.is_empty() && !self.files.contains(&task.file) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        match self.status {
            StatusFilter::Any => true,
            StatusFilter::Open => !task.done,
            StatusFilter::Done => task.done,
        }
    }

    /// Short summary for the status row, e.g. `+home @phone (A) open`
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.projects.iter().map(|p| format!("+{}", p)));
        parts.extend(self.contexts.iter().map(|c| format!("@{}", c)));
        parts.extend(self.files.iter().cloned());
        parts.extend(self.priorities.iter().map(|p| p.to_string()));
        if self.status != StatusFilter::Any {
            parts.push(self.status.label().to_string());
        }
        if !self.search.is_empty() {
            parts.push(format!("/{}", self.search));
        }
        parts.join(" ")
    }
}

/// Keep tasks matching every active predicate, preserving order
pub fn apply_filters(tasks: &[Task], filter: &FilterState) -> Vec<Task> {
    if filter.is_empty() {
        return tasks.to_vec();
    }
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Restrict by completion according to the file view mode
pub fn apply_file_view_filter(tasks: Vec<Task>, mode: FileViewMode) -> Vec<Task> {
    match mode {
        FileViewMode::All => tasks,
        FileViewMode::TodoOnly => tasks.into_iter().filter(|t| !t.done).collect(),
        FileViewMode::DoneOnly => tasks.into_iter().filter(|t| t.done).collect(),
    }
}
