use crate::model::task::{Task, TaskId};

use super::filter::{FileViewMode, FilterState, apply_file_view_filter, apply_filters};
use super::group::{GroupState, TaskGroup, apply_groups};
use super::sort::{SortState, apply_sort};

/// A task field that sorting or grouping can key on. Used as the pending
/// choice while a direction prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    DueDate,
    Project,
    Priority,
    Context,
    File,
}

/// Output of the derived-view pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedView {
    /// Flat list the cursor indexes into (group order when grouped)
    pub display_tasks: Vec<Task>,
    /// Groups in display order; empty when grouping is inactive
    pub groups: Vec<TaskGroup>,
}

impl DerivedView {
    pub fn len(&self) -> usize {
        self.display_tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_tasks.is_empty()
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.display_tasks.iter().position(|t| &t.id == id)
    }

    /// Index into `display_tasks` of the first task of every group
    pub fn group_starts(&self) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.groups.len());
        let mut offset = 0;
        for group in &self.groups {
            starts.push(offset);
            offset += group.tasks.len();
        }
        starts
    }
}

/// Run filter → file-view restrict → sort → group over the raw tasks.
pub fn recompute(
    tasks: &[Task],
    filter: &FilterState,
    file_view: FileViewMode,
    sort: &SortState,
    group: &GroupState,
) -> DerivedView {
    let filtered = apply_filters(tasks, filter);
    let restricted = apply_file_view_filter(filtered, file_view);
    let sorted = apply_sort(restricted, sort);

    if !group.is_active() {
        return DerivedView {
            display_tasks: sorted,
            groups: Vec::new(),
        };
    }

    let groups = apply_groups(&sorted, group);
    let display_tasks = groups.iter().flat_map(|g| g.tasks.iter().cloned()).collect();
    DerivedView {
        display_tasks,
        groups,
    }
}

/// Cursor and scroll window over the flat display list.
///
/// For a non-empty list: `cursor < len` and
/// `scroll_offset <= cursor < scroll_offset + visible_rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cursor: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(20)
    }
}

impl Viewport {
    pub fn new(visible_rows: usize) -> Self {
        Viewport {
            cursor: 0,
            scroll_offset: 0,
            visible_rows: visible_rows.max(1),
        }
    }

    /// Re-establish the invariants after the list length changed
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.scroll_offset = 0;
            return;
        }
        self.cursor = self.cursor.min(len - 1);
        self.scroll_to_cursor();
        // Don't leave blank rows below the last task when scrolled
        let max_offset = len.saturating_sub(self.visible_rows);
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
    }

    pub fn set_visible_rows(&mut self, rows: usize, len: usize) {
        self.visible_rows = rows.max(1);
        self.clamp(len);
    }

    pub fn move_to(&mut self, index: usize, len: usize) {
        self.cursor = index;
        self.clamp(len);
    }

    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.clamp(len);
            return;
        }
        let target = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta as usize)
        };
        self.move_to(target.min(len - 1), len);
    }

    pub fn page_down(&mut self, len: usize) {
        self.move_by(self.visible_rows as isize, len);
    }

    pub fn page_up(&mut self, len: usize) {
        self.move_by(-(self.visible_rows as isize), len);
    }

    pub fn top(&mut self, len: usize) {
        self.move_to(0, len);
    }

    pub fn bottom(&mut self, len: usize) {
        self.move_to(len.saturating_sub(1), len);
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }
        if self.cursor >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = self.cursor + 1 - self.visible_rows;
        }
    }
}
