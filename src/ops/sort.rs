use std::cmp::Ordering;

use crate::model::task::Task;

use super::view::FieldKey;

/// Field the list is sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    None,
    DueDate,
    Project,
    Priority,
    Context,
}

impl SortField {
    /// Sort field for a pending field choice. Files have no sort order.
    pub fn from_key(key: FieldKey) -> Option<SortField> {
        match key {
            FieldKey::DueDate => Some(SortField::DueDate),
            FieldKey::Project => Some(SortField::Project),
            FieldKey::Priority => Some(SortField::Priority),
            FieldKey::Context => Some(SortField::Context),
            FieldKey::File => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::None => "none",
            SortField::DueDate => "due",
            SortField::Project => "project",
            SortField::Priority => "priority",
            SortField::Context => "context",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            field: SortField::None,
            ascending: true,
        }
    }
}

impl SortState {
    pub fn is_active(&self) -> bool {
        self.field != SortField::None
    }

    pub fn clear(&mut self) {
        *self = SortState::default();
    }
}

/// Stable sort by the active field. Tasks missing the key always go last,
/// whichever direction is chosen.
pub fn apply_sort(mut tasks: Vec<Task>, sort: &SortState) -> Vec<Task> {
    let ascending = sort.ascending;
    match sort.field {
        SortField::None => {}
        SortField::DueDate => {
            tasks.sort_by(|a, b| compare_present_first(a.due_date(), b.due_date(), ascending))
        }
        SortField::Priority => tasks.sort_by(|a, b| {
            compare_present_first(priority_key(a), priority_key(b), ascending)
        }),
        SortField::Project => tasks.sort_by(|a, b| {
            compare_present_first(
                a.primary_project().map(str::to_lowercase),
                b.primary_project().map(str::to_lowercase),
                ascending,
            )
        }),
        SortField::Context => tasks.sort_by(|a, b| {
            compare_present_first(
                a.primary_context().map(str::to_lowercase),
                b.primary_context().map(str::to_lowercase),
                ascending,
            )
        }),
    }
    tasks
}

fn priority_key(task: &Task) -> Option<crate::model::task::Priority> {
    Some(task.priority).filter(|p| !p.is_none())
}

/// Direction flips only the present-vs-present comparison; `None` is always
/// the weakest value.
pub(crate) fn compare_present_first<K: Ord>(a: Option<K>, b: Option<K>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            if ascending {
                a.cmp(&b)
            } else {
                b.cmp(&a)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
