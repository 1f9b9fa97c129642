use chrono::NaiveDate;

use crate::model::task::{DATE_FORMAT, Priority, Task};

use super::sort::compare_present_first;
use super::view::FieldKey;

/// Label of the bucket holding tasks without a group key
pub const NONE_LABEL: &str = "(none)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    DueDate,
    Project,
    Priority,
    Context,
    File,
}

impl GroupField {
    pub fn from_key(key: FieldKey) -> GroupField {
        match key {
            FieldKey::DueDate => GroupField::DueDate,
            FieldKey::Project => GroupField::Project,
            FieldKey::Priority => GroupField::Priority,
            FieldKey::Context => GroupField::Context,
            FieldKey::File => GroupField::File,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupField::DueDate => "due",
            GroupField::Project => "project",
            GroupField::Priority => "priority",
            GroupField::Context => "context",
            GroupField::File => "file",
        }
    }
}

/// Grouping configuration. `field == None` shows a flat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupState {
    pub field: Option<GroupField>,
    pub ascending: bool,
}

impl Default for GroupState {
    /// Startup grouping: by file, descending
    fn default() -> Self {
        GroupState {
            field: Some(GroupField::File),
            ascending: false,
        }
    }
}

impl GroupState {
    pub fn is_active(&self) -> bool {
        self.field.is_some()
    }

    /// Baseline restored by escape from Normal mode: by file, ascending
    pub fn reset(&mut self) {
        self.field = Some(GroupField::File);
        self.ascending = true;
    }
}

/// One labelled bucket of the grouped view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub label: String,
    pub tasks: Vec<Task>,
}

/// Ordering key of a bucket. Text keys compare case-insensitively first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Date(NaiveDate),
    Priority(Priority),
    Text(String, String),
}

impl GroupKey {
    fn text(s: &str) -> GroupKey {
        GroupKey::Text(s.to_lowercase(), s.to_string())
    }

    fn label(&self) -> String {
        match self {
            GroupKey::Date(d) => d.format(DATE_FORMAT).to_string(),
            GroupKey::Priority(p) => p.to_string(),
            GroupKey::Text(_, original) => original.clone(),
        }
    }
}

fn group_key(task: &Task, field: GroupField) -> Option<GroupKey> {
    match field {
        GroupField::DueDate => task.due_date().map(GroupKey::Date),
        GroupField::Priority => Some(task.priority)
            .filter(|p| !p.is_none())
            .map(GroupKey::Priority),
        GroupField::Project => task.primary_project().map(GroupKey::text),
        GroupField::Context => task.primary_context().map(GroupKey::text),
        GroupField::File => Some(task.file.as_str())
            .filter(|f| !f.is_empty())
            .map(GroupKey::text),
    }
}

/// Partition an already-sorted sequence into ordered groups.
///
/// Every task lands in exactly one group and keeps its relative order.
/// Buckets follow the key's natural order (dates, priority) or lexical order
/// (project, context, file), reversed when descending; `(none)` is last.
/// Returns an empty list when grouping is inactive.
pub fn apply_groups(tasks: &[Task], group: &GroupState) -> Vec<TaskGroup> {
    let field = match group.field {
        Some(f) => f,
        None => return Vec::new(),
    };

    let mut buckets: Vec<(Option<GroupKey>, Vec<Task>)> = Vec::new();
    for task in tasks {
        let key = group_key(task, field);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(task.clone()),
            None => buckets.push((key, vec![task.clone()])),
        }
    }

    buckets.sort_by(|(a, _), (b, _)| compare_present_first(a.as_ref(), b.as_ref(), group.ascending));

    buckets
        .into_iter()
        .map(|(key, tasks)| TaskGroup {
            label: key.map_or_else(|| NONE_LABEL.to_string(), |k| k.label()),
            tasks,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;
    use pretty_assertions::assert_eq;

    fn task(id: &str, name: &str, file: &str) -> Task {
        Task::new(TaskId::from(id), name, file)
    }

    fn labels(groups: &[TaskGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        let mut a = task("1", "a", "todo.txt");
        a.priority = Priority::B;
        a.projects.insert("work".into());
        a.set_due_date(NaiveDate::from_ymd_opt(2025, 1, 10));
        let mut b = task("2", "b", "done.txt");
        b.priority = Priority::A;
        b.projects.insert("Home".into());
        let c = task("3", "c", "todo.txt");
        let mut d = task("4", "d", "todo.txt");
        d.priority = Priority::B;
        d.set_due_date(NaiveDate::from_ymd_opt(2025, 1, 5));
        vec![a, b, c, d]
    }

    #[test]
    fn grouping_is_a_partition_of_the_input() {
        let tasks = sample();
        for field in [
            GroupField::DueDate,
            GroupField::Project,
            GroupField::Priority,
            GroupField::Context,
            GroupField::File,
        ] {
            for ascending in [true, false] {
                let groups = apply_groups(
                    &tasks,
                    &GroupState {
                        field: Some(field),
                        ascending,
                    },
                );
                let mut flattened: Vec<&str> = groups
                    .iter()
                    .flat_map(|g| g.tasks.iter().map(|t| t.id.0.as_str()))
                    .collect();
                assert_eq!(flattened.len(), tasks.len());
                flattened.sort();
                assert_eq!(flattened, vec!["1", "2", "3", "4"]);
            }
        }
    }

    #[test]
    fn priority_groups_use_natural_order_with_none_last() {
        let groups = apply_groups(
            &sample(),
            &GroupState {
                field: Some(GroupField::Priority),
                ascending: true,
            },
        );
        assert_eq!(labels(&groups), vec!["(A)", "(B)", NONE_LABEL]);
        // Sorted input order is preserved inside a bucket
        let b_names: Vec<&str> = groups[1].tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(b_names, vec!["a", "d"]);
    }

    #[test]
    fn descending_reverses_buckets_but_not_none() {
        let groups = apply_groups(
            &sample(),
            &GroupState {
                field: Some(GroupField::DueDate),
                ascending: false,
            },
        );
        assert_eq!(labels(&groups), vec!["2025-01-10", "2025-01-05", NONE_LABEL]);
    }

    #[test]
    fn text_keys_order_case_insensitively() {
        let groups = apply_groups(
            &sample(),
            &GroupState {
                field: Some(GroupField::Project),
                ascending: true,
            },
        );
        assert_eq!(labels(&groups), vec!["Home", "work", NONE_LABEL]);
    }

    #[test]
    fn project_group_uses_case_insensitive_first_entry() {
        let mut t = task("1", "mixed", "todo.txt");
        t.projects.insert("Zeta".into());
        t.projects.insert("alpha".into());
        let groups = apply_groups(
            &[t],
            &GroupState {
                field: Some(GroupField::Project),
                ascending: true,
            },
        );
        assert_eq!(labels(&groups), vec!["alpha"]);
    }

    #[test]
    fn default_groups_by_file_descending() {
        let groups = apply_groups(&sample(), &GroupState::default());
        assert_eq!(labels(&groups), vec!["todo.txt", "done.txt"]);
    }

    #[test]
    fn inactive_grouping_yields_no_groups() {
        let group = GroupState {
            field: None,
            ascending: true,
        };
        assert!(!group.is_active());
        assert!(apply_groups(&sample(), &group).is_empty());
    }

    #[test]
    fn reset_is_file_ascending() {
        let mut group = GroupState {
            field: Some(GroupField::Priority),
            ascending: false,
        };
        group.reset();
        assert_eq!(group.field, Some(GroupField::File));
        assert!(group.ascending);
    }
}
