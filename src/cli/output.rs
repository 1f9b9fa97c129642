use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::ops::view::DerivedView;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<char>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub file: String,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub label: String,
    pub tasks: Vec<TaskJson>,
}

/// `list --json` output: groups when grouped, otherwise a flat task array
#[derive(Serialize)]
#[serde(untagged)]
pub enum ListJson {
    Groups(Vec<GroupJson>),
    Tasks(Vec<TaskJson>),
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        name: task.name.clone(),
        done: task.done,
        priority: task.priority.letter(),
        projects: task.projects.iter().cloned().collect(),
        contexts: task.contexts.iter().cloned().collect(),
        due: task.due_date().map(|d| d.to_string()),
        scheduled: task.scheduled_date().map(|d| d.to_string()),
        url: task.url().map(str::to_string),
        file: task.file.clone(),
    }
}

pub fn view_to_json(view: &DerivedView) -> ListJson {
    if view.groups.is_empty() {
        ListJson::Tasks(view.display_tasks.iter().map(task_to_json).collect())
    } else {
        ListJson::Groups(
            view.groups
                .iter()
                .map(|g| GroupJson {
                    label: g.label.clone(),
                    tasks: g.tasks.iter().map(task_to_json).collect(),
                })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One task as a todo.txt-style line: `x (A) name +project @context key:value`
pub fn format_task_line(task: &Task) -> String {
    let mut parts: Vec<String> = Vec::new();
    if task.done {
        parts.push("x".to_string());
    }
    if task.priority != Priority::None {
        parts.push(task.priority.to_string());
    }
    parts.push(task.name.clone());
    parts.extend(task.projects.iter().map(|p| format!("+{}", p)));
    parts.extend(task.contexts.iter().map(|c| format!("@{}", c)));
    parts.extend(task.tags.iter().map(|(k, v)| format!("{}:{}", k, v)));
    parts.join(" ")
}

/// The whole derived view, with `# label (count)` headers when grouped
pub fn format_view(view: &DerivedView) -> Vec<String> {
    if view.groups.is_empty() {
        return view.display_tasks.iter().map(format_task_line).collect();
    }
    let mut lines = Vec::new();
    for group in &view.groups {
        lines.push(format!("# {} ({})", group.label, group.tasks.len()));
        lines.extend(group.tasks.iter().map(|t| format!("  {}", format_task_line(t))));
    }
    lines
}
