use std::fmt;

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Tag key holding the due date (`due:2025-01-10`)
pub const DUE_KEY: &str = "due";
/// Tag key holding the scheduled (threshold) date (`t:2025-01-10`)
pub const SCHEDULED_KEY: &str = "t";
/// Tag key holding a link (`url:https://…`)
pub const URL_KEY: &str = "url";

/// Date format used for date tags and typed date input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identity of a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Fresh random id for a task that has never been persisted
    pub fn generate() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Task priority. `None` orders before `A`; `A` is the most urgent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Priority {
    #[default]
    None,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Priority {
    /// All real priorities, most urgent first
    pub const LETTERS: [Priority; 6] = [
        Priority::A,
        Priority::B,
        Priority::C,
        Priority::D,
        Priority::E,
        Priority::F,
    ];

    /// Next priority in the cycle None → A → … → F → None
    pub fn cycle(self) -> Priority {
        match self {
            Priority::None => Priority::A,
            Priority::A => Priority::B,
            Priority::B => Priority::C,
            Priority::C => Priority::D,
            Priority::D => Priority::E,
            Priority::E => Priority::F,
            Priority::F => Priority::None,
        }
    }

    pub fn letter(self) -> Option<char> {
        match self {
            Priority::None => None,
            Priority::A => Some('A'),
            Priority::B => Some('B'),
            Priority::C => Some('C'),
            Priority::D => Some('D'),
            Priority::E => Some('E'),
            Priority::F => Some('F'),
        }
    }

    /// Priority for a letter, case-insensitive
    pub fn from_letter(c: char) -> Option<Priority> {
        Priority::LETTERS
            .into_iter()
            .find(|p| p.letter() == Some(c.to_ascii_uppercase()))
    }

    pub fn is_none(self) -> bool {
        self == Priority::None
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter() {
            Some(c) => write!(f, "({})", c),
            None => f.write_str("-"),
        }
    }
}

/// A single task record.
///
/// Due date, scheduled date and URL live in `tags` under reserved keys so the
/// record stays a faithful todo.txt line; the typed accessors below are the
/// only sanctioned way to read or write them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Project tags (without the `+` prefix)
    #[serde(default)]
    pub projects: IndexSet<String>,
    /// Context tags (without the `@` prefix)
    #[serde(default)]
    pub contexts: IndexSet<String>,
    /// `key:value` tags, keys unique
    #[serde(default)]
    pub tags: IndexMap<String, String>,
    /// Source file name, e.g. `todo.txt`
    pub file: String,
}

impl Task {
    /// Create an open task with no priority, tags or dates
    pub fn new(id: TaskId, name: impl Into<String>, file: impl Into<String>) -> Self {
        Task {
            id,
            name: name.into(),
            done: false,
            priority: Priority::None,
            projects: IndexSet::new(),
            contexts: IndexSet::new(),
            tags: IndexMap::new(),
            file: file.into(),
        }
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.date_tag(DUE_KEY)
    }

    pub fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.set_date_tag(DUE_KEY, date);
    }

    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        self.date_tag(SCHEDULED_KEY)
    }

    pub fn set_scheduled_date(&mut self, date: Option<NaiveDate>) {
        self.set_date_tag(SCHEDULED_KEY, date);
    }

    pub fn url(&self) -> Option<&str> {
        self.tags.get(URL_KEY).map(|s| s.as_str())
    }

    /// Set or clear the URL. Blank values clear the tag.
    pub fn set_url(&mut self, url: Option<&str>) {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) => {
                self.tags.insert(URL_KEY.to_string(), u.to_string());
            }
            None => {
                self.tags.shift_remove(URL_KEY);
            }
        }
    }

    /// Replace the project set, dropping blank entries
    pub fn set_projects<I: IntoIterator<Item = String>>(&mut self, projects: I) {
        self.projects = clean_names(projects);
    }

    /// Replace the context set, dropping blank entries
    pub fn set_contexts<I: IntoIterator<Item = String>>(&mut self, contexts: I) {
        self.contexts = clean_names(contexts);
    }

    /// First project in case-insensitive alphabetical order
    pub fn primary_project(&self) -> Option<&str> {
        first_alphabetical(&self.projects)
    }

    /// First context in case-insensitive alphabetical order
    pub fn primary_context(&self) -> Option<&str> {
        first_alphabetical(&self.contexts)
    }

    /// Lowercased haystack for substring search: name, `+project`s,
    /// `@context`s and `key:value` tags separated by spaces.
    pub fn search_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        for p in &self.projects {
            text.push_str(" +");
            text.push_str(&p.to_lowercase());
        }
        for c in &self.contexts {
            text.push_str(" @");
            text.push_str(&c.to_lowercase());
        }
        for (k, v) in &self.tags {
            text.push(' ');
            text.push_str(&k.to_lowercase());
            text.push(':');
            text.push_str(&v.to_lowercase());
        }
        text
    }

    fn date_tag(&self, key: &str) -> Option<NaiveDate> {
        self.tags
            .get(key)
            .and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
    }

    fn set_date_tag(&mut self, key: &str, date: Option<NaiveDate>) {
        match date {
            Some(d) => {
                self.tags
                    .insert(key.to_string(), d.format(DATE_FORMAT).to_string());
            }
            None => {
                self.tags.shift_remove(key);
            }
        }
    }
}

fn first_alphabetical(names: &IndexSet<String>) -> Option<&str> {
    names
        .iter()
        .min_by_key(|s| s.to_lowercase())
        .map(|s| s.as_str())
}

fn clean_names<I: IntoIterator<Item = String>>(names: I) -> IndexSet<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn priority_cycles_through_letters_and_back() {
        let mut p = Priority::None;
        let mut seen = Vec::new();
        for _ in 0..7 {
            p = p.cycle();
            seen.push(p);
        }
        assert_eq!(
            seen,
            vec![
                Priority::A,
                Priority::B,
                Priority::C,
                Priority::D,
                Priority::E,
                Priority::F,
                Priority::None
            ]
        );
    }

    #[test]
    fn priority_from_letter() {
        assert_eq!(Priority::from_letter('b'), Some(Priority::B));
        assert_eq!(Priority::from_letter('F'), Some(Priority::F));
        assert_eq!(Priority::from_letter('G'), None);
    }

    #[test]
    fn priority_orders_none_first() {
        assert!(Priority::None < Priority::A);
        assert!(Priority::A < Priority::F);
    }

    #[test]
    fn date_tags_round_trip_through_accessors() {
        let mut task = Task::new("1".into(), "Pay rent", "todo.txt");
        task.set_due_date(Some(date("2025-01-10")));
        assert_eq!(task.tags.get(DUE_KEY).map(String::as_str), Some("2025-01-10"));
        assert_eq!(task.due_date(), Some(date("2025-01-10")));

        task.set_due_date(None);
        assert!(task.due_date().is_none());
        assert!(!task.tags.contains_key(DUE_KEY));
    }

    #[test]
    fn malformed_date_tag_reads_as_missing() {
        let mut task = Task::new("1".into(), "x", "todo.txt");
        task.tags.insert(DUE_KEY.into(), "tomorrow".into());
        assert!(task.due_date().is_none());
    }

    #[test]
    fn blank_url_clears_tag() {
        let mut task = Task::new("1".into(), "x", "todo.txt");
        task.set_url(Some("https://example.com"));
        assert_eq!(task.url(), Some("https://example.com"));
        task.set_url(Some("   "));
        assert_eq!(task.url(), None);
    }

    #[test]
    fn set_projects_drops_blank_entries() {
        let mut task = Task::new("1".into(), "x", "todo.txt");
        task.set_projects(vec!["home".into(), " ".into(), "work".into()]);
        assert_eq!(task.projects.len(), 2);
        assert_eq!(task.primary_project(), Some("home"));
    }

    #[test]
    fn primary_entries_ignore_case() {
        let mut task = Task::new("1".into(), "x", "todo.txt");
        task.projects.insert("Zeta".into());
        task.projects.insert("alpha".into());
        task.contexts.insert("Phone".into());
        task.contexts.insert("errands".into());
        assert_eq!(task.primary_project(), Some("alpha"));
        assert_eq!(task.primary_context(), Some("errands"));
    }

    #[test]
    fn search_text_includes_prefixed_tags() {
        let mut task = Task::new("1".into(), "Buy Milk", "todo.txt");
        task.projects.insert("Home".into());
        task.contexts.insert("store".into());
        task.tags.insert("due".into(), "2025-01-05".into());
        assert_eq!(task.search_text(), "buy milk +home @store due:2025-01-05");
    }
}
