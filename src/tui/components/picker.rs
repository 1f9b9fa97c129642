//! Fuzzy picker overlay.
//!
//! Single-select pickers return the item under the cursor; multi-select
//! pickers toggle items with Tab and return the whole checked set. Ranking
//! uses `nucleo-matcher` with smart normalization and case-insensitive
//! matching; an empty query lists items in their original order.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexSet;
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Outcome of a closed picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerResult {
    pub selection: Vec<String>,
    /// Position in the original item list of the confirmed item
    /// (single-select only)
    pub index: Option<usize>,
    pub cancelled: bool,
}

impl PickerResult {
    fn cancelled() -> Self {
        PickerResult {
            selection: Vec::new(),
            index: None,
            cancelled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FuzzyPicker {
    pub title: String,
    items: Vec<String>,
    pub query: String,
    /// Indices into `items`, best match first
    matches: Vec<usize>,
    pub cursor: usize,
    pub multi: bool,
    /// Confirming a query that matches nothing returns the query itself
    pub allow_new: bool,
    selected: IndexSet<String>,
    /// A Tab toggle happened since the query last changed
    toggled: bool,
}

impl FuzzyPicker {
    pub fn single(title: impl Into<String>, items: Vec<String>) -> Self {
        let matches = (0..items.len()).collect();
        FuzzyPicker {
            title: title.into(),
            items,
            query: String::new(),
            matches,
            cursor: 0,
            multi: false,
            allow_new: false,
            selected: IndexSet::new(),
            toggled: false,
        }
    }

    /// Multi-select picker with `selected` pre-checked. Pre-checked values
    /// missing from `items` are added so they can be unchecked.
    pub fn multi<I>(title: impl Into<String>, mut items: Vec<String>, selected: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let selected: IndexSet<String> = selected.into_iter().collect();
        for s in &selected {
            if !items.contains(s) {
                items.push(s.clone());
            }
        }
        let mut picker = FuzzyPicker::single(title, items);
        picker.multi = true;
        picker.selected = selected;
        picker
    }

    pub fn with_new_entries(mut self) -> Self {
        self.allow_new = true;
        self
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PickerResult> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return Some(PickerResult::cancelled()),
            (_, KeyCode::Enter) => return Some(self.confirm()),
            (_, KeyCode::Up) | (KeyModifiers::CONTROL, KeyCode::Char('p' | 'k')) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            (_, KeyCode::Down) | (KeyModifiers::CONTROL, KeyCode::Char('n' | 'j')) => {
                if self.cursor + 1 < self.matches.len() {
                    self.cursor += 1;
                }
            }
            (_, KeyCode::Tab) | (KeyModifiers::CONTROL, KeyCode::Char(' ')) => {
                if self.multi {
                    self.toggle_current();
                }
            }
            (_, KeyCode::Backspace) => {
                if self.query.pop().is_some() {
                    self.refilter();
                }
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.query.push(c);
                self.refilter();
            }
            _ => {}
        }
        None
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&str> {
        self.matches
            .get(self.cursor)
            .map(|&i| self.items[i].as_str())
    }

    pub fn is_selected(&self, item: &str) -> bool {
        self.selected.contains(item)
    }

    /// Items currently passing the query, in display order
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|&i| self.items[i].as_str())
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    fn new_entry(&self) -> Option<String> {
        let q = self.query.trim();
        if self.allow_new && !q.is_empty() && self.matches.is_empty() {
            Some(q.to_string())
        } else {
            None
        }
    }

    fn confirm(&self) -> PickerResult {
        let new_entry = self.new_entry();
        if self.multi {
            let mut selection: Vec<String> = self.selected.iter().cloned().collect();
            // A typed query confirms the highlighted match unless Tab already
            // decided it
            let typed = if self.query.trim().is_empty() || self.toggled {
                None
            } else {
                self.current().map(str::to_string)
            };
            for entry in typed.into_iter().chain(new_entry) {
                if !selection.contains(&entry) {
                    selection.push(entry);
                }
            }
            return PickerResult {
                selection,
                index: None,
                cancelled: false,
            };
        }

        let index = self.matches.get(self.cursor).copied();
        let selection = match (self.current(), new_entry) {
            (Some(item), _) => vec![item.to_string()],
            (None, Some(entry)) => vec![entry],
            (None, None) => Vec::new(),
        };
        PickerResult {
            selection,
            index,
            cancelled: false,
        }
    }

    fn toggle_current(&mut self) {
        self.toggled = true;
        if let Some(item) = self.current().map(str::to_string)
            && !self.selected.shift_remove(&item)
        {
            self.selected.insert(item);
        }
    }

    fn refilter(&mut self) {
        self.cursor = 0;
        self.toggled = false;
        if self.query.is_empty() {
            self.matches = (0..self.items.len()).collect();
            return;
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let atom = Atom::new(
            &self.query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
            false,
        );
        let mut buf = Vec::new();
        let mut scored: Vec<(usize, u16)> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                atom.score(Utf32Str::new(item, &mut buf), &mut matcher)
                    .map(|score| (i, score))
            })
            .collect();
        // Best score first; ties keep original order
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        self.matches = scored.into_iter().map(|(i, _)| i).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(picker: &mut FuzzyPicker, s: &str) {
        for c in s.chars() {
            picker.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn items() -> Vec<String> {
        vec!["home".into(), "work".into(), "garden".into()]
    }

    #[test]
    fn empty_query_lists_all_in_order() {
        let picker = FuzzyPicker::single("Board", items());
        assert_eq!(picker.visible().collect::<Vec<_>>(), vec!["home", "work", "garden"]);
    }

    #[test]
    fn typing_narrows_and_enter_returns_current() {
        let mut picker = FuzzyPicker::single("Board", items());
        type_str(&mut picker, "wrk");
        assert_eq!(picker.visible().collect::<Vec<_>>(), vec!["work"]);
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result.selection, vec!["work".to_string()]);
        assert!(!result.cancelled);
    }

    #[test]
    fn backspace_widens_again() {
        let mut picker = FuzzyPicker::single("Board", items());
        type_str(&mut picker, "gz");
        assert_eq!(picker.match_count(), 0);
        picker.handle_key(key(KeyCode::Backspace));
        picker.handle_key(key(KeyCode::Backspace));
        assert_eq!(picker.match_count(), 3);
    }

    #[test]
    fn cursor_moves_within_matches() {
        let mut picker = FuzzyPicker::single("Board", items());
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.current(), Some("garden"));
        picker.handle_key(key(KeyCode::Up));
        assert_eq!(picker.current(), Some("work"));
    }

    #[test]
    fn multi_select_toggles_and_keeps_preselection() {
        let mut picker = FuzzyPicker::multi("Projects", items(), vec!["work".to_string()]);
        assert!(picker.is_selected("work"));
        // Tab on "home" checks it; Tab on "work" unchecks it
        picker.handle_key(key(KeyCode::Tab));
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Tab));
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result.selection, vec!["home".to_string()]);
    }

    #[test]
    fn unknown_preselection_is_listed() {
        let picker = FuzzyPicker::multi("Projects", items(), vec!["errands".to_string()]);
        assert_eq!(picker.match_count(), 4);
        assert!(picker.is_selected("errands"));
    }

    #[test]
    fn new_entry_added_when_nothing_matches() {
        let mut picker = FuzzyPicker::multi("Projects", items(), Vec::new()).with_new_entries();
        type_str(&mut picker, "xyz");
        assert_eq!(picker.match_count(), 0);
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result.selection, vec!["xyz".to_string()]);
    }

    #[test]
    fn typed_known_item_is_added_on_enter() {
        let mut picker = FuzzyPicker::multi("Projects", items(), vec!["home".to_string()])
            .with_new_entries();
        type_str(&mut picker, "work");
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result.selection, vec!["home".to_string(), "work".to_string()]);
    }

    #[test]
    fn tab_after_typing_decides_the_match() {
        let mut picker = FuzzyPicker::multi("Projects", items(), vec!["work".to_string()]);
        type_str(&mut picker, "work");
        // Unchecking the typed match must stick
        picker.handle_key(key(KeyCode::Tab));
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(result.selection.is_empty());
    }

    #[test]
    fn single_select_reports_original_index() {
        let mut picker = FuzzyPicker::single("Jump", vec!["a".into(), "b".into(), "b".into()]);
        type_str(&mut picker, "b");
        picker.handle_key(key(KeyCode::Down));
        let result = picker.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result.selection, vec!["b".to_string()]);
        assert_eq!(result.index, Some(2));
    }

    #[test]
    fn escape_cancels_with_empty_selection() {
        let mut picker = FuzzyPicker::multi("Projects", items(), vec!["home".to_string()]);
        let result = picker.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(result.cancelled);
        assert!(result.selection.is_empty());
    }
}
