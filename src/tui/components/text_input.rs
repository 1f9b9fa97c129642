use std::sync::LazyLock;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;

use crate::model::task::DATE_FORMAT;
use crate::util::unicode;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// Reason a submitted value was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected yyyy-MM-dd")]
    DateFormat,
    #[error("{0} is not a calendar date")]
    InvalidDate(String),
}

/// Check a typed date. Empty text means "clear the date" and is always valid.
pub fn validate_date(text: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if !DATE_RE.is_match(text) {
        return Err(ValidationError::DateFormat);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

/// What a submitted value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputValidator {
    Any,
    Date,
}

impl InputValidator {
    fn check(self, text: &str) -> Result<(), ValidationError> {
        match self {
            InputValidator::Any => Ok(()),
            InputValidator::Date => validate_date(text).map(|_| ()),
        }
    }
}

/// Outcome of a closed text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputResult {
    pub value: String,
    pub cancelled: bool,
}

/// Single-line text prompt with optional validation
#[derive(Debug, Clone)]
pub struct TextInput {
    pub prompt: String,
    pub buffer: String,
    /// Byte offset of the cursor in `buffer`
    pub cursor: usize,
    pub validator: InputValidator,
    /// Last validation failure, shown inline until the next edit
    pub error: Option<ValidationError>,
}

impl TextInput {
    pub fn new(prompt: impl Into<String>, initial: impl Into<String>) -> Self {
        let buffer = initial.into();
        TextInput {
            prompt: prompt.into(),
            cursor: buffer.len(),
            buffer,
            validator: InputValidator::Any,
            error: None,
        }
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Handle a key. Returns a result once the input closes.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<TextInputResult> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                return Some(TextInputResult {
                    value: self.buffer.clone(),
                    cancelled: true,
                });
            }
            (_, KeyCode::Enter) => match self.validator.check(&self.buffer) {
                Ok(()) => {
                    return Some(TextInputResult {
                        value: self.buffer.trim().to_string(),
                        cancelled: false,
                    });
                }
                Err(e) => {
                    self.error = Some(e);
                    return None;
                }
            },
            (_, KeyCode::Left) => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
                    self.cursor = prev;
                }
                return None;
            }
            (_, KeyCode::Right) => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
                    self.cursor = next;
                }
                return None;
            }
            (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.cursor = 0;
                return None;
            }
            (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                self.cursor = self.buffer.len();
                return None;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
                let start = unicode::word_boundary_left(&self.buffer, self.cursor);
                self.buffer.drain(start..self.cursor);
                self.cursor = start;
            }
            (_, KeyCode::Backspace) => {
                match unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
                    Some(prev) => {
                        self.buffer.drain(prev..self.cursor);
                        self.cursor = prev;
                    }
                    None => return None,
                }
            }
            (_, KeyCode::Delete) => {
                match unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
                    Some(next) => {
                        self.buffer.drain(self.cursor..next);
                    }
                    None => return None,
                }
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            _ => return None,
        }
        // Any edit dismisses a stale validation message
        self.error = None;
        None
    }
}
