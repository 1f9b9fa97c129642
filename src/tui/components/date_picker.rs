use chrono::{Datelike, Duration, Months, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Outcome of a closed date picker. `date == None` with `cancelled == false`
/// means the user cleared the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePickerResult {
    pub date: Option<NaiveDate>,
    pub cancelled: bool,
}

/// Calendar-style date chooser moved by day, week and month
#[derive(Debug, Clone)]
pub struct DatePicker {
    pub title: String,
    pub selected: NaiveDate,
    pub today: NaiveDate,
}

impl DatePicker {
    /// Start on `initial`, or on today when the task has no date yet
    pub fn new(title: impl Into<String>, initial: Option<NaiveDate>, today: NaiveDate) -> Self {
        DatePicker {
            title: title.into(),
            selected: initial.unwrap_or(today),
            today,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DatePickerResult> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                return Some(DatePickerResult {
                    date: None,
                    cancelled: true,
                });
            }
            (_, KeyCode::Enter) => {
                return Some(DatePickerResult {
                    date: Some(self.selected),
                    cancelled: false,
                });
            }
            (_, KeyCode::Backspace | KeyCode::Delete) | (KeyModifiers::NONE, KeyCode::Char('x')) => {
                return Some(DatePickerResult {
                    date: None,
                    cancelled: false,
                });
            }
            (_, KeyCode::Char('h') | KeyCode::Left) => self.shift_days(-1),
            (_, KeyCode::Char('l') | KeyCode::Right) => self.shift_days(1),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.shift_days(-7),
            (_, KeyCode::Char('j') | KeyCode::Down) => self.shift_days(7),
            (_, KeyCode::Char('H') | KeyCode::PageUp | KeyCode::Char('[')) => self.shift_months(-1),
            (_, KeyCode::Char('L') | KeyCode::PageDown | KeyCode::Char(']')) => {
                self.shift_months(1)
            }
            (_, KeyCode::Char('t')) => self.selected = self.today,
            _ => {}
        }
        None
    }

    fn shift_days(&mut self, days: i64) {
        if let Some(d) = self.selected.checked_add_signed(Duration::days(days)) {
            self.selected = d;
        }
    }

    fn shift_months(&mut self, months: i32) {
        let shifted = if months < 0 {
            self.selected.checked_sub_months(Months::new(months.unsigned_abs()))
        } else {
            self.selected.checked_add_months(Months::new(months as u32))
        };
        if let Some(d) = shifted {
            self.selected = d;
        }
    }

    /// Rows of the month containing the selection, Monday first.
    /// Days outside the month are `None`.
    pub fn month_grid(&self) -> Vec<[Option<NaiveDate>; 7]> {
        let first = self.selected.with_day(1).unwrap_or(self.selected);
        let lead = first.weekday().num_days_from_monday() as usize;
        let mut rows = Vec::new();
        let mut row = [None; 7];
        let mut col = lead;
        let mut day = first;
        while day.month() == first.month() {
            row[col] = Some(day);
            col += 1;
            if col == 7 {
                rows.push(row);
                row = [None; 7];
                col = 0;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        if col > 0 {
            rows.push(row);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starts_on_today_without_initial_date() {
        let picker = DatePicker::new("Due", None, ymd(2025, 1, 10));
        assert_eq!(picker.selected, ymd(2025, 1, 10));
    }

    #[test]
    fn moves_by_day_week_and_month() {
        let mut picker = DatePicker::new("Due", Some(ymd(2025, 1, 31)), ymd(2025, 1, 1));
        picker.handle_key(key('l'));
        assert_eq!(picker.selected, ymd(2025, 2, 1));
        picker.handle_key(key('k'));
        assert_eq!(picker.selected, ymd(2025, 1, 25));
        picker.handle_key(key('L'));
        assert_eq!(picker.selected, ymd(2025, 2, 25));
        picker.handle_key(key('H'));
        picker.handle_key(key('H'));
        assert_eq!(picker.selected, ymd(2024, 12, 25));
        picker.handle_key(key('t'));
        assert_eq!(picker.selected, ymd(2025, 1, 1));
    }

    #[test]
    fn month_shift_clamps_to_last_day() {
        let mut picker = DatePicker::new("Due", Some(ymd(2025, 1, 31)), ymd(2025, 1, 1));
        picker.handle_key(key(']'));
        assert_eq!(picker.selected, ymd(2025, 2, 28));
    }

    #[test]
    fn enter_clear_and_escape() {
        let mut picker = DatePicker::new("Due", Some(ymd(2025, 3, 3)), ymd(2025, 1, 1));
        assert_eq!(
            picker.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Some(DatePickerResult {
                date: Some(ymd(2025, 3, 3)),
                cancelled: false
            })
        );
        assert_eq!(
            picker.handle_key(key('x')),
            Some(DatePickerResult {
                date: None,
                cancelled: false
            })
        );
        let esc = picker
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(esc.cancelled);
    }

    #[test]
    fn month_grid_starts_on_monday() {
        // 2025-01-01 is a Wednesday
        let picker = DatePicker::new("Due", Some(ymd(2025, 1, 15)), ymd(2025, 1, 1));
        let grid = picker.month_grid();
        assert_eq!(grid[0][0], None);
        assert_eq!(grid[0][2], Some(ymd(2025, 1, 1)));
        assert_eq!(grid.len(), 5);
        let days: usize = grid.iter().flatten().filter(|d| d.is_some()).count();
        assert_eq!(days, 31);
    }
}
