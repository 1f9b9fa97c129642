use std::path::Path;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::config::Config;
use crate::model::task::{Priority, Task, TaskId};
use crate::tui::app::App;
use crate::tui::message::Msg;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over `tasks` that never touches the disk unless an intent runs.
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut app = App::new(
        Path::new("/nonexistent/tasklane-test"),
        &Config::default(),
        tasks,
        today,
    );
    app.handle(Msg::Resize { rows: 20 });
    app
}

/// Two open tasks in todo.txt and one archived task in done.txt.
pub fn sample_app() -> App {
    let mut milk = Task::new(TaskId::from("1"), "Buy milk", "todo.txt");
    milk.priority = Priority::A;
    milk.projects.insert("home".into());
    milk.contexts.insert("store".into());
    milk.set_due_date(NaiveDate::from_ymd_opt(2025, 1, 10));

    let call = Task::new(TaskId::from("2"), "Call plumber", "todo.txt");

    let mut report = Task::new(TaskId::from("3"), "Old report", "done.txt");
    report.done = true;

    app_with_tasks(vec![milk, call, report])
}

pub fn press(app: &mut App, code: KeyCode) {
    app.handle(Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}
