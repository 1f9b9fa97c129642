use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::task::{Priority, Task};
use crate::tui::app::App;
use crate::tui::manager::DisplayLine;

use super::helpers::{pad_spans, truncate_spans};

/// Render the task list with group headers
pub fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;
    let manager = &app.manager;

    if manager.view().is_empty() {
        let text = if manager.tasks().is_empty() {
            "No tasks yet. Press n to add one."
        } else {
            "No tasks match. Press Esc to clear filters."
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(app.theme.dim).bg(bg),
        )))
        .style(Style::default().bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    for display in manager.display_lines() {
        match display {
            DisplayLine::Header { label, count } => {
                lines.push(header_line(app, label, count, width));
            }
            DisplayLine::Task { selected, task, .. } => {
                if selected {
                    selected_line = lines.len();
                }
                lines.push(task_line(app, task, selected, width));
            }
        }
    }

    // Headers take rows too; keep the cursor row on screen
    let skip = (selected_line + 1).saturating_sub(height);
    let lines: Vec<Line> = lines.into_iter().skip(skip).take(height).collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn header_line(app: &App, label: &str, count: usize, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let mut spans = vec![
        Span::styled(
            format!(" {}", label),
            Style::default()
                .fg(app.theme.header)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", count), Style::default().fg(app.theme.dim).bg(bg)),
    ];
    spans = truncate_spans(spans, width);
    pad_spans(&mut spans, width, Style::default().bg(bg));
    Line::from(spans)
}

fn task_line(app: &App, task: &Task, selected: bool, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let text_fg = if task.done { theme.dim } else { theme.text };
    let base = Style::default().fg(text_fg).bg(bg);

    let mut spans: Vec<Span<'static>> = Vec::new();
    spans.push(Span::styled(if selected { "\u{25B8} " } else { "  " }, base.fg(theme.highlight)));
    spans.push(Span::styled(if task.done { "[x] " } else { "[ ] " }, base));

    if task.priority != Priority::None {
        let fg = if task.done {
            theme.dim
        } else {
            theme.priority_color(task.priority)
        };
        spans.push(Span::styled(
            format!("{} ", task.priority),
            base.fg(fg).add_modifier(Modifier::BOLD),
        ));
    }

    let mut name_style = if selected {
        base.fg(theme.text_bright)
    } else {
        base
    };
    if task.done {
        name_style = name_style.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT);
    }
    spans.push(Span::styled(task.name.clone(), name_style));

    for project in &task.projects {
        spans.push(Span::styled(format!(" +{}", project), base.fg(theme.purple)));
    }
    for context in &task.contexts {
        spans.push(Span::styled(format!(" @{}", context), base.fg(theme.cyan)));
    }
    if let Some(due) = task.due_date() {
        let fg = if !task.done && due < app.manager.today() {
            theme.red
        } else if due == app.manager.today() {
            theme.yellow
        } else {
            theme.dim
        };
        spans.push(Span::styled(format!(" due:{}", due), base.fg(fg)));
    }
    if let Some(scheduled) = task.scheduled_date() {
        spans.push(Span::styled(format!(" t:{}", scheduled), base.fg(theme.dim)));
    }
    if task.url().is_some() {
        spans.push(Span::styled(" \u{2197}", base.fg(theme.blue)));
    }

    let mut spans = truncate_spans(spans, width);
    pad_spans(&mut spans, width, Style::default().bg(bg));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn grouped_list_shows_headers_and_cursor() {
        let app = sample_app();
        let output = render_to_string(TERM_W, 8, |frame, area| {
            render_task_list(frame, &app, area);
        });
        assert!(output.contains(" done.txt (1)"));
        assert!(output.contains(" todo.txt (2)"));
        assert!(output.contains("\u{25B8} [ ] (A) Buy milk +home @store due:2025-01-10"));
        assert!(output.contains("  [x] Old report"));
    }

    #[test]
    fn long_names_are_truncated() {
        let app = sample_app();
        let output = render_to_string(16, 8, |frame, area| {
            render_task_list(frame, &app, area);
        });
        assert!(output.contains("\u{25B8} [ ] (A) Buy m\u{2026}"));
    }

    #[test]
    fn empty_list_message_depends_on_filters() {
        let mut app = sample_app();
        app.manager.filter.search = "zzz".into();
        app.manager.recompute();
        let output = render_to_string(TERM_W, 4, |frame, area| {
            render_task_list(frame, &app, area);
        });
        assert!(output.contains("No tasks match"));

        let app = app_with_tasks(Vec::new());
        let output = render_to_string(TERM_W, 4, |frame, area| {
            render_task_list(frame, &app, area);
        });
        assert!(output.contains("No tasks yet"));
    }

    #[test]
    fn cursor_row_stays_visible_below_headers() {
        let mut app = sample_app();
        app.handle(crate::tui::message::Msg::Resize { rows: 2 });
        app.manager.viewport.bottom(app.manager.view().len());
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_task_list(frame, &app, area);
        });
        assert!(output.contains("\u{25B8}"));
    }
}
