//! Popups drawn over the task list: confirmation, fuzzy picker, text
//! input, date picker and the task editor (which hosts its own nested
//! popup).

use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::components::{
    ConfirmationModal, DatePicker, EditorOverlay, FuzzyPicker, TaskEditor, TextInput,
};
use crate::tui::manager::Overlay;
use crate::tui::theme::Theme;
use crate::util::unicode;

use super::helpers::{centered_rect, pad_spans, truncate_spans};

const PICKER_W: u16 = 50;
const PICKER_H: u16 = 14;
const INPUT_W: u16 = 50;
const EDITOR_W: u16 = 60;

/// Render whichever overlay the manager has open
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    match app.manager.overlay() {
        Overlay::None => {}
        Overlay::Confirm(modal) => render_confirm(frame, modal, theme, area),
        Overlay::Picker { picker, .. } => render_picker(frame, picker, theme, area),
        Overlay::Input { input, .. } => render_text_input(frame, input, theme, area),
        Overlay::DatePicker { picker, .. } => render_date_picker(frame, picker, theme, area),
        Overlay::Editor(editor) => render_editor(frame, editor, theme, area),
    }
}

/// Clear `popup` and draw a titled border; returns the inner area
fn popup_block(frame: &mut Frame, theme: &Theme, title: &str, popup: Rect) -> Rect {
    let bg = theme.background;
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    inner
}

fn hint_line(theme: &Theme, text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.dim).bg(theme.background),
    ))
}

fn render_confirm(frame: &mut Frame, modal: &ConfirmationModal, theme: &Theme, area: Rect) {
    let message = modal.message();
    let width = (unicode::display_width(&message) as u16 + 4).clamp(30, area.width);
    let popup = centered_rect(width, 5, area);
    let inner = popup_block(frame, theme, "Confirm", popup);

    let lines = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(theme.text_bright).bg(theme.background),
        )),
        Line::default(),
        hint_line(theme, "y/Enter confirm  n/Esc cancel"),
    ];
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.background)),
        inner,
    );
}

fn render_picker(frame: &mut Frame, picker: &FuzzyPicker, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let popup = centered_rect(PICKER_W, PICKER_H, area);
    let title = format!("{} ({})", picker.title, picker.match_count());
    let inner = popup_block(frame, theme, &title, popup);
    let width = inner.width as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(picker.query.clone(), Style::default().fg(theme.text_bright).bg(bg)),
        Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)),
    ]));

    let rows = (inner.height as usize).saturating_sub(2);
    let start = (picker.cursor + 1).saturating_sub(rows);
    let items: Vec<&str> = picker.visible().collect();
    if items.is_empty() {
        let text = if picker.allow_new && !picker.query.is_empty() {
            format!("Enter adds \"{}\"", picker.query)
        } else {
            "No matches".to_string()
        };
        lines.push(hint_line(theme, &text));
    }
    for (i, item) in items.iter().enumerate().skip(start).take(rows) {
        let selected = i == picker.cursor;
        let row_bg = if selected { theme.selection_bg } else { bg };
        let style = if selected {
            Style::default().fg(theme.text_bright).bg(row_bg)
        } else {
            Style::default().fg(theme.text).bg(row_bg)
        };
        let mut spans: Vec<Span<'static>> = Vec::new();
        if picker.multi {
            let mark = if picker.is_selected(item) { "[x] " } else { "[ ] " };
            spans.push(Span::styled(mark, style.fg(theme.purple)));
        }
        spans.push(Span::styled(item.to_string(), style));
        let mut spans = truncate_spans(spans, width);
        pad_spans(&mut spans, width, Style::default().bg(row_bg));
        lines.push(Line::from(spans));
    }

    let hint = if picker.multi {
        "Tab toggle  Enter apply  Esc cancel"
    } else {
        "Enter select  Esc cancel"
    };
    while lines.len() + 1 < inner.height as usize {
        lines.push(Line::default());
    }
    lines.push(hint_line(theme, hint));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn render_text_input(frame: &mut Frame, input: &TextInput, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let popup = centered_rect(INPUT_W, 5, area);
    let inner = popup_block(frame, theme, &input.prompt, popup);

    let cursor = input.cursor.min(input.buffer.len());
    let (before, after) = input.buffer.split_at(cursor);
    let text_style = Style::default().fg(theme.text_bright).bg(bg);
    let input_line = Line::from(vec![
        Span::styled(before.to_string(), text_style),
        Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(after.to_string(), text_style),
    ]);

    let status = match &input.error {
        Some(err) => Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(theme.error).bg(bg),
        )),
        None => Line::default(),
    };
    let lines = vec![input_line, status, hint_line(theme, "Enter accept  Esc cancel")];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn render_date_picker(frame: &mut Frame, picker: &DatePicker, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let grid = picker.month_grid();
    let popup = centered_rect(26, grid.len() as u16 + 6, area);
    let inner = popup_block(frame, theme, &picker.title, popup);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        picker.selected.format("%B %Y").to_string(),
        Style::default()
            .fg(theme.header)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(hint_line(theme, "Mo Tu We Th Fr Sa Su"));

    for week in &grid {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (col, day) in week.iter().enumerate() {
            if col > 0 {
                spans.push(Span::styled(" ", Style::default().bg(bg)));
            }
            let Some(date) = day else {
                spans.push(Span::styled("  ", Style::default().bg(bg)));
                continue;
            };
            let mut style = Style::default().fg(theme.text).bg(bg);
            if *date == picker.today {
                style = style.fg(theme.yellow).add_modifier(Modifier::UNDERLINED);
            }
            if *date == picker.selected {
                style = style
                    .fg(theme.text_bright)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("{:>2}", date.day()), style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(hint_line(theme, "Enter set  x clear  t today"));
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn render_editor(frame: &mut Frame, editor: &TaskEditor, theme: &Theme, area: Rect) {
    use crate::tui::components::EditorField;

    let bg = theme.background;
    let popup = centered_rect(EDITOR_W, EditorField::ALL.len() as u16 + 5, area);
    let title = format!("Edit: {}", editor.task().name);
    let title = unicode::truncate_to_width(&title, EDITOR_W.saturating_sub(6) as usize);
    let inner = popup_block(frame, theme, &title, popup);
    let width = inner.width as usize;
    let modified = editor.modified_fields();

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in EditorField::ALL.iter().enumerate() {
        let selected = i == editor.field_cursor;
        let row_bg = if selected { theme.selection_bg } else { bg };
        let marker = if modified.contains(field) { "*" } else { " " };
        let value = field.value(editor.task());
        let value_style = if value.is_empty() {
            Style::default().fg(theme.dim).bg(row_bg)
        } else if *field == EditorField::Priority {
            Style::default()
                .fg(theme.priority_color(editor.task().priority))
                .bg(row_bg)
        } else {
            Style::default().fg(theme.text_bright).bg(row_bg)
        };
        let mut spans: Vec<Span<'static>> = vec![
            Span::styled(marker, Style::default().fg(theme.highlight).bg(row_bg)),
            Span::styled(
                unicode::fit_to_width(field.label(), 10),
                Style::default().fg(theme.text).bg(row_bg),
            ),
            Span::styled(
                if value.is_empty() { "-".to_string() } else { value },
                value_style,
            ),
        ];
        spans = truncate_spans(spans, width);
        pad_spans(&mut spans, width, Style::default().bg(row_bg));
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    lines.push(hint_line(theme, "Enter edit  S save  Esc cancel"));
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);

    match editor.overlay() {
        None => {}
        Some(EditorOverlay::Date { picker, .. }) => render_date_picker(frame, picker, theme, area),
        Some(EditorOverlay::Picker { picker, .. }) => render_picker(frame, picker, theme, area),
        Some(EditorOverlay::Url(input)) => render_text_input(frame, input, theme, area),
    }
}
