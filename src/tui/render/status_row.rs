use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::filter::FileViewMode;
use crate::tui::app::App;
use crate::tui::mode::InputMode;

use super::helpers::{pad_spans, spans_width, truncate_spans};

/// Key hints for the modes that wait on a single key
fn mode_hint(mode: InputMode) -> Option<&'static str> {
    match mode {
        InputMode::FilterSelect => {
            Some("p project  c context  f file  r priority  s status  x clear")
        }
        InputMode::SortSelect => Some("d due  p project  r priority  c context  n none"),
        InputMode::GroupSelect => {
            Some("d due  p project  r priority  c context  f file  n none")
        }
        InputMode::SortDirection | InputMode::GroupDirection => {
            Some("a ascending  d descending")
        }
        _ => None,
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let manager = &app.manager;
    let mode = manager.mode.mode;

    let mut spans: Vec<Span<'static>> = Vec::new();

    if mode == InputMode::Search {
        // Search prompt: /query▌
        spans.push(Span::styled(
            format!("/{}", manager.filter.search),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
        push_right(&mut spans, "Enter keep  Esc clear", width, app);
    } else {
        spans.push(Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        ));

        let mut state: Vec<String> = Vec::new();
        if !manager.filter.is_empty() {
            state.push(format!("filter:{}", manager.filter.summary()));
        }
        if manager.sort.is_active() {
            let dir = if manager.sort.ascending { "\u{2191}" } else { "\u{2193}" };
            state.push(format!("sort:{}{}", manager.sort.field.label(), dir));
        }
        if let Some(field) = manager.group.field {
            let dir = if manager.group.ascending { "\u{2191}" } else { "\u{2193}" };
            state.push(format!("group:{}{}", field.label(), dir));
        }
        if manager.file_view != FileViewMode::All {
            state.push(format!("view:{}", manager.file_view.label()));
        }
        spans.push(Span::styled(
            format!(" {}", state.join(" ")),
            Style::default().fg(app.theme.dim).bg(bg),
        ));

        if let Some(notice) = &app.notice {
            push_right(&mut spans, notice, width, app);
        } else if let Some(hint) = mode_hint(mode) {
            push_right(&mut spans, hint, width, app);
        } else {
            let count = format!("{}/{}", manager.view().len(), manager.tasks().len());
            push_right(&mut spans, &count, width, app);
        }
    }

    let mut spans = truncate_spans(spans, width);
    pad_spans(&mut spans, width, Style::default().bg(bg));
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Right-align `text` if it fits after the existing spans
fn push_right(spans: &mut Vec<Span<'static>>, text: &str, width: usize, app: &App) {
    let bg = app.theme.background;
    let content_width = spans_width(spans);
    let text_width = crate::util::unicode::display_width(text) + 1;
    if content_width + text_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - text_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            format!("{} ", text),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }
}
