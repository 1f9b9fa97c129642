use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Cut spans down to `width` cells, ending with `…` if anything was dropped
pub(super) fn truncate_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    if spans_width(&spans) <= width {
        return spans;
    }
    let mut out = Vec::new();
    let mut used = 0;
    for span in spans {
        let w = unicode::display_width(&span.content);
        if used + w < width {
            used += w;
            out.push(span);
            continue;
        }
        // Later spans are dropped, so the ellipsis is needed even when this one fits
        let clipped = format!("{}\u{2026}", span.content);
        let text = unicode::truncate_to_width(&clipped, width - used);
        out.push(Span::styled(text, span.style));
        break;
    }
    out
}

/// Pad a line of spans to `width` cells so the style fills the row
pub(super) fn pad_spans(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Centered popup of at most `width` x `height` inside `area`
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
