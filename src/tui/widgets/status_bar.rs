// Status bar widget: link indicator, banner text, key hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::LinkStatus;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [link indicator] [banner, if any] [key hints]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (symbol, label, color) = link_indicator(state.link_status);
    spans.push(Span::styled(
        format!(" {symbol} {label}"),
        Style::default().fg(color),
    ));

    if let Some(banner) = &state.banner {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            banner.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        "  q:Quit r:Refresh c:Compact",
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    ));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the link symbol, label, and color for a status.
pub fn link_indicator(status: LinkStatus) -> (&'static str, &'static str, Color) {
    match status {
        LinkStatus::Live => ("●", "live", Color::Green),
        LinkStatus::Degraded => ("○", "degraded", Color::Yellow),
        LinkStatus::Unconfigured => ("✗", "no feed", Color::Red),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_indicator_is_green() {
        let (symbol, label, color) = link_indicator(LinkStatus::Live);
        assert_eq!(symbol, "●");
        assert_eq!(label, "live");
        assert_eq!(color, Color::Green);
    }

    #[test]
    fn degraded_indicator_is_yellow() {
        let (symbol, label, color) = link_indicator(LinkStatus::Degraded);
        assert_eq!(symbol, "○");
        assert_eq!(label, "degraded");
        assert_eq!(color, Color::Yellow);
    }

    #[test]
    fn unconfigured_indicator_is_red() {
        let (symbol, label, color) = link_indicator(LinkStatus::Unconfigured);
        assert_eq!(symbol, "✗");
        assert_eq!(label, "no feed");
        assert_eq!(color, Color::Red);
    }
}
