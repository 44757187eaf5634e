// Header widget: event name and deadline countdown.

use chrono::NaiveDateTime;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::countdown;
use crate::tui::ViewState;

/// Render the header into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, now: NaiveDateTime) {
    let paragraph = Paragraph::new(header_line(state, now))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Build the single header line: event name on the left, countdown after it.
pub fn header_line(state: &ViewState, now: NaiveDateTime) -> Line<'static> {
    let remaining = countdown::time_left(now, state.deadline);
    let over = remaining.is_zero();
    let countdown_text = if over {
        "time's up".to_string()
    } else {
        format!("ends in {}", countdown::format_time_left(remaining))
    };
    let countdown_color = if over { Color::Red } else { Color::Yellow };

    Line::from(vec![
        Span::styled(
            format!(" {} ", state.event_name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::Gray)),
        Span::styled(countdown_text, Style::default().fg(countdown_color)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn state_with_deadline(deadline: &str) -> ViewState {
        ViewState::new("Hack the Future".to_string(), ts(deadline))
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn header_shows_event_name_and_countdown() {
        let state = state_with_deadline("2025-11-12T16:00:00");
        let line = header_line(&state, ts("2025-11-12T14:30:00"));
        let text = line_text(&line);
        assert!(text.contains("Hack the Future"));
        assert!(text.contains("ends in 01:30:00"));
    }

    #[test]
    fn header_after_deadline_shows_times_up() {
        let state = state_with_deadline("2025-11-12T16:00:00");
        let line = header_line(&state, ts("2025-11-12T17:00:00"));
        assert!(line_text(&line).contains("time's up"));
    }
}
