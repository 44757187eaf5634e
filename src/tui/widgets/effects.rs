// Effects widget: event-wide aggregate totals.
//
// Shows the team/quest counters plus one line per accumulated global effect.
// An absent aggregate is rendered as "awaiting aggregate data", which is
// deliberately different from an aggregate of zeros.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::scoreboard::AggregateView;
use crate::tui::ViewState;

/// Render the aggregate effects panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = build_effect_lines(state.scoreboard.aggregate.as_ref());
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Event totals "));
    frame.render_widget(paragraph, area);
}

/// Build the panel lines from the optional aggregate.
pub fn build_effect_lines(aggregate: Option<&AggregateView>) -> Vec<Line<'static>> {
    let Some(aggregate) = aggregate else {
        return vec![Line::from(Span::styled(
            " awaiting aggregate data",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Teams:  ", Style::default().fg(Color::Gray)),
            Span::styled(
                aggregate.total_teams.to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Quests: ", Style::default().fg(Color::Gray)),
            Span::styled(
                aggregate.active_quests.to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];

    if aggregate.global_effects.is_empty() {
        lines.push(Line::from(Span::styled(
            " no effects yet",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (effect_type, total) in &aggregate.global_effects {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {effect_type}: "),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(format!("{total:+.1}"), Style::default().fg(Color::Cyan)),
            ]));
        }
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
