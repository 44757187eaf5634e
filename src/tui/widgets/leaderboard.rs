// Leaderboard widget: scrollable table of ranked teams.
//
// Columns: Rank, Team, Score, Missions left, Active mission.
// The top three ranks are color-highlighted.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::scoreboard::TeamView;
use crate::tui::ViewState;

/// Render the leaderboard table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Leaderboard ({} teams) ", state.scoreboard.teams.len()));

    if state.scoreboard.teams.is_empty() {
        let placeholder = Paragraph::new("waiting for scoreboard data...").block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Team"),
        Cell::from("Score"),
        Cell::from("Left"),
        Cell::from("Active mission"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .scoreboard
        .teams
        .iter()
        .skip(state.scroll)
        .map(|team| {
            Row::new(vec![
                Cell::from(team.rank.to_string()),
                Cell::from(team.name.clone()),
                Cell::from(team.score.to_string()),
                Cell::from(team.missions_left.to_string()),
                Cell::from(active_mission_text(team)),
            ])
            .style(rank_style(team.rank))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

/// Describe a team's active mission, including its difficulty and attempts
/// budget, or a dash when the team has nothing in progress.
pub fn active_mission_text(team: &TeamView) -> String {
    match &team.active_mission {
        Some(m) => format!(
            "{} (d{}, {} attempts)",
            m.name, m.difficulty, m.remaining_attempts
        ),
        None => "-".to_string(),
    }
}

/// Podium ranks get distinct colors; everything below renders plain.
pub fn rank_style(rank: usize) -> Style {
    match rank {
        1 => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        2 => Style::default().fg(Color::White),
        3 => Style::default().fg(Color::LightRed),
        _ => Style::default().fg(Color::Gray),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::ActiveMission;
    use crate::wire::Attempts;

    fn team(rank: usize, active: Option<ActiveMission>) -> TeamView {
        TeamView {
            rank,
            name: "Nautilus".to_string(),
            score: 40,
            problems: vec![],
            active_mission: active,
            missions_left: 2,
            applied_effects: vec![],
        }
    }

    #[test]
    fn active_mission_includes_difficulty_and_attempts() {
        let t = team(
            1,
            Some(ActiveMission {
                name: "filter-cleanup".to_string(),
                difficulty: 3,
                remaining_attempts: Attempts::Limited(2),
            }),
        );
        assert_eq!(active_mission_text(&t), "filter-cleanup (d3, 2 attempts)");
    }

    #[test]
    fn unlimited_attempts_spelled_out() {
        let t = team(
            1,
            Some(ActiveMission {
                name: "reef-scan".to_string(),
                difficulty: 1,
                remaining_attempts: Attempts::Unlimited,
            }),
        );
        assert_eq!(active_mission_text(&t), "reef-scan (d1, unlimited attempts)");
    }

    #[test]
    fn no_active_mission_renders_dash() {
        assert_eq!(active_mission_text(&team(4, None)), "-");
    }

    #[test]
    fn podium_ranks_are_highlighted() {
        assert!(rank_style(1).add_modifier.contains(Modifier::BOLD));
        assert_eq!(rank_style(2).fg, Some(Color::White));
        assert_eq!(rank_style(3).fg, Some(Color::LightRed));
        assert_eq!(rank_style(7).fg, Some(Color::Gray));
    }
}
