// Pure snapshot reconciliation: wire records in, ranked view-model out.
// No I/O, no clock, fully deterministic so the same snapshot always yields
// the same board.

use crate::scoreboard::model::{
    ActiveMission, AggregateView, ProblemView, Scoreboard, TeamView,
};
use crate::wire::{Aggregate, ApiTeam, MissionState, Problem};

/// Build a complete `Scoreboard` from a raw snapshot.
///
/// - Problems that are closed and still unsolved are dropped; they can no
///   longer contribute points and count toward nothing.
/// - Teams left with no problems after filtering are dropped, as are teams
///   with a blank name (placeholder registrations).
/// - Ranking is by score descending with a stable sort, so equal scores
///   keep their snapshot order.
/// - The aggregate passes through as-is; absent in means absent out.
pub fn reconcile(raw_teams: Vec<ApiTeam>, raw_aggregate: Option<Aggregate>) -> Scoreboard {
    let mut teams: Vec<TeamView> = raw_teams
        .into_iter()
        .filter(|t| !t.name.trim().is_empty())
        .filter_map(build_team)
        .collect();

    teams.sort_by(|a, b| b.score.cmp(&a.score));
    for (i, team) in teams.iter_mut().enumerate() {
        team.rank = i + 1;
    }

    let aggregate = raw_aggregate.map(|a| AggregateView {
        total_teams: a.total_teams,
        active_quests: a.active_quests,
        global_effects: a
            .global_effects
            .into_iter()
            .map(|e| (e.effect_type, e.total_value))
            .collect(),
    });

    Scoreboard { teams, aggregate }
}

fn build_team(team: ApiTeam) -> Option<TeamView> {
    let remaining: Vec<Problem> = team
        .problems
        .into_iter()
        .filter(|p| p.solved || !p.is_closed)
        .collect();
    if remaining.is_empty() {
        return None;
    }

    let active_mission = remaining
        .iter()
        .flat_map(|p| p.missions.iter())
        .find(|m| m.state == MissionState::Open)
        .map(|m| ActiveMission {
            name: m.name.clone(),
            difficulty: m.difficulty,
            remaining_attempts: m.remaining_attempts,
        });

    let missions_left = remaining
        .iter()
        .flat_map(|p| p.missions.iter())
        .filter(|m| m.state != MissionState::Solved)
        .count();

    let problems = remaining
        .into_iter()
        .map(|p| ProblemView {
            name: p.name,
            solved: p.solved,
            score: p.score,
            badge: p.badge,
        })
        .collect();

    Some(TeamView {
        rank: 0,
        name: team.name,
        score: team.score,
        problems,
        active_mission,
        missions_left,
        applied_effects: team
            .applied_effects
            .into_iter()
            .map(|e| (e.effect_type, e.total_value))
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
