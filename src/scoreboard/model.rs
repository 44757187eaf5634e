// Derived view-model types. These are what the UI renders; they are rebuilt
// wholesale by the reconciler on every snapshot and never partially mutated.

use crate::wire::Attempts;

/// The mission a team is currently working on: the first in-progress mission
/// across its remaining problems, in board order.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMission {
    pub name: String,
    pub difficulty: u32,
    pub remaining_attempts: Attempts,
}

/// A problem as shown on the board, after closed-and-unsolved filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemView {
    pub name: String,
    pub solved: bool,
    pub score: u32,
    pub badge: Option<String>,
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamView {
    /// 1-based position after sorting by score.
    pub rank: usize,
    pub name: String,
    pub score: u64,
    pub problems: Vec<ProblemView>,
    pub active_mission: Option<ActiveMission>,
    /// Missions not yet solved across the team's remaining problems.
    pub missions_left: usize,
    /// (effect type, accumulated value) pairs, at most one per type.
    pub applied_effects: Vec<(String, f64)>,
}

/// Event-wide aggregate panel data.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateView {
    pub total_teams: u32,
    pub active_quests: u32,
    pub global_effects: Vec<(String, f64)>,
}

/// The complete derived scoreboard. `aggregate: None` means the backend has
/// not sent aggregate data yet, which is distinct from an all-zero aggregate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scoreboard {
    pub teams: Vec<TeamView>,
    pub aggregate: Option<AggregateView>,
}

impl Scoreboard {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.aggregate.is_none()
    }
}
