// Scoreboard view-model and the pure reconciler that derives it from wire
// snapshots.

pub mod model;
pub mod reconcile;

pub use model::{ActiveMission, AggregateView, ProblemView, Scoreboard, TeamView};
pub use reconcile::reconcile;
