// TUI widget modules for each dashboard panel.

pub mod effects;
pub mod header;
pub mod leaderboard;
pub mod status_bar;
