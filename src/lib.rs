// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod app;
pub mod config;
pub mod countdown;
pub mod feed;
pub mod fetch;
pub mod scoreboard;
pub mod tui;
pub mod wire;
