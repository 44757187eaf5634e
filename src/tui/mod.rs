// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the orchestrator's state. The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders on a fixed tick, so the screen
// always shows the last applied scoreboard even while the backend is down.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::app::{LinkStatus, UiUpdate, UserCommand};
use crate::scoreboard::Scoreboard;

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    /// Last applied scoreboard. Rendering never clears this.
    pub scoreboard: Scoreboard,
    pub link_status: LinkStatus,
    pub banner: Option<String>,
    /// Compact mode hides the effects panel, giving the full width to the
    /// leaderboard.
    pub compact: bool,
    pub event_name: String,
    pub deadline: NaiveDateTime,
    /// Leaderboard scroll offset in rows.
    pub scroll: usize,
}

impl ViewState {
    pub fn new(event_name: String, deadline: NaiveDateTime) -> Self {
        ViewState {
            scoreboard: Scoreboard::default(),
            link_status: LinkStatus::Degraded,
            banner: None,
            compact: false,
            event_name,
            deadline,
            scroll: 0,
        }
    }
}

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Scoreboard(board) => {
            state.scoreboard = *board;
            // Keep the scroll position inside the new team list.
            state.scroll = state
                .scroll
                .min(state.scoreboard.teams.len().saturating_sub(1));
        }
        UiUpdate::LinkStatus(status) => {
            state.link_status = status;
        }
        UiUpdate::Banner(banner) => {
            state.banner = banner;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.compact);

    widgets::header::render(frame, layout.header, state, Local::now().naive_local());
    widgets::leaderboard::render(frame, layout.leaderboard, state);
    if let Some(effects_area) = layout.effects {
        widgets::effects::render(frame, effects_area, state);
    }
    widgets::status_bar::render(frame, layout.status_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    event_name: String,
    deadline: NaiveDateTime,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(event_name, deadline);
    let mut event_stream = EventStream::new();

    // 4 fps is plenty: the countdown only changes once a second.
    let mut render_tick = tokio::time::interval(Duration::from_millis(250));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down.
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            let quit = command == UserCommand::Quit;
                            let _ = cmd_tx.send(command).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events need no handling; the next
                        // render tick picks up the new size.
                    }
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
