// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (scroll, compact
// toggle).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::app::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (Quit, Refresh). Returns `None` when the key press was
/// handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately (escape hatch).
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UserCommand::Quit),

        KeyCode::Char('r') => Some(UserCommand::Refresh),

        KeyCode::Char('c') => {
            view_state.compact = !view_state.compact;
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            view_state.scroll = view_state.scroll.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            view_state.scroll = view_state.scroll.saturating_sub(page_size());
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, page_size());
            None
        }
        KeyCode::Home => {
            view_state.scroll = 0;
            None
        }

        _ => None,
    }
}

/// Scroll down, clamped so the offset never runs past the last team row.
fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let max = view_state.scoreboard.teams.len().saturating_sub(1);
    view_state.scroll = view_state.scroll.saturating_add(lines).min(max);
}

/// Page size for PageUp/PageDown scrolling.
fn page_size() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
