// Event deadline countdown. Pure time math over chrono; the TUI header
// calls these once per render tick.

use chrono::{Duration, NaiveDateTime};

/// Time remaining until `deadline`, clamped to zero once the deadline has
/// passed.
pub fn time_left(now: NaiveDateTime, deadline: NaiveDateTime) -> Duration {
    let remaining = deadline - now;
    if remaining < Duration::zero() {
        Duration::zero()
    } else {
        remaining
    }
}

/// Render a countdown as `HH:MM:SS`. Hours widen past two digits for very
/// distant deadlines rather than wrapping.
pub fn format_time_left(remaining: Duration) -> String {
    let total_secs = remaining.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
