// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the leaderboard dashboard:
//
// +--------------------------------------------------+
// | Header (3 rows): event name, countdown            |
// +-------------------------+------------------------+
// | Leaderboard (65%)        | Effects (35%)          |
// |                          |                        |
// +-------------------------+------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
//
// In compact mode the effects panel is dropped and the leaderboard takes the
// full width.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct DashboardLayout {
    /// Top rows: event name and deadline countdown.
    pub header: Rect,
    /// Main table of ranked teams.
    pub leaderboard: Rect,
    /// Aggregate effects panel; absent in compact mode.
    pub effects: Option<Rect>,
    /// Bottom row: link indicator, banner, key hints.
    pub status_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect, compact: bool) -> DashboardLayout {
    // Vertical: header(3) | middle(fill) | status(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = vertical[0];
    let middle = vertical[1];
    let status_bar = vertical[2];

    if compact {
        return DashboardLayout {
            header,
            leaderboard: middle,
            effects: None,
            status_bar,
        };
    }

    // Horizontal: leaderboard (65%) | effects (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    DashboardLayout {
        header,
        leaderboard: horizontal[0],
        effects: Some(horizontal[1]),
        status_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A reasonable terminal size for testing.
    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area(), false);
        let rects = [
            ("header", layout.header),
            ("leaderboard", layout.leaderboard),
            ("effects", layout.effects.unwrap()),
            ("status_bar", layout.status_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_header_height_is_three() {
        let layout = build_layout(test_area(), false);
        assert_eq!(layout.header.height, 3);
    }

    #[test]
    fn layout_status_bar_height_is_one() {
        let layout = build_layout(test_area(), false);
        assert_eq!(layout.status_bar.height, 1);
    }

    #[test]
    fn layout_leaderboard_wider_than_effects() {
        let layout = build_layout(test_area(), false);
        assert!(layout.leaderboard.width > layout.effects.unwrap().width);
    }

    #[test]
    fn compact_layout_drops_effects_panel() {
        let area = test_area();
        let layout = build_layout(area, true);
        assert!(layout.effects.is_none());
        assert_eq!(layout.leaderboard.width, area.width);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area, false);
        let mut all_rects = vec![layout.header, layout.leaderboard, layout.status_bar];
        all_rects.extend(layout.effects);
        for rect in &all_rects {
            assert!(rect.x + rect.width <= area.width);
            assert!(rect.y + rect.height <= area.height);
        }
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let area = Rect::new(0, 0, 40, 12);
        let layout = build_layout(area, false);
        let mut rects = vec![layout.header, layout.leaderboard, layout.status_bar];
        rects.extend(layout.effects);
        for rect in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "Small terminal: rect {:?} has zero area",
                rect
            );
        }
    }
}
