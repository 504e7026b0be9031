//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Page pixels per terminal column.
pub const COL_PX: f64 = 10.0;
/// Page pixels per terminal row.
pub const ROW_PX: f64 = 20.0;

/// Primary screen layout: the scrolled page, a navigation bar and a bottom
/// status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub nav_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // page (takes all remaining space)
                Constraint::Length(1), // navigation progress bar
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            page_area: chunks[0],
            nav_area: chunks[1],
            status_area: chunks[2],
        }
    }
}
