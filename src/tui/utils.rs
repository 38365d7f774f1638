//! Layout helpers for the terminal user interface.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rectangle centred in `area`, sized as a percentage of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Screen position of a text cursor inside a bordered box, kept within the border.
pub fn cursor_in_box(area: Rect, cursor: usize) -> (u16, u16) {
    let inner_width = area.width.saturating_sub(2);
    let offset = u16::try_from(cursor)
        .unwrap_or(u16::MAX)
        .min(inner_width.saturating_sub(1));
    (area.x.saturating_add(1).saturating_add(offset), area.y.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(50, 50, area);
        assert_eq!(r.width, 50);
        assert_eq!(r.height, 20);
        assert_eq!(r.x, 25);
        assert_eq!(r.y, 10);
    }

    #[test]
    fn test_cursor_stays_inside_box() {
        let area = Rect::new(10, 5, 12, 3);
        assert_eq!(cursor_in_box(area, 0), (11, 6));
        assert_eq!(cursor_in_box(area, 4), (15, 6));
        // Inner width is 10, so the last usable column is x = 20.
        assert_eq!(cursor_in_box(area, 9), (20, 6));
        assert_eq!(cursor_in_box(area, 50), (20, 6));
        assert_eq!(cursor_in_box(area, usize::MAX), (20, 6));
    }
}
