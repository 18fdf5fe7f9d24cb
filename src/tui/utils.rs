use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rectangle `percent_x` by `percent_y` of `r`, centered in it.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate_middle(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max || max < 5 {
        return text.to_string();
    }
    let keep = max - 3;
    let head: String = text.chars().take(keep / 2).collect();
    let tail: String = text.chars().skip(count - (keep - keep / 2)).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert!(popup.x >= 19 && popup.x <= 21);
        assert!(popup.y + popup.height <= area.height);
    }

    #[test]
    fn test_truncate_middle() {
        assert_eq!(truncate_middle("short.jpg", 20), "short.jpg");
        let cut = truncate_middle("a_very_long_file_name_here.jpg", 12);
        assert_eq!(cut.chars().count(), 12);
        assert!(cut.starts_with("a_ve"));
        assert!(cut.ends_with(".jpg"));
    }
}
