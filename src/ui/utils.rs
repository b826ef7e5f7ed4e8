use crate::api::ListItem;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

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

/// "7.3", or "-" when unrated
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) if r.is_finite() => format!("{:.1}", r),
        _ => "-".to_string(),
    }
}

pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{}h {:02}m", m / 60, m % 60),
        _ => "unknown".to_string(),
    }
}

/// Row label: title plus year when known
pub fn item_label(item: &ListItem) -> String {
    match item.year() {
        Some(year) => format!("{} ({})", item.display_title(), year),
        None => item.display_title().to_string(),
    }
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(7.26)), "7.3");
        assert_eq!(format_rating(Some(8.0)), "8.0");
        assert_eq!(format_rating(None), "-");
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(Some(136)), "2h 16m");
        assert_eq!(format_runtime(Some(0)), "unknown");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Amélie", 10), "Amélie");
        assert_eq!(truncate("The Lord of the Rings", 8), "The Lor…");
    }
}
