use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use crate::ui::colors::Palette;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_line<'a>(p: &Palette, message: &'a str, tick: u64) -> Line<'a> {
    let spinner = SPINNER[(tick % SPINNER.len() as u64) as usize];
    let dots = ".".repeat(((tick / 8) % 4) as usize);
    Line::from(vec![
        Span::styled(format!(" {} ", spinner), Style::default().fg(p.accent)),
        Span::styled(message, Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
        Span::styled(dots, Style::default().fg(p.text_dim)),
    ])
}

/// Centered spinner inside `area`
pub fn render_loading(f: &mut Frame, p: &Palette, area: Rect, message: &str, tick: u64) {
    let y = area.y + area.height / 2;
    let row = Rect { x: area.x, y, width: area.width, height: 1.min(area.height) };
    f.render_widget(Paragraph::new(spinner_line(p, message, tick)).alignment(Alignment::Center), row);
}
