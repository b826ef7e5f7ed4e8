use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use crate::app::{App, CurrentScreen, InputMode};
use crate::ui::colors::Palette;

fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    match app.current_screen {
        CurrentScreen::Login => &[("tab", "switch field"), ("enter", "sign in"), ("esc", "quit")],
        CurrentScreen::Movies if app.input_mode == InputMode::Editing => {
            &[("enter", "search"), ("esc", "cancel")]
        }
        CurrentScreen::Movies if app.show_details_popup => {
            &[("esc", "close"), ("o", "open in browser"), ("a", "watchlist")]
        }
        CurrentScreen::Movies => &[
            ("↑↓", "move"),
            ("enter", "details"),
            ("/", "search"),
            ("r", "reset"),
            ("a", "watchlist +/-"),
            ("w", "watchlist"),
            ("y", "copy link"),
            ("t", "theme"),
            ("L", "logout"),
            ("q", "quit"),
        ],
        CurrentScreen::Details => &[
            ("esc", "back"),
            ("o", "open in browser"),
            ("a", "watchlist +/-"),
            ("y", "copy link"),
            ("q", "quit"),
        ],
        CurrentScreen::Watchlist => &[
            ("esc", "back"),
            ("enter", "details"),
            ("d", "remove"),
            ("x", "export"),
            ("q", "quit"),
        ],
    }
}

pub fn render_footer(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let key_style = Style::default().fg(p.accent).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(p.text_dim);

    let mut spans = Vec::new();
    for (key, label) in hints(app) {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!("{} ", label), label_style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Left), area);
}

/// One-line status: the list error if any, otherwise the last message
pub fn render_status(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let error = app.engine.as_ref().and_then(|e| e.error());
    let line = match (error, &app.status_message) {
        (Some(err), _) => Paragraph::new(format!(" {}", err))
            .style(Style::default().fg(p.error_fg).bg(p.error_bg).add_modifier(Modifier::BOLD)),
        (None, Some(msg)) => Paragraph::new(format!(" {}", msg)).style(Style::default().fg(p.text_dim)),
        (None, None) => return,
    };
    f.render_widget(line, area);
}
