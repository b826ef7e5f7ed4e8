use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::app::{App, CurrentScreen, InputMode};
use crate::ui::colors::Palette;

pub fn render_header(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(area);

    let section = match app.current_screen {
        CurrentScreen::Login => "sign in",
        CurrentScreen::Movies => "movies",
        CurrentScreen::Details => "details",
        CurrentScreen::Watchlist => "watchlist",
    };

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" movie-browser", Style::default().fg(p.accent).add_modifier(Modifier::BOLD)),
        Span::styled(" / ", Style::default().fg(p.text_dim)),
        Span::styled(section, Style::default().fg(p.text)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(p.border)));
    f.render_widget(title, chunks[0]);

    let mut right = Vec::new();
    if let Some(session) = app.auth.session() {
        let left = session.remaining_at(chrono::Utc::now());
        right.push(Span::styled(
            format!("{} | {}:{:02} left ", session.user, left.num_minutes(), left.num_seconds() % 60),
            Style::default().fg(p.text_dim),
        ));
    }
    right.push(Span::styled(
        format!("theme: {} ", app.config.theme.display_name().to_lowercase()),
        Style::default().fg(p.text_dim),
    ));
    let stats = Paragraph::new(Line::from(right))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(p.border)));
    f.render_widget(stats, chunks[1]);
}

/// Search box plus the current filter values
pub fn render_toolbar(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let Some(engine) = &app.engine else { return };
    let state = engine.state();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let editing = app.input_mode == InputMode::Editing;
    let mut value = app.search_input.value().to_string();
    if editing && (app.loading_tick / 5) % 2 == 0 {
        value.push('▏');
    }
    let placeholder = value.is_empty() && !editing;
    let search = Paragraph::new(if placeholder { "press / to search".to_string() } else { value })
        .style(Style::default().fg(if placeholder { p.text_dim } else { p.text }))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" search ")
                .border_style(Style::default().fg(if editing { p.accent } else { p.border })),
        );
    f.render_widget(search, chunks[0]);

    let key = Style::default().fg(p.accent).add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(p.text);
    let label = Style::default().fg(p.text_dim);
    let mut spans = vec![
        Span::styled("s", key),
        Span::styled(" sort ", label),
        Span::styled(state.sort_by.display_name(), value_style),
        Span::styled("  l", key),
        Span::styled(" lang ", label),
        Span::styled(state.language.display_name(), value_style),
        Span::styled("  v", key),
        Span::styled(" view ", label),
        Span::styled(state.view_mode.as_str(), value_style),
    ];
    if engine.is_resetting() {
        spans.push(Span::styled("  Loading...", Style::default().fg(p.accent)));
    }
    let filters = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" filters ").border_style(Style::default().fg(p.border)));
    f.render_widget(filters, chunks[1]);
}
