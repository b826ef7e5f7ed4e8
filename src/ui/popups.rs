use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use crate::app::{App, DetailsView};
use crate::ui::colors::{rating_color, Palette};
use crate::ui::loading::render_loading;
use crate::ui::utils::{centered_rect, format_rating, format_runtime};

/// Details as a full screen (navigate view mode)
pub fn render_details_screen(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" details ")
        .border_style(Style::default().fg(p.border));
    let inner = block.inner(area);
    f.render_widget(block, area);
    render_details_body(f, app, p, inner);
}

/// Details over the list (popup view mode)
pub fn render_details_popup(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" details ")
        .border_style(Style::default().fg(p.accent))
        .style(Style::default().bg(p.bg));
    let inner = block.inner(popup);
    f.render_widget(block, popup);
    render_details_body(f, app, p, inner);
}

fn render_details_body(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let Some(view) = &app.details else { return };
    match view {
        DetailsView { error: Some(err), .. } => {
            let msg = Paragraph::new(format!(" Could not load details: {}", err))
                .style(Style::default().fg(p.error_fg).bg(p.error_bg))
                .wrap(Wrap { trim: true });
            f.render_widget(msg, area);
        }
        DetailsView { details: Some(d), .. } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([Constraint::Length(7), Constraint::Min(1)])
                .split(area);

            let label = Style::default().fg(p.text_dim);
            let value = Style::default().fg(p.text);
            let genres = d.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ");
            let poster = app.client.image_url(d.poster_path.as_deref()).unwrap_or_else(|| "none".to_string());
            let on_list = if app.watchlist.contains(d.id) { "on your watchlist" } else { "not on your watchlist" };

            let facts = vec![
                Line::from(Span::styled(d.title.clone(), Style::default().fg(p.accent).add_modifier(Modifier::BOLD))),
                Line::from(vec![
                    Span::styled("released ", label),
                    Span::styled(if d.release_date.is_empty() { "unknown".to_string() } else { d.release_date.clone() }, value),
                    Span::styled("   runtime ", label),
                    Span::styled(format_runtime(d.runtime), value),
                    Span::styled("   rating ", label),
                    Span::styled(format_rating(d.vote_average), Style::default().fg(rating_color(p, d.vote_average))),
                ]),
                Line::from(vec![Span::styled("genres ", label), Span::styled(genres, value)]),
                Line::from(vec![Span::styled("poster ", label), Span::styled(poster, value)]),
                Line::from(vec![Span::styled("page   ", label), Span::styled(d.web_url(), value)]),
                Line::from(Span::styled(on_list, label)),
            ];
            f.render_widget(Paragraph::new(facts), chunks[0]);

            let overview = if d.overview.is_empty() { "No overview available." } else { d.overview.as_str() };
            f.render_widget(
                Paragraph::new(overview).style(value).wrap(Wrap { trim: true }),
                chunks[1],
            );
        }
        _ => render_loading(f, p, area, "Loading details", app.loading_tick),
    }
}
