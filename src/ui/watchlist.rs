use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem as ListRow, Paragraph},
    Frame,
};
use crate::app::App;
use crate::ui::colors::{rating_color, Palette};
use crate::ui::loading::render_loading;
use crate::ui::utils::{format_rating, item_label};

pub fn render_watchlist(f: &mut Frame, app: &mut App, p: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" watchlist | {} saved ", app.watchlist.len()))
        .border_style(Style::default().fg(p.border));

    if app.watchlist_loading || app.watchlist_items.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        if app.watchlist_loading {
            render_loading(f, p, inner, "Loading watchlist", app.loading_tick);
        } else {
            let empty = Paragraph::new("Your watchlist is empty.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(p.text_dim));
            f.render_widget(empty, inner);
        }
        return;
    }

    let rows: Vec<ListRow> = app
        .watchlist_items
        .iter()
        .map(|m| {
            ListRow::new(Line::from(vec![
                Span::styled(item_label(m), Style::default().fg(p.text)),
                Span::styled(format!("  {}", format_rating(m.vote_average)), Style::default().fg(rating_color(p, m.vote_average))),
            ]))
        })
        .collect();

    let list = List::new(rows)
        .block(block)
        .highlight_style(Style::default().bg(p.highlight_bg).fg(p.highlight_fg).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut app.watchlist_state);
}
