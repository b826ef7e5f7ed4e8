use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem as ListRow, Paragraph},
    Frame,
};
use crate::api::ListItem;
use crate::app::App;
use crate::ui::colors::{rating_color, Palette};
use crate::ui::loading::{render_loading, spinner_line};
use crate::ui::utils::{format_rating, item_label, truncate};
use crate::watchlist::Watchlist;

fn row<'a>(p: &Palette, item: &ListItem, watchlist: &Watchlist, width: usize) -> ListRow<'a> {
    let marker = if watchlist.contains(item.id) { "+ " } else { "  " };
    let rating = format_rating(item.vote_average);
    let title_width = width.saturating_sub(marker.len() + rating.len() + 2);
    ListRow::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(p.accent)),
        Span::styled(
            format!("{:<w$}", truncate(&item_label(item), title_width), w = title_width),
            Style::default().fg(p.text),
        ),
        Span::styled(format!(" {}", rating), Style::default().fg(rating_color(p, item.vote_average))),
    ]))
}

pub fn render_movies(f: &mut Frame, app: &mut App, p: &Palette, area: Rect) {
    // Keep the viewport figures the scroll trigger works from in step with
    // what is on screen.
    app.area_list = area;
    app.visible_rows = area.height.saturating_sub(2) as usize;

    let Some(engine) = &app.engine else { return };
    let state = engine.state();

    let title = format!(
        " {} | {} loaded | page {}/{} ",
        if state.is_search() { "search results" } else { "discover" },
        state.items.len(),
        state.page,
        state.total_pages
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(p.border));

    if state.items.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        if engine.is_loading() {
            render_loading(f, p, inner, "Loading", app.loading_tick);
        } else if engine.error().is_none() {
            let empty = Paragraph::new("No movies found.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(p.text_dim));
            f.render_widget(empty, inner);
        }
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let rows: Vec<ListRow> = state.items.iter().map(|m| row(p, m, &app.watchlist, width)).collect();
    let mut block = block;
    if engine.is_loading() && !engine.is_resetting() {
        block = block.title_bottom(spinner_line(p, "Loading more", app.loading_tick));
    } else if !engine.can_load_more() && !engine.is_loading() {
        block = block.title_bottom(Line::from(Span::styled(" end of list ", Style::default().fg(p.text_dim))));
    }

    let list = List::new(rows)
        .block(block)
        .highlight_style(Style::default().bg(p.highlight_bg).fg(p.highlight_fg).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut app.list_state);
}
