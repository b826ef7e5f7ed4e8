pub mod colors;
pub mod utils;
pub mod header;
pub mod footer;
pub mod popups;
pub mod loading;
pub mod form;
pub mod movies;
pub mod watchlist;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::app::{App, CurrentScreen};

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let p = *colors::palette(app.theme);
    f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.text)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    header::render_header(f, app, &p, chunks[0]);

    match app.current_screen {
        CurrentScreen::Login => form::render_login(f, app, &p, chunks[1]),
        CurrentScreen::Movies => {
            render_movies_layout(f, app, &p, chunks[1]);
            if app.show_details_popup {
                popups::render_details_popup(f, app, &p, area);
            }
        }
        CurrentScreen::Details => popups::render_details_screen(f, app, &p, chunks[1]),
        CurrentScreen::Watchlist => watchlist::render_watchlist(f, app, &p, chunks[1]),
    }

    footer::render_status(f, app, &p, chunks[2]);
    footer::render_footer(f, app, &p, chunks[3]);
}

fn render_movies_layout(f: &mut Frame, app: &mut App, p: &colors::Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    header::render_toolbar(f, app, p, chunks[0]);
    movies::render_movies(f, app, p, chunks[1]);
}
