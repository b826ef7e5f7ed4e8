use crate::app::{App, AsyncAction, CurrentScreen, InputMode, LoginField};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tui_input::backend::crossterm::EventHandler;

#[derive(Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

pub fn handle_key_event(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AsyncAction>) -> InputResult {
    // Only process key press events, not release (Windows sends both)
    if key.kind != KeyEventKind::Press {
        return InputResult::Continue;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    match app.current_screen {
        CurrentScreen::Login => handle_login(app, key, tx),
        CurrentScreen::Movies if app.show_details_popup => handle_details(app, key, tx),
        CurrentScreen::Movies => handle_movies(app, key, tx),
        CurrentScreen::Details => handle_details(app, key, tx),
        CurrentScreen::Watchlist => handle_watchlist(app, key, tx),
    }
}

fn handle_login(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AsyncAction>) -> InputResult {
    match key.code {
        KeyCode::Esc => return InputResult::Quit,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.toggle_login_field(),
        KeyCode::Enter => match app.login_field {
            LoginField::Username => app.login_field = LoginField::Password,
            LoginField::Password => app.submit_login(tx),
        },
        _ => {
            let input = match app.login_field {
                LoginField::Username => &mut app.input_username,
                LoginField::Password => &mut app.input_password,
            };
            input.handle_event(&Event::Key(key));
            app.login_error = None;
        }
    }
    InputResult::Continue
}

fn handle_movies(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AsyncAction>) -> InputResult {
    if app.input_mode == InputMode::Editing {
        match key.code {
            KeyCode::Enter => app.submit_search(tx),
            KeyCode::Esc => {
                app.input_mode = InputMode::Normal;
                let current = app.engine.as_ref().map(|e| e.state().query.clone()).unwrap_or_default();
                app.search_input = tui_input::Input::new(current);
            }
            _ => {
                app.search_input.handle_event(&Event::Key(key));
            }
        }
        return InputResult::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return InputResult::Quit,
        KeyCode::Char('/') => app.input_mode = InputMode::Editing,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(tx),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(tx),
        KeyCode::PageDown => app.page_down(tx),
        KeyCode::PageUp => app.page_up(tx),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Enter => app.open_selected(tx),
        KeyCode::Char('s') => app.cycle_sort(tx),
        KeyCode::Char('l') => app.cycle_language(tx),
        KeyCode::Char('v') => app.toggle_view_mode(tx),
        KeyCode::Char('r') => app.reset_filters(tx),
        KeyCode::Char('a') => app.toggle_watchlist_focused(),
        KeyCode::Char('w') => app.show_watchlist(tx),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('y') => app.copy_location(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
    InputResult::Continue
}

fn handle_details(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AsyncAction>) -> InputResult {
    match key.code {
        KeyCode::Char('q') if !app.show_details_popup => return InputResult::Quit,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('q') => app.close_details(tx),
        KeyCode::Char('o') => app.open_details_in_browser(),
        KeyCode::Char('a') => app.toggle_watchlist_focused(),
        KeyCode::Char('y') => app.copy_location(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
    InputResult::Continue
}

fn handle_watchlist(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AsyncAction>) -> InputResult {
    match key.code {
        KeyCode::Char('q') => return InputResult::Quit,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.close_watchlist(tx),
        KeyCode::Down | KeyCode::Char('j') => app.watchlist_next(),
        KeyCode::Up | KeyCode::Char('k') => app.watchlist_previous(),
        KeyCode::Enter => app.open_watchlist_selected(tx),
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_from_watchlist(),
        KeyCode::Char('x') => app.export_watchlist(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
    InputResult::Continue
}
