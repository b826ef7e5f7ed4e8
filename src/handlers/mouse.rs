use crate::app::{App, AsyncAction, CurrentScreen};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, tx: &mpsc::Sender<AsyncAction>) {
    match (app.current_screen, mouse.kind) {
        (CurrentScreen::Movies, _) if app.show_details_popup => {}
        (CurrentScreen::Movies, MouseEventKind::ScrollDown) => app.select_next(tx),
        (CurrentScreen::Movies, MouseEventKind::ScrollUp) => app.select_previous(tx),
        (CurrentScreen::Movies, MouseEventKind::Down(MouseButton::Left)) => {
            let area = app.area_list;
            let (x, y) = (mouse.column, mouse.row);
            // Rows start below the top border
            if x >= area.x && x < area.x + area.width && y > area.y && y < area.y + area.height.saturating_sub(1) {
                let row = app.list_state.offset() + (y - area.y - 1) as usize;
                if row < app.items().len() {
                    if app.list_state.selected() == Some(row) {
                        app.open_selected(tx);
                    } else {
                        app.list_state.select(Some(row));
                    }
                }
            }
        }
        (CurrentScreen::Watchlist, MouseEventKind::ScrollDown) => app.watchlist_next(),
        (CurrentScreen::Watchlist, MouseEventKind::ScrollUp) => app.watchlist_previous(),
        _ => {}
    }
}
