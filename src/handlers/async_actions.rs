use crate::app::{App, AsyncAction};
use tokio::sync::mpsc;
use tracing::warn;

pub fn handle_async_action(app: &mut App, action: AsyncAction, tx: &mpsc::Sender<AsyncAction>) {
    match action {
        AsyncAction::PageLoaded(req, result) => app.on_page_loaded(req, result, tx),
        AsyncAction::DetailsLoaded(id, result) => app.on_details_loaded(id, result),
        AsyncAction::WatchlistLoaded(items) => app.on_watchlist_loaded(items),
        AsyncAction::List(event) => app.on_list_event(event),
        AsyncAction::Error(message) => {
            warn!(%message, "background task failed");
            app.status_message = Some(message);
        }
    }
}
