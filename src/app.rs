use crate::api::{CatalogClient, CatalogPage, ListItem, MovieDetails};
use crate::auth::{AuthError, Authenticator};
use crate::cache::SessionCache;
use crate::config::AppConfig;
use crate::engine::{FilterChange, InitOutcome, ListEngine, ListEvent, PageRequest};
use crate::errors::CatalogError;
use crate::filters::{Language, SortBy, ViewMode};
use crate::scroll::{ScrollTrigger, Viewport, ROW_UNITS};
use crate::theme::Theme;
use crate::url_sync::{Location, MemoryRouter, Router, MOVIES_PATH};
use crate::watchlist::Watchlist;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_input::Input;
use zeroize::Zeroize;

pub const WATCHLIST_PATH: &str = "/watchlist";

#[derive(Debug, Clone)]
pub enum AsyncAction {
    PageLoaded(PageRequest, Result<CatalogPage, CatalogError>),
    DetailsLoaded(u64, Result<MovieDetails, CatalogError>),
    WatchlistLoaded(Vec<ListItem>),
    List(ListEvent),
    Error(String),
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum CurrentScreen {
    Login,
    Movies,
    Details,
    Watchlist,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct DetailsView {
    pub id: u64,
    pub details: Option<MovieDetails>,
    pub error: Option<String>,
}

impl DetailsView {
    pub fn loading(&self) -> bool {
        self.details.is_none() && self.error.is_none()
    }
}

pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub current_screen: CurrentScreen,
    pub input_mode: InputMode,
    pub should_quit: bool,

    pub client: Arc<dyn CatalogClient>,
    pub router: MemoryRouter,
    pub cache: SessionCache,
    pub engine: Option<ListEngine>,
    pub trigger: ScrollTrigger,
    pub auth: Authenticator,
    pub watchlist: Watchlist,

    // Login
    pub login_field: LoginField,
    pub input_username: Input,
    pub input_password: Input,
    pub login_error: Option<String>,

    // Movies
    pub search_input: Input,
    pub list_state: ListState,
    pub visible_rows: usize,
    pub area_list: Rect,

    // Details (screen or popup)
    pub details: Option<DetailsView>,
    pub show_details_popup: bool,

    // Watchlist
    pub watchlist_items: Vec<ListItem>,
    pub watchlist_loading: bool,
    pub watchlist_state: ListState,

    pub status_message: Option<String>,
    pub loading_tick: u64,
}

impl App {
    pub fn new(
        config: AppConfig,
        client: Arc<dyn CatalogClient>,
        auth: Authenticator,
        watchlist: Watchlist,
        start: Location,
    ) -> App {
        let theme = config.theme.resolve();
        App {
            config,
            theme,
            current_screen: CurrentScreen::Login,
            input_mode: InputMode::Normal,
            should_quit: false,
            client,
            router: MemoryRouter::new(start),
            cache: SessionCache::new(),
            engine: None,
            trigger: ScrollTrigger::default(),
            auth,
            watchlist,
            login_field: LoginField::Username,
            input_username: Input::default(),
            input_password: Input::default(),
            login_error: None,
            search_input: Input::default(),
            list_state: ListState::default(),
            visible_rows: 20,
            area_list: Rect::default(),
            details: None,
            show_details_popup: false,
            watchlist_items: Vec::new(),
            watchlist_loading: false,
            watchlist_state: ListState::default(),
            status_message: None,
            loading_tick: 0,
        }
    }

    /// Shows the login screen, or skips it when a session is still valid.
    pub fn start(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        if self.auth.check().is_ok() {
            self.enter_authenticated(tx);
        } else {
            self.show_login(None);
        }
    }

    pub fn items(&self) -> &[ListItem] {
        self.engine.as_ref().map(|e| e.state().items.as_slice()).unwrap_or(&[])
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.list_state.selected().and_then(|i| self.items().get(i))
    }

    pub fn location(&self) -> String {
        self.router.location().to_string()
    }

    // --- Login ---

    pub fn show_login(&mut self, error: Option<String>) {
        // Arriving at the login screen always ends the session
        self.leave_movies();
        self.auth.logout();
        self.current_screen = CurrentScreen::Login;
        self.login_field = LoginField::Username;
        self.input_mode = InputMode::Normal;
        self.login_error = error;
        self.details = None;
        self.show_details_popup = false;
    }

    pub fn toggle_login_field(&mut self) {
        self.login_field = match self.login_field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn submit_login(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let username = self.input_username.value().trim().to_string();
        let mut password = self.input_password.value().to_string();
        let result = self.auth.login(&username, &password).map(|s| s.user.clone());
        password.zeroize();
        self.input_password.reset();

        match result {
            Ok(user) => {
                self.login_error = None;
                self.status_message = Some(format!("Signed in as {}", user));
                self.enter_authenticated(tx);
            }
            Err(e) => {
                self.login_error = Some(e.to_string());
                self.login_field = LoginField::Password;
            }
        }
    }

    pub fn logout(&mut self) {
        info!("logout requested");
        self.show_login(None);
    }

    /// Bounces to the login screen once the session has lapsed.
    pub fn ensure_session(&mut self) {
        if self.current_screen == CurrentScreen::Login {
            return;
        }
        let expired = matches!(self.auth.check(), Err(AuthError::Expired));
        if expired {
            warn!("session expired");
            self.show_login(Some("Session expired, please sign in again".to_string()));
        }
    }

    fn enter_authenticated(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        match self.router.location().movie_id() {
            Some(id) => {
                self.current_screen = CurrentScreen::Details;
                self.request_details(id, tx);
            }
            None if self.router.location().path == WATCHLIST_PATH => self.show_watchlist(tx),
            None => self.enter_movies(tx),
        }
    }

    // --- Movies list lifecycle ---

    pub fn enter_movies(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        if self.router.location().path != MOVIES_PATH {
            self.router.push_path(MOVIES_PATH);
        }
        self.current_screen = CurrentScreen::Movies;
        self.input_mode = InputMode::Normal;

        let mut engine = ListEngine::new();
        let events = tx.clone();
        engine.subscribe(move |ev| {
            if let Err(e) = events.try_send(AsyncAction::List(ev.clone())) {
                warn!(error = %e, "list event dropped");
            }
        });
        let outcome = engine.initialize(&mut self.router, &self.cache);
        self.search_input = Input::new(engine.state().query.clone());
        self.engine = Some(engine);
        self.trigger.attach();

        match outcome {
            InitOutcome::Fetch(req) => {
                self.list_state = ListState::default();
                self.spawn_page(req, tx);
            }
            InitOutcome::Restored => {
                self.restore_scroll();
                self.check_fill(tx);
            }
        }
    }

    /// Flushes the list into the session cache and drops the engine.
    pub fn leave_movies(&mut self) {
        self.trigger.detach();
        if let Some(mut engine) = self.engine.take() {
            engine.set_scroll_top(self.scroll_top());
            engine.teardown(&mut self.cache);
        }
    }

    fn scroll_top(&self) -> u32 {
        (self.list_state.offset() as u32).saturating_mul(ROW_UNITS)
    }

    fn restore_scroll(&mut self) {
        let Some(engine) = &self.engine else { return };
        let len = engine.state().items.len();
        let offset = (engine.state().scroll_top / ROW_UNITS) as usize;
        let offset = offset.min(len.saturating_sub(1));
        self.list_state = ListState::default();
        *self.list_state.offset_mut() = offset;
        if len > 0 {
            self.list_state.select(Some(offset));
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_rows(self.list_state.offset(), self.visible_rows, self.items().len())
    }

    pub fn spawn_page(&self, req: PageRequest, tx: &mpsc::Sender<AsyncAction>) {
        let client = Arc::clone(&self.client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = req.execute(client.as_ref()).await;
            let _ = tx.send(AsyncAction::PageLoaded(req, result)).await;
        });
    }

    pub fn on_page_loaded(
        &mut self,
        req: PageRequest,
        result: Result<CatalogPage, CatalogError>,
        tx: &mpsc::Sender<AsyncAction>,
    ) {
        let Some(engine) = self.engine.as_mut() else {
            // List view is gone; nothing claims this page
            return;
        };
        if let crate::engine::LoadOutcome::Applied { .. } = engine.apply_page(&req, result) {
            if req.reset {
                // Selection and offset belong to the replaced list
                self.list_state = ListState::default();
            }
            if self.list_state.selected().is_none() && !self.items().is_empty() {
                self.list_state.select(Some(0));
            }
            self.check_fill(tx);
        }
    }

    fn check_fill(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let viewport = self.viewport();
        if let Some(engine) = self.engine.as_mut() {
            if let Some(req) = self.trigger.after_load(engine, viewport) {
                self.spawn_page(req, tx);
            }
        }
    }

    fn check_scroll(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let viewport = self.viewport();
        let scroll_top = viewport.scroll_top;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_scroll_top(scroll_top);
            if let Some(req) = self.trigger.on_scroll(engine, viewport) {
                self.spawn_page(req, tx);
            }
        }
    }

    pub fn on_list_event(&mut self, event: ListEvent) {
        match event {
            ListEvent::Replaced { .. } => self.status_message = None,
            ListEvent::LoadFailed { message } => self.status_message = Some(message),
            ListEvent::FiltersChanged(values) => {
                info!(sort = values.sort_by.as_str(), lang = values.language.as_str(), "filters changed");
            }
            _ => {}
        }
    }

    pub fn apply_filter(&mut self, change: FilterChange, tx: &mpsc::Sender<AsyncAction>) {
        let Some(engine) = self.engine.as_mut() else { return };
        if let Some(req) = engine.set_filter(change, &mut self.router, &mut self.cache) {
            self.list_state = ListState::default();
            self.spawn_page(req, tx);
        }
    }

    pub fn submit_search(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.input_mode = InputMode::Normal;
        let query = self.search_input.value().trim().to_string();
        let unchanged = self.engine.as_ref().is_some_and(|e| e.state().query == query);
        if !unchanged {
            self.apply_filter(FilterChange::Query(query), tx);
        }
    }

    pub fn cycle_sort(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let next = self.engine.as_ref().map_or(SortBy::None, |e| e.state().sort_by.next());
        self.apply_filter(FilterChange::Sort(next), tx);
    }

    pub fn cycle_language(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let next = self.engine.as_ref().map_or(Language::English, |e| e.state().language.next());
        self.apply_filter(FilterChange::Language(next), tx);
    }

    pub fn toggle_view_mode(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let next = self.engine.as_ref().map_or(ViewMode::Navigate, |e| e.state().view_mode.toggle());
        self.apply_filter(FilterChange::ViewMode(next), tx);
    }

    pub fn reset_filters(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.search_input.reset();
        self.apply_filter(FilterChange::Reset, tx);
    }

    // --- Selection ---

    fn keep_selection_visible(&mut self) {
        let Some(selected) = self.list_state.selected() else { return };
        let rows = self.visible_rows.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + rows {
            *self.list_state.offset_mut() = selected + 1 - rows;
        }
    }

    pub fn select_next(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.move_selection(1, tx);
    }

    pub fn select_previous(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.move_selection(-1, tx);
    }

    pub fn page_down(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.move_selection(self.visible_rows.max(1) as isize, tx);
    }

    pub fn page_up(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.move_selection(-(self.visible_rows.max(1) as isize), tx);
    }

    fn move_selection(&mut self, delta: isize, tx: &mpsc::Sender<AsyncAction>) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.list_state.select(Some(next));
        self.keep_selection_visible();
        self.check_scroll(tx);
    }

    pub fn scroll_to_top(&mut self) {
        self.list_state = ListState::default();
        if !self.items().is_empty() {
            self.list_state.select(Some(0));
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_scroll_top(0);
        }
    }

    // --- Details ---

    pub fn open_selected(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let Some(id) = self.selected_item().map(|m| m.id) else { return };
        let view_mode = self.engine.as_ref().map_or(ViewMode::Navigate, |e| e.state().view_mode);

        match view_mode {
            ViewMode::Popup => {
                // List stays mounted underneath; keep the cache current anyway
                if let Some(engine) = &self.engine {
                    engine.persist(&mut self.cache);
                }
                self.show_details_popup = true;
            }
            ViewMode::Navigate => {
                self.leave_movies();
                self.router.push_path(&format!("{}/{}", MOVIES_PATH, id));
                self.current_screen = CurrentScreen::Details;
            }
        }
        info!(id, view = view_mode.as_str(), "opening details");
        self.request_details(id, tx);
    }

    fn request_details(&mut self, id: u64, tx: &mpsc::Sender<AsyncAction>) {
        self.details = Some(DetailsView { id, ..Default::default() });
        let client = Arc::clone(&self.client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.details(id).await;
            let _ = tx.send(AsyncAction::DetailsLoaded(id, result)).await;
        });
    }

    pub fn on_details_loaded(&mut self, id: u64, result: Result<MovieDetails, CatalogError>) {
        let Some(view) = self.details.as_mut().filter(|v| v.id == id) else { return };
        match result {
            Ok(details) => view.details = Some(details),
            Err(e) => {
                warn!(id, error = %e, "details load failed");
                view.error = Some(e.diagnostics());
            }
        }
    }

    pub fn close_details(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        if self.show_details_popup {
            self.show_details_popup = false;
            self.details = None;
            return;
        }
        self.details = None;
        if !self.router.back() {
            self.router.push_path(MOVIES_PATH);
        }
        self.enter_authenticated(tx);
    }

    pub fn open_details_in_browser(&mut self) {
        let Some(details) = self.details.as_ref().and_then(|v| v.details.as_ref()) else { return };
        let url = details.web_url();
        if let Err(e) = webbrowser::open(&url) {
            self.status_message = Some(format!("Could not open browser: {}", e));
        }
    }

    /// Watchlist toggle for the movie in focus: the open details, or the
    /// selected row.
    pub fn toggle_watchlist_focused(&mut self) {
        let focused = self
            .details
            .as_ref()
            .map(|v| v.id)
            .or_else(|| self.selected_item().map(|m| m.id));
        let Some(id) = focused else { return };
        self.status_message = Some(match self.watchlist.toggle(id) {
            Ok(true) => "Added to watchlist".to_string(),
            Ok(false) => "Removed from watchlist".to_string(),
            Err(e) => format!("Watchlist not saved: {}", e),
        });
    }

    // --- Watchlist ---

    pub fn show_watchlist(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        self.leave_movies();
        if self.router.location().path != WATCHLIST_PATH {
            self.router.push_path(WATCHLIST_PATH);
        }
        self.current_screen = CurrentScreen::Watchlist;
        self.watchlist_items.clear();
        self.watchlist_state = ListState::default();
        self.watchlist_loading = true;

        let ids = self.watchlist.ids().to_vec();
        let client = Arc::clone(&self.client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let results = futures::future::join_all(ids.iter().map(|id| client.details(*id))).await;
            let items = match results.into_iter().collect::<Result<Vec<_>, _>>() {
                Ok(details) => details.iter().map(MovieDetails::to_list_item).collect(),
                Err(e) => {
                    warn!(error = %e, "watchlist load failed");
                    let _ = tx.send(AsyncAction::Error(e.diagnostics())).await;
                    Vec::new()
                }
            };
            let _ = tx.send(AsyncAction::WatchlistLoaded(items)).await;
        });
    }

    pub fn open_watchlist_selected(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        let Some(id) = self.watchlist_state.selected().and_then(|i| self.watchlist_items.get(i)).map(|m| m.id) else {
            return;
        };
        self.router.push_path(&format!("{}/{}", MOVIES_PATH, id));
        self.current_screen = CurrentScreen::Details;
        self.request_details(id, tx);
    }

    pub fn on_watchlist_loaded(&mut self, items: Vec<ListItem>) {
        if self.current_screen != CurrentScreen::Watchlist {
            return;
        }
        self.watchlist_loading = false;
        self.watchlist_items = items;
        if !self.watchlist_items.is_empty() {
            self.watchlist_state.select(Some(0));
        }
    }

    pub fn close_watchlist(&mut self, tx: &mpsc::Sender<AsyncAction>) {
        if !self.router.back() {
            self.router.push_path(MOVIES_PATH);
        }
        self.enter_authenticated(tx);
    }

    pub fn remove_selected_from_watchlist(&mut self) {
        let Some(index) = self.watchlist_state.selected() else { return };
        let Some(id) = self.watchlist_items.get(index).map(|m| m.id) else { return };
        match self.watchlist.remove(id) {
            Ok(_) => {
                self.watchlist_items.remove(index);
                let len = self.watchlist_items.len();
                self.watchlist_state.select(if len == 0 { None } else { Some(index.min(len - 1)) });
                self.status_message = Some("Removed from watchlist".to_string());
            }
            Err(e) => self.status_message = Some(format!("Watchlist not saved: {}", e)),
        }
    }

    pub fn export_watchlist(&mut self) {
        let path = std::env::current_dir()
            .unwrap_or_default()
            .join("watchlist-export.json");
        self.status_message = Some(match self.watchlist.export_to(&path) {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {}", e),
        });
    }

    pub fn watchlist_next(&mut self) {
        let len = self.watchlist_items.len();
        if len == 0 {
            return;
        }
        let next = self.watchlist_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.watchlist_state.select(Some(next));
    }

    pub fn watchlist_previous(&mut self) {
        let prev = self.watchlist_state.selected().map_or(0, |i| i.saturating_sub(1));
        if !self.watchlist_items.is_empty() {
            self.watchlist_state.select(Some(prev));
        }
    }

    // --- Misc ---

    pub fn cycle_theme(&mut self) {
        let next = self.config.theme.next();
        self.config.set_theme(next);
        self.theme = next.resolve();
        self.status_message = Some(format!("Theme: {}", next.display_name()));
    }

    pub fn copy_location(&mut self) {
        let location = self.location();
        let copied = arboard::Clipboard::new().and_then(|mut c| c.set_text(location.clone()));
        self.status_message = Some(match copied {
            Ok(()) => format!("Copied {}", location),
            Err(_) => location,
        });
    }

    /// Final bookkeeping before exit; returns the location to resume from.
    pub fn shutdown(&mut self) -> String {
        self.leave_movies();
        self.location()
    }
}
