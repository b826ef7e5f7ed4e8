//! List reconciliation engine.
//!
//! Owns the ordered, de-duplicated list behind the movies screen and merges
//! catalog pages into it. Network work is split in two halves so the engine
//! never blocks: [`ListEngine::load_page`] hands out a [`PageRequest`] ticket,
//! the caller runs it against a [`CatalogClient`], and the result comes back
//! through [`ListEngine::apply_page`]. Every ticket carries the epoch it was
//! issued in; a reset or teardown moves the epoch on, so late answers for an
//! older list are dropped instead of being merged.

use crate::api::{CatalogClient, CatalogPage, ListItem};
use crate::cache::SessionCache;
use crate::errors::CatalogError;
use crate::filters::{Language, SortBy, ViewMode};
use crate::sort::sort_items;
use crate::url_sync::{self, FilterValues, HistoryMode, Router, UrlFilters};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

pub const BROWSE_FAILED: &str = "Failed to load movies.";
pub const SEARCH_FAILED: &str = "Search failed.";

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Everything the movies screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub items: Vec<ListItem>,
    pub known_ids: HashSet<u64>,
    pub query: String,
    pub sort_by: SortBy,
    pub language: Language,
    pub view_mode: ViewMode,
    pub page: u32,
    pub total_pages: u32,
    pub scroll_top: u32,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            known_ids: HashSet::new(),
            query: String::new(),
            sort_by: SortBy::None,
            language: Language::English,
            view_mode: ViewMode::Navigate,
            page: 1,
            total_pages: 1,
            scroll_top: 0,
        }
    }
}

impl ListState {
    pub fn is_search(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Discover pages arrive already ordered for non-title sorts; everything
    /// else is ordered here.
    pub fn needs_client_sort(&self) -> bool {
        self.sort_by != SortBy::None && (self.is_search() || self.sort_by.is_title())
    }

    pub fn filters(&self) -> FilterValues {
        FilterValues {
            query: self.query.clone(),
            sort_by: self.sort_by,
            language: self.language,
            view_mode: self.view_mode,
        }
    }

    fn fetch_mode(&self) -> FetchMode {
        if self.is_search() {
            FetchMode::Search { query: self.query.trim().to_string(), language: self.language }
        } else {
            FetchMode::Discover { sort_by: self.sort_by, language: self.language }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchMode {
    Discover { sort_by: SortBy, language: Language },
    Search { query: String, language: Language },
}

/// Ticket for one catalog page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub session: u64,
    pub epoch: u64,
    pub page: u32,
    pub reset: bool,
    pub mode: FetchMode,
}

impl PageRequest {
    pub async fn execute(&self, client: &dyn CatalogClient) -> Result<CatalogPage, CatalogError> {
        match &self.mode {
            FetchMode::Discover { sort_by, language } => client.discover(self.page, *sort_by, *language).await,
            FetchMode::Search { query, language } => client.search(query, self.page, *language).await,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self.mode {
            FetchMode::Discover { .. } => BROWSE_FAILED,
            FetchMode::Search { .. } => SEARCH_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Applied { added: usize },
    Failed(String),
    /// The list moved on while the request was out
    Stale,
}

/// What the engine tells its subscribers after each transition
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Restored { count: usize },
    LoadStarted { page: u32, reset: bool },
    Replaced { count: usize },
    Appended { added: usize },
    LoadFailed { message: String },
    StaleDiscarded { page: u32 },
    FiltersChanged(FilterValues),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Query(String),
    Sort(SortBy),
    Language(Language),
    ViewMode(ViewMode),
    /// Back to defaults: no query, no sort, English
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    /// Cached list shown as-is; no fetch issued
    Restored,
    Fetch(PageRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&ListEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct InFlight {
    epoch: u64,
    page: u32,
    reset: bool,
}

pub struct ListEngine {
    session: u64,
    state: ListState,
    epoch: u64,
    in_flight: Option<InFlight>,
    error: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for ListEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListEngine")
            .field("session", &self.session)
            .field("epoch", &self.epoch)
            .field("items", &self.state.items.len())
            .field("in_flight", &self.in_flight)
            .field("error", &self.error)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ListEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ListEngine {
    pub fn new() -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            state: ListState::default(),
            epoch: 0,
            in_flight: None,
            error: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A reset fetch is out; the toolbar shows "Loading..."
    pub fn is_resetting(&self) -> bool {
        self.in_flight.is_some_and(|f| f.reset)
    }

    pub fn can_load_more(&self) -> bool {
        self.in_flight.is_none() && self.state.page < self.state.total_pages
    }

    pub fn set_scroll_top(&mut self, scroll_top: u32) {
        self.state.scroll_top = scroll_top;
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ListEvent) + Send + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: ListEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Seeds filters from the location (when present) or the cache, writes
    /// cache-sourced values back into the location, then either restores the
    /// cached list or asks for page 1.
    pub fn initialize(&mut self, router: &mut dyn Router, cache: &SessionCache) -> InitOutcome {
        let url = UrlFilters::from_params(&router.location().params);

        self.state.query = url.query.clone().unwrap_or_else(|| cache.query().to_string());
        self.state.sort_by = url.sort_by.unwrap_or(cache.sort_by());
        self.state.view_mode = url.view_mode.unwrap_or(cache.view_mode());
        self.state.language = url.language.unwrap_or(cache.language_or_default());

        let writeback = url_sync::seed_writeback(&url, &self.state.filters());
        if !writeback.is_empty() {
            router.merge_params(&writeback, HistoryMode::Replace);
        }

        let same_list = self.state.query == cache.query()
            && self.state.sort_by == cache.sort_by()
            && self.state.language == cache.language_or_default();

        match cache.items() {
            Some(items) if !items.is_empty() && same_list => {
                self.state.known_ids.clear();
                self.state.items = self.take_unseen(items.to_vec());
                self.state.page = cache.page();
                self.state.total_pages = cache.total_pages();
                self.state.scroll_top = cache.scroll_top();
                self.error = None;
                info!(count = self.state.items.len(), page = self.state.page, "restored cached list");
                self.emit(ListEvent::Restored { count: self.state.items.len() });
                InitOutcome::Restored
            }
            _ => {
                self.state.scroll_top = 0;
                InitOutcome::Fetch(self.start_reset())
            }
        }
    }

    /// Issues a fetch ticket. Resets always go out, supersede whatever is in
    /// flight and drop the current list and paging; pagination is refused
    /// while another load is out or past the last page.
    pub fn load_page(&mut self, page: u32, reset: bool) -> Option<PageRequest> {
        let page = page.max(1);
        if !reset {
            if let Some(f) = self.in_flight {
                debug!(page, in_flight = f.page, "load already in flight");
                return None;
            }
            if page > self.state.total_pages {
                return None;
            }
        }
        Some(self.issue(page, reset))
    }

    pub fn load_next_page(&mut self) -> Option<PageRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.load_page(self.state.page + 1, false)
    }

    fn start_reset(&mut self) -> PageRequest {
        self.issue(1, true)
    }

    fn issue(&mut self, page: u32, reset: bool) -> PageRequest {
        if reset {
            // The old list must not outlive its filters, in the cache or in paging
            self.epoch += 1;
            self.error = None;
            self.state.items.clear();
            self.state.known_ids.clear();
            self.state.page = 1;
            self.state.total_pages = 1;
        }
        self.in_flight = Some(InFlight { epoch: self.epoch, page, reset });
        info!(page, reset, query = %self.state.query, sort = self.state.sort_by.as_str(), "loading page");
        self.emit(ListEvent::LoadStarted { page, reset });

        PageRequest {
            session: self.session,
            epoch: self.epoch,
            page,
            reset,
            mode: self.state.fetch_mode(),
        }
    }

    /// Applies a fetch result, unless the ticket is no longer current.
    pub fn apply_page(&mut self, req: &PageRequest, result: Result<CatalogPage, CatalogError>) -> LoadOutcome {
        let current = req.session == self.session
            && req.epoch == self.epoch
            && self.in_flight.is_some_and(|f| f.epoch == req.epoch && f.page == req.page);
        if !current {
            debug!(page = req.page, epoch = req.epoch, current_epoch = self.epoch, "discarding stale page");
            self.emit(ListEvent::StaleDiscarded { page: req.page });
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.state.total_pages = page.total_pages.max(1);
                let language = self.state.language;
                let incoming: Vec<ListItem> = page
                    .results
                    .into_iter()
                    .filter(|m| language.accepts(m.original_language.as_deref()))
                    .collect();
                let added = self.merge(incoming, req.reset);
                self.state.page = req.page;
                self.error = None;

                if req.reset {
                    self.emit(ListEvent::Replaced { count: added });
                } else {
                    self.emit(ListEvent::Appended { added });
                }
                LoadOutcome::Applied { added }
            }
            Err(e) => {
                warn!(error = %e, page = req.page, "catalog load failed");
                let message = req.failure_message().to_string();
                self.error = Some(message.clone());
                self.emit(ListEvent::LoadFailed { message: message.clone() });
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Runs a ticket to completion and applies it. For callers that do not
    /// need to interleave other work.
    pub async fn fetch(&mut self, client: &dyn CatalogClient, req: PageRequest) -> LoadOutcome {
        let result = req.execute(client).await;
        self.apply_page(&req, result)
    }

    fn take_unseen(&mut self, incoming: Vec<ListItem>) -> Vec<ListItem> {
        let known = &mut self.state.known_ids;
        incoming.into_iter().filter(|m| known.insert(m.id)).collect()
    }

    fn merge(&mut self, incoming: Vec<ListItem>, reset: bool) -> usize {
        let sort_by = self.state.sort_by;
        let client_sort = self.state.needs_client_sort();

        if reset {
            self.state.known_ids.clear();
            let mut items = self.take_unseen(incoming);
            if client_sort {
                sort_items(&mut items, sort_by);
            }
            self.state.items = items;
            debug!(count = self.state.items.len(), "list replaced");
            self.state.items.len()
        } else {
            // Earlier rows never move; only the new batch is ordered
            let mut fresh = self.take_unseen(incoming);
            if client_sort {
                sort_items(&mut fresh, sort_by);
            }
            let added = fresh.len();
            self.state.items.extend(fresh);
            debug!(added, total = self.state.items.len(), "page appended");
            added
        }
    }

    /// Records a filter change in the state, the cache and the location.
    /// Query, sort and language changes (and a reset) reload page 1.
    pub fn set_filter(
        &mut self,
        change: FilterChange,
        router: &mut dyn Router,
        cache: &mut SessionCache,
    ) -> Option<PageRequest> {
        let reload = match change {
            FilterChange::Query(q) => {
                self.state.query = q.trim().to_string();
                cache.set_query(&self.state.query);
                true
            }
            FilterChange::Sort(sort_by) => {
                self.state.sort_by = sort_by;
                cache.set_sort_by(sort_by);
                true
            }
            FilterChange::Language(language) => {
                self.state.language = language;
                cache.set_language(language);
                true
            }
            FilterChange::ViewMode(view_mode) => {
                self.state.view_mode = view_mode;
                cache.set_view_mode(view_mode);
                false
            }
            FilterChange::Reset => {
                self.state.query.clear();
                self.state.sort_by = SortBy::None;
                self.state.language = Language::English;
                cache.clear();
                true
            }
        };

        let update = if reload {
            url_sync::filter_update(&self.state.filters())
        } else {
            url_sync::view_update(self.state.view_mode)
        };
        router.merge_params(&update, HistoryMode::Push);
        self.emit(ListEvent::FiltersChanged(self.state.filters()));

        if reload {
            self.state.scroll_top = 0;
            Some(self.start_reset())
        } else {
            None
        }
    }

    /// Mirrors the current state into the cache.
    pub fn persist(&self, cache: &mut SessionCache) {
        cache.set_items(self.state.items.clone());
        cache.set_query(&self.state.query);
        cache.set_sort_by(self.state.sort_by);
        cache.set_view_mode(self.state.view_mode);
        cache.set_language(self.state.language);
        cache.set_page(self.state.page);
        cache.set_total_pages(self.state.total_pages);
        cache.set_scroll_top(self.state.scroll_top);
    }

    /// Leaves the view: flushes into the cache and drops the engine, its
    /// listeners and any claim on in-flight requests.
    pub fn teardown(self, cache: &mut SessionCache) {
        self.persist(cache);
        info!(
            session = self.session,
            items = self.state.items.len(),
            pending = self.in_flight.is_some(),
            "list view torn down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_sync::MemoryRouter;
    use std::sync::{Arc, Mutex};

    fn item(id: u64, title: &str, lang: &str) -> ListItem {
        ListItem {
            id,
            title: title.to_string(),
            original_language: Some(lang.to_string()),
            ..Default::default()
        }
    }

    fn page_of(items: Vec<ListItem>, page: u32, total_pages: u32) -> CatalogPage {
        CatalogPage { total_results: items.len() as u64, results: items, page, total_pages }
    }

    fn ids(engine: &ListEngine) -> Vec<u64> {
        engine.state().items.iter().map(|m| m.id).collect()
    }

    fn started(router: &mut MemoryRouter, cache: &SessionCache) -> (ListEngine, PageRequest) {
        let mut engine = ListEngine::new();
        match engine.initialize(router, cache) {
            InitOutcome::Fetch(req) => (engine, req),
            InitOutcome::Restored => panic!("expected a fetch"),
        }
    }

    #[test]
    fn test_fresh_session_fetches_discover_page_one() {
        let mut router = MemoryRouter::default();
        let (engine, req) = started(&mut router, &SessionCache::new());
        assert_eq!(req.page, 1);
        assert!(req.reset);
        assert_eq!(req.mode, FetchMode::Discover { sort_by: SortBy::None, language: Language::English });
        assert!(engine.is_resetting());
        // Absent lang is always written back
        assert_eq!(router.location().params.get("lang"), Some("en"));
    }

    #[test]
    fn test_language_filter_applies_before_merge() {
        let mut router = MemoryRouter::default();
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        let page = page_of(vec![item(1, "Heat", "en"), item(2, "Wadjda", "ar"), item(3, "Alien", "en")], 1, 3);
        assert_eq!(engine.apply_page(&req, Ok(page)), LoadOutcome::Applied { added: 2 });
        assert_eq!(ids(&engine), [1, 3]);
        assert_eq!(engine.state().total_pages, 3);
    }

    #[test]
    fn test_pagination_dedups_and_appends() {
        let mut router = MemoryRouter::default();
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        engine.apply_page(&req, Ok(page_of(vec![item(1, "B", "en"), item(2, "A", "en")], 1, 2)));

        let next = engine.load_next_page().unwrap();
        assert_eq!(next.page, 2);
        let outcome = engine.apply_page(&next, Ok(page_of(vec![item(2, "A", "en"), item(3, "C", "en")], 2, 2)));
        assert_eq!(outcome, LoadOutcome::Applied { added: 1 });
        assert_eq!(ids(&engine), [1, 2, 3]);
        assert_eq!(engine.state().page, 2);
        // Last page reached
        assert!(engine.load_next_page().is_none());
    }

    #[test]
    fn test_in_flight_guard_refuses_second_page() {
        let mut router = MemoryRouter::default();
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        engine.apply_page(&req, Ok(page_of(vec![item(1, "A", "en")], 1, 5)));
        assert!(engine.load_next_page().is_some());
        assert!(engine.load_next_page().is_none());
        assert!(engine.load_page(3, false).is_none());
    }

    #[test]
    fn test_failure_keeps_list_and_page() {
        let mut router = MemoryRouter::default();
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        engine.apply_page(&req, Ok(page_of(vec![item(1, "A", "en")], 1, 4)));

        let next = engine.load_next_page().unwrap();
        let outcome = engine.apply_page(&next, Err(CatalogError::Timeout(15)));
        assert_eq!(outcome, LoadOutcome::Failed(BROWSE_FAILED.to_string()));
        assert_eq!(ids(&engine), [1]);
        assert_eq!(engine.state().page, 1);
        assert_eq!(engine.error(), Some(BROWSE_FAILED));
        // The guard is released so scrolling can try again
        assert!(engine.can_load_more());
    }

    #[test]
    fn test_search_failure_message() {
        let mut router = MemoryRouter::new(crate::url_sync::Location::parse("q=dune"));
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        let outcome = engine.apply_page(&req, Err(CatalogError::ServerError(500, "boom".into())));
        assert_eq!(outcome, LoadOutcome::Failed(SEARCH_FAILED.to_string()));
    }

    #[test]
    fn test_reset_sorts_whole_list_for_title_sort() {
        let mut router = MemoryRouter::new(crate::url_sync::Location::parse("sort=title_asc"));
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        let page = page_of(
            vec![item(1, "The Matrix", "en"), item(2, "Amelie", "en"), item(3, "A Beautiful Mind", "en")],
            1,
            1,
        );
        engine.apply_page(&req, Ok(page));
        assert_eq!(ids(&engine), [2, 3, 1]);
    }

    #[test]
    fn test_discover_rating_sort_trusts_server_order() {
        let mut router = MemoryRouter::new(crate::url_sync::Location::parse("sort=rating_desc"));
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        let mut low = item(1, "Low", "en");
        low.vote_average = Some(3.0);
        let mut high = item(2, "High", "en");
        high.vote_average = Some(9.0);
        engine.apply_page(&req, Ok(page_of(vec![low, high], 1, 1)));
        assert_eq!(ids(&engine), [1, 2]);
    }

    #[test]
    fn test_search_pagination_sorts_only_new_batch() {
        let mut router = MemoryRouter::new(crate::url_sync::Location::parse("q=star&sort=rating_desc"));
        let (mut engine, req) = started(&mut router, &SessionCache::new());
        let rated = |id: u64, r: f64| ListItem { vote_average: Some(r), ..item(id, "Star", "en") };
        engine.apply_page(&req, Ok(page_of(vec![rated(1, 5.0), rated(2, 8.0)], 1, 2)));
        assert_eq!(ids(&engine), [2, 1]);

        let next = engine.load_next_page().unwrap();
        engine.apply_page(&next, Ok(page_of(vec![rated(3, 9.5), rated(4, 1.0), rated(5, 7.0)], 2, 2)));
        assert_eq!(ids(&engine), [2, 1, 3, 5, 4]);
    }

    #[test]
    fn test_reset_supersedes_pending_page() {
        let mut router = MemoryRouter::default();
        let mut cache = SessionCache::new();
        let (mut engine, req) = started(&mut router, &cache);
        engine.apply_page(&req, Ok(page_of(vec![item(1, "A", "en")], 1, 3)));

        let page_two = engine.load_next_page().unwrap();
        let search = engine
            .set_filter(FilterChange::Query("dune".into()), &mut router, &mut cache)
            .unwrap();

        let late = engine.apply_page(&page_two, Ok(page_of(vec![item(2, "B", "en")], 2, 3)));
        assert_eq!(late, LoadOutcome::Stale);
        engine.apply_page(&search, Ok(page_of(vec![item(10, "Dune", "en")], 1, 1)));
        assert_eq!(ids(&engine), [10]);
        assert_eq!(engine.state().known_ids, HashSet::from([10]));
    }

    #[test]
    fn test_ticket_from_another_session_is_stale() {
        let mut router = MemoryRouter::default();
        let cache = SessionCache::new();
        let (_old, old_req) = started(&mut router, &cache);
        let (mut engine, _req) = started(&mut router, &cache);
        assert_eq!(engine.apply_page(&old_req, Ok(CatalogPage::default())), LoadOutcome::Stale);
    }

    #[test]
    fn test_view_mode_change_does_not_reload() {
        let mut router = MemoryRouter::default();
        let mut cache = SessionCache::new();
        let (mut engine, req) = started(&mut router, &cache);
        engine.apply_page(&req, Ok(page_of(vec![item(1, "A", "en")], 1, 1)));

        let reload = engine.set_filter(FilterChange::ViewMode(ViewMode::Popup), &mut router, &mut cache);
        assert!(reload.is_none());
        assert_eq!(cache.view_mode(), ViewMode::Popup);
        assert_eq!(router.location().params.get("view"), Some("popup"));
        assert_eq!(ids(&engine), [1]);
    }

    #[test]
    fn test_reset_filters_restores_defaults() {
        let mut router = MemoryRouter::new(crate::url_sync::Location::parse("q=dune&sort=date_asc&lang=ar"));
        let mut cache = SessionCache::new();
        let (mut engine, _req) = started(&mut router, &cache);
        let req = engine.set_filter(FilterChange::Reset, &mut router, &mut cache).unwrap();
        assert_eq!(req.mode, FetchMode::Discover { sort_by: SortBy::None, language: Language::English });
        assert_eq!(router.location().params.to_query_string(), "lang=en&view=navigate");
        assert_eq!(cache.language(), Some(Language::English));
    }

    #[test]
    fn test_listeners_see_transitions() {
        let mut router = MemoryRouter::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut engine = ListEngine::new();
        let sink = Arc::clone(&seen);
        let id = engine.subscribe(move |ev| sink.lock().unwrap().push(ev.clone()));

        let req = match engine.initialize(&mut router, &SessionCache::new()) {
            InitOutcome::Fetch(req) => req,
            InitOutcome::Restored => unreachable!(),
        };
        engine.apply_page(&req, Ok(page_of(vec![item(1, "A", "en")], 1, 1)));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![ListEvent::LoadStarted { page: 1, reset: true }, ListEvent::Replaced { count: 1 }]
        );

        assert!(engine.unsubscribe(id));
        engine.load_page(1, true);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_teardown_flushes_everything() {
        let mut router = MemoryRouter::new(crate::url_sync::Location::parse("sort=title_desc&lang=&view=popup"));
        let mut cache = SessionCache::new();
        let (mut engine, req) = started(&mut router, &cache);
        engine.apply_page(&req, Ok(page_of(vec![item(1, "A", "fr"), item(2, "B", "en")], 1, 9)));
        engine.set_scroll_top(120);
        engine.teardown(&mut cache);

        assert_eq!(cache.items().map(|i| i.len()), Some(2));
        assert_eq!(cache.sort_by(), SortBy::TitleDesc);
        assert_eq!(cache.language(), Some(Language::All));
        assert_eq!(cache.view_mode(), ViewMode::Popup);
        assert_eq!(cache.total_pages(), 9);
        assert_eq!(cache.scroll_top(), 120);
    }
}
