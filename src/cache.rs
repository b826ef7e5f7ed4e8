//! Session list cache.
//!
//! Holds the last list the user saw together with its filters, paging and
//! scroll position so that returning to the list (from the details screen or
//! the watchlist) shows exactly the same view without a network round trip.
//! It lives as long as the process and is owned by the application, which
//! hands it to the list engine on entry and exit.

use crate::api::ListItem;
use crate::filters::{Language, SortBy, ViewMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionCache {
    items: Option<Vec<ListItem>>,
    query: String,
    sort_by: SortBy,
    view_mode: ViewMode,
    /// `None` until the user picks one; read back as English
    language: Option<Language>,
    page: u32,
    total_pages: u32,
    scroll_top: u32,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self {
            items: None,
            query: String::new(),
            sort_by: SortBy::None,
            view_mode: ViewMode::Navigate,
            language: None,
            page: 1,
            total_pages: 1,
            scroll_top: 0,
        }
    }
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> Option<&[ListItem]> {
        self.items.as_deref()
    }

    pub fn has_items(&self) -> bool {
        self.items.as_ref().is_some_and(|i| !i.is_empty())
    }

    pub fn set_items(&mut self, items: Vec<ListItem>) {
        self.items = Some(items);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Stored language, if any was ever set
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Stored language with the English fallback applied
    pub fn language_or_default(&self) -> Language {
        self.language.unwrap_or(Language::English)
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = Some(language);
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn set_scroll_top(&mut self, scroll_top: u32) {
        self.scroll_top = scroll_top;
    }

    /// Drops the cached list and filters; the view mode survives.
    pub fn clear(&mut self) {
        let view_mode = self.view_mode;
        *self = Self::default();
        self.view_mode = view_mode;
        self.language = Some(Language::English);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_language_reads_as_english() {
        let mut cache = SessionCache::new();
        assert_eq!(cache.language(), None);
        assert_eq!(cache.language_or_default(), Language::English);
        cache.set_language(Language::All);
        assert_eq!(cache.language_or_default(), Language::All);
    }

    #[test]
    fn test_page_never_zero() {
        let mut cache = SessionCache::new();
        cache.set_page(0);
        cache.set_total_pages(0);
        assert_eq!(cache.page(), 1);
        assert_eq!(cache.total_pages(), 1);
    }

    #[test]
    fn test_clear_keeps_view_mode() {
        let mut cache = SessionCache::new();
        cache.set_view_mode(ViewMode::Popup);
        cache.set_query("dune");
        cache.set_sort_by(SortBy::TitleAsc);
        cache.set_items(vec![ListItem { id: 1, ..Default::default() }]);
        cache.clear();
        assert!(!cache.has_items());
        assert_eq!(cache.query(), "");
        assert_eq!(cache.sort_by(), SortBy::None);
        assert_eq!(cache.view_mode(), ViewMode::Popup);
        assert_eq!(cache.language(), Some(Language::English));
    }
}
