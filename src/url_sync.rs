//! Two-way mapping between list filters and the `q`, `sort`, `lang` and
//! `view` location parameters.
//!
//! Updates are always merges: parameters the list does not own are left
//! alone, and applying the same state twice leaves the location untouched.

use crate::filters::{Language, SortBy, ViewMode};
use std::fmt;
use tracing::warn;
use url::form_urlencoded;

pub const PARAM_QUERY: &str = "q";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_LANG: &str = "lang";
pub const PARAM_VIEW: &str = "view";

pub const MOVIES_PATH: &str = "/movies";

/// Ordered query parameters. Keys are unique; insertion order is kept so the
/// rendered location stays stable across merges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(query: &str) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            params.set(&k, v.into_owned());
        }
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn set(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    /// `Some` sets the key, `None` removes it.
    pub fn merge(&mut self, update: &[(&str, Option<String>)]) {
        for (key, value) in update {
            match value {
                Some(v) => self.set(key, v.clone()),
                None => self.remove(key),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.0 {
            ser.append_pair(k, v);
        }
        ser.finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Path plus query, e.g. `/movies?sort=date_desc&lang=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub params: QueryParams,
}

impl Location {
    pub fn new(path: &str, params: QueryParams) -> Self {
        Self { path: path.to_string(), params }
    }

    /// Accepts `/movies?q=x`, `?q=x` or a bare `q=x`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None if raw.starts_with('/') => (raw, ""),
            None => ("", raw),
        };
        let path = if path.is_empty() { MOVIES_PATH } else { path };
        Self::new(path, QueryParams::parse(query))
    }

    /// Id in a `/movies/{id}` path
    pub fn movie_id(&self) -> Option<u64> {
        self.path.strip_prefix("/movies/").and_then(|id| id.parse().ok())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(MOVIES_PATH, QueryParams::new())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.params)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// Navigable location with history
pub trait Router {
    fn location(&self) -> &Location;

    /// Merges `update` into the current parameters. Returns `false`, and
    /// records nothing, when the merge changes nothing.
    fn merge_params(&mut self, update: &[(&str, Option<String>)], mode: HistoryMode) -> bool;

    /// Navigates to `path`, keeping the current parameters.
    fn push_path(&mut self, path: &str);

    fn back(&mut self) -> bool;
}

#[derive(Debug, Clone)]
pub struct MemoryRouter {
    history: Vec<Location>,
    cursor: usize,
}

impl MemoryRouter {
    pub fn new(start: Location) -> Self {
        Self { history: vec![start], cursor: 0 }
    }

    pub fn history_len(&self) -> usize {
        self.cursor + 1
    }

    fn push(&mut self, location: Location) {
        self.history.truncate(self.cursor + 1);
        self.history.push(location);
        self.cursor += 1;
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new(Location::default())
    }
}

impl Router for MemoryRouter {
    fn location(&self) -> &Location {
        &self.history[self.cursor]
    }

    fn merge_params(&mut self, update: &[(&str, Option<String>)], mode: HistoryMode) -> bool {
        let mut next = self.location().clone();
        next.params.merge(update);
        if next == *self.location() {
            return false;
        }
        match mode {
            HistoryMode::Push => self.push(next),
            HistoryMode::Replace => self.history[self.cursor] = next,
        }
        true
    }

    fn push_path(&mut self, path: &str) {
        let next = Location::new(path, self.location().params.clone());
        self.push(next);
    }

    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }
}

/// The four list-owned values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterValues {
    pub query: String,
    pub sort_by: SortBy,
    pub language: Language,
    pub view_mode: ViewMode,
}

/// Filters as read from a location. `None` means the parameter is absent
/// (or unusable); an explicit empty `lang` is `Some(Language::All)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlFilters {
    pub query: Option<String>,
    pub sort_by: Option<SortBy>,
    pub language: Option<Language>,
    pub view_mode: Option<ViewMode>,
    /// Keys present with a value that did not parse
    pub rejected: Vec<&'static str>,
}

impl UrlFilters {
    pub fn from_params(params: &QueryParams) -> Self {
        let mut rejected = Vec::new();
        let query = params.get(PARAM_QUERY).map(|q| q.trim().to_string());
        let sort_by = checked(params, PARAM_SORT, &mut rejected);
        let language = checked(params, PARAM_LANG, &mut rejected);
        let view_mode = checked(params, PARAM_VIEW, &mut rejected);

        Self { query, sort_by, language, view_mode, rejected }
    }
}

fn checked<T: std::str::FromStr<Err = crate::filters::UnknownValue>>(
    params: &QueryParams,
    key: &'static str,
    rejected: &mut Vec<&'static str>,
) -> Option<T> {
    let raw = params.get(key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(%e, "ignoring location parameter");
            rejected.push(key);
            None
        }
    }
}

/// Location update reflecting the full filter state. An empty query and the
/// unsorted default are dropped; `lang` and `view` are always written, `lang`
/// because its empty value means "All" and must stay distinguishable from
/// "unset".
pub fn filter_update(values: &FilterValues) -> Vec<(&'static str, Option<String>)> {
    vec![
        (PARAM_SORT, non_default(values.sort_by.as_str())),
        (PARAM_LANG, Some(values.language.as_str().to_string())),
        (PARAM_QUERY, non_default(values.query.trim())),
        (PARAM_VIEW, Some(values.view_mode.as_str().to_string())),
    ]
}

pub fn view_update(view_mode: ViewMode) -> Vec<(&'static str, Option<String>)> {
    vec![(PARAM_VIEW, Some(view_mode.as_str().to_string()))]
}

/// Parameters to write back after seeding from the cache: every list-owned
/// key that was absent or rejected in the location.
pub fn seed_writeback(url: &UrlFilters, effective: &FilterValues) -> Vec<(&'static str, Option<String>)> {
    let full = filter_update(effective);
    full.into_iter()
        .filter(|(key, value)| {
            let missing = match *key {
                PARAM_QUERY => url.query.is_none(),
                PARAM_SORT => url.sort_by.is_none(),
                PARAM_LANG => url.language.is_none(),
                _ => url.view_mode.is_none(),
            };
            missing && (value.is_some() || url.rejected.contains(key))
        })
        .collect()
}

fn non_default(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_keep_order_and_unrelated_keys() {
        let mut params = QueryParams::parse("page=3&q=dune");
        params.merge(&[("sort", Some("date_desc".into())), ("q", None)]);
        assert_eq!(params.to_query_string(), "page=3&sort=date_desc");
    }

    #[test]
    fn test_empty_lang_is_all_not_absent() {
        let url = UrlFilters::from_params(&QueryParams::parse("lang="));
        assert_eq!(url.language, Some(Language::All));
        let url = UrlFilters::from_params(&QueryParams::parse(""));
        assert_eq!(url.language, None);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let url = UrlFilters::from_params(&QueryParams::parse("sort=popularity&view=grid&lang=en"));
        assert_eq!(url.sort_by, None);
        assert_eq!(url.view_mode, None);
        assert_eq!(url.language, Some(Language::English));
        assert_eq!(url.rejected, vec![PARAM_SORT, PARAM_VIEW]);
    }

    #[test]
    fn test_filter_update_roundtrip() {
        let values = FilterValues {
            query: "dune".into(),
            sort_by: SortBy::DateDesc,
            language: Language::All,
            view_mode: ViewMode::Navigate,
        };
        let mut router = MemoryRouter::default();
        router.merge_params(&filter_update(&values), HistoryMode::Push);
        assert_eq!(router.location().params.to_query_string(), "sort=date_desc&lang=&q=dune&view=navigate");

        let back = UrlFilters::from_params(&router.location().params);
        assert_eq!(back.query.as_deref(), Some("dune"));
        assert_eq!(back.sort_by, Some(SortBy::DateDesc));
        assert_eq!(back.language, Some(Language::All));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let values = FilterValues { query: "heat".into(), ..Default::default() };
        let mut router = MemoryRouter::default();
        assert!(router.merge_params(&filter_update(&values), HistoryMode::Push));
        assert!(!router.merge_params(&filter_update(&values), HistoryMode::Push));
        assert_eq!(router.history_len(), 2);
    }

    #[test]
    fn test_seed_writeback_only_fills_missing_keys() {
        let url = UrlFilters::from_params(&QueryParams::parse("q=alien"));
        let effective = FilterValues {
            query: "alien".into(),
            sort_by: SortBy::RatingDesc,
            language: Language::English,
            view_mode: ViewMode::Navigate,
        };
        let update = seed_writeback(&url, &effective);
        assert_eq!(
            update,
            vec![
                (PARAM_SORT, Some("rating_desc".to_string())),
                (PARAM_LANG, Some("en".to_string())),
                (PARAM_VIEW, Some("navigate".to_string())),
            ]
        );
    }

    #[test]
    fn test_seed_writeback_clears_rejected_default() {
        let url = UrlFilters::from_params(&QueryParams::parse("sort=bogus&lang=en"));
        let update = seed_writeback(&url, &FilterValues::default());
        assert_eq!(update, vec![(PARAM_SORT, None), (PARAM_VIEW, Some("navigate".to_string()))]);
    }

    #[test]
    fn test_location_parse_forms() {
        let loc = Location::parse("/movies/603?q=matrix");
        assert_eq!(loc.movie_id(), Some(603));
        assert_eq!(loc.params.get("q"), Some("matrix"));

        let loc = Location::parse("sort=title_asc");
        assert_eq!(loc.path, MOVIES_PATH);
        assert_eq!(loc.to_string(), "/movies?sort=title_asc");
    }

    #[test]
    fn test_push_path_and_back() {
        let mut router = MemoryRouter::new(Location::parse("/movies?q=up"));
        router.push_path("/movies/14160");
        assert_eq!(router.location().to_string(), "/movies/14160?q=up");
        assert!(router.back());
        assert_eq!(router.location().path, MOVIES_PATH);
        assert!(!router.back());
    }
}
