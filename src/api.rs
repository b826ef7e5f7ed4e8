use crate::content_filter::ContentFilter;
use crate::errors::CatalogError;
use crate::filters::{Language, SortBy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One catalog entry as shown in a list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ListItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>, // ISO date, TMDB sends "" when unknown
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl ListItem {
    /// Title used for display and for title sorting
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        self.original_title.as_deref().unwrap_or_default()
    }

    /// Four-digit release year, when the date carries one
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|d| d.len() >= 4 && d.is_char_boundary(4))
            .map(|d| &d[..4])
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full record returned by the details endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl MovieDetails {
    /// List-shaped copy, used by the watchlist screen
    pub fn to_list_item(&self) -> ListItem {
        ListItem {
            id: self.id,
            title: self.title.clone(),
            original_title: self.original_title.clone(),
            original_language: self.original_language.clone(),
            poster_path: self.poster_path.clone(),
            release_date: Some(self.release_date.clone()).filter(|d| !d.is_empty()),
            overview: Some(self.overview.clone()).filter(|o| !o.is_empty()),
            vote_average: self.vote_average,
            genre_ids: Vec::new(),
        }
    }

    pub fn web_url(&self) -> String {
        format!("https://www.themoviedb.org/movie/{}", self.id)
    }
}

/// One page of a paged listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CatalogPage {
    #[serde(default)]
    pub results: Vec<ListItem>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

/// The remote catalog as seen by the list engine and the detail/watchlist
/// screens.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn discover(&self, page: u32, sort: SortBy, language: Language) -> Result<CatalogPage, CatalogError>;

    /// Search has no native sort or language filter; both are applied
    /// client-side by the engine.
    async fn search(&self, query: &str, page: u32, language: Language) -> Result<CatalogPage, CatalogError>;

    async fn details(&self, id: u64) -> Result<MovieDetails, CatalogError>;

    fn image_url(&self, path: Option<&str>) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    pub base_url: String,
    pub image_base_url: String,
    api_key: String,
    timeout_secs: u64,
    content_filter: Option<Arc<dyn ContentFilter>>,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(base_url: String, api_key: String, image_base_url: String, timeout_secs: u64) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let image_base_url = image_base_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent(concat!("movie-browser/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url,
            image_base_url,
            api_key,
            timeout_secs,
            content_filter: None,
            client,
        }
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        let mut client = Self::new(
            config.tmdb.base_url.clone(),
            config.tmdb.api_key.clone().unwrap_or_default(),
            config.tmdb.image_base_url.clone(),
            config.tmdb.timeout_secs,
        );
        if let Some(filter) = crate::content_filter::KeywordGenreFilter::from_settings(&config.content_filter) {
            client = client.with_content_filter(Arc::new(filter));
        }
        client
    }

    pub fn with_content_filter(mut self, filter: Arc<dyn ContentFilter>) -> Self {
        self.content_filter = Some(filter);
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        if self.api_key.is_empty() {
            return Err(CatalogError::MissingApiKey);
        }
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "catalog request");

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest(e, self.timeout_secs))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %url, "catalog request rejected");
            return Err(CatalogError::ServerError(status.as_u16(), status_message(&body, status)));
        }

        resp.json::<T>().await.map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    fn filter_page(&self, mut page: CatalogPage) -> CatalogPage {
        if let Some(filter) = &self.content_filter {
            let before = page.results.len();
            page.results = filter.apply(std::mem::take(&mut page.results));
            if page.results.len() != before {
                debug!(dropped = before - page.results.len(), "content filter applied");
            }
        }
        page
    }
}

/// TMDB error bodies look like `{"status_message": "..."}`
fn status_message(body: &str, status: reqwest::StatusCode) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        status_message: Option<String>,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string())
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn discover(&self, page: u32, sort: SortBy, language: Language) -> Result<CatalogPage, CatalogError> {
        let mut params = vec![("page", page.to_string())];
        if let Some(key) = sort.discover_key() {
            params.push(("sort_by", key.to_string()));
        }
        if let Some(lang) = language.native_filter() {
            params.push(("with_original_language", lang.to_string()));
        }
        let resp: CatalogPage = self.get_json("/discover/movie", &params).await?;
        Ok(self.filter_page(resp))
    }

    async fn search(&self, query: &str, page: u32, _language: Language) -> Result<CatalogPage, CatalogError> {
        let params = [("query", query.to_string()), ("page", page.to_string())];
        let resp: CatalogPage = self.get_json("/search/movie", &params).await?;
        Ok(self.filter_page(resp))
    }

    async fn details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }

    fn image_url(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}", self.image_base_url, p.trim_start_matches('/')))
    }
}
