use movie_browser_lib::api::{CatalogClient, TmdbClient};
use movie_browser_lib::config::ContentFilterSettings;
use movie_browser_lib::content_filter::KeywordGenreFilter;
use movie_browser_lib::errors::CatalogError;
use movie_browser_lib::filters::{Language, SortBy};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(server.uri(), "test-key".into(), "https://img.example/w342".into(), 5)
}

fn page_body() -> serde_json::Value {
    json!({
        "page": 1,
        "total_pages": 12,
        "total_results": 240,
        "results": [
            {"id": 603, "title": "The Matrix", "original_language": "en", "vote_average": 8.2,
             "release_date": "1999-03-31", "genre_ids": [28, 878]},
            {"id": 194, "title": "Amélie", "original_language": "fr", "vote_average": null,
             "release_date": "", "genre_ids": [35, 10749]}
        ]
    })
}

#[tokio::test]
async fn test_discover_maps_sort_and_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("page", "2"))
        .and(query_param("sort_by", "vote_average.desc"))
        .and(query_param("with_original_language", "ar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).discover(2, SortBy::RatingDesc, Language::Arabic).await.unwrap();
    assert_eq!(page.total_pages, 12);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[1].vote_average, None);
}

#[tokio::test]
async fn test_discover_without_sort_omits_sort_by() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .mount(&server)
        .await;

    client(&server).discover(1, SortBy::None, Language::All).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("sort_by"));
    assert!(!query.contains("with_original_language"));
}

#[tokio::test]
async fn test_search_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "the matrix"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).search("the matrix", 1, Language::English).await.unwrap();
    assert_eq!(page.results[0].id, 603);
}

#[tokio::test]
async fn test_details_parses_genres_and_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "release_date": "1999-03-31",
            "runtime": 136,
            "vote_average": 8.2,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        })))
        .mount(&server)
        .await;

    let details = client(&server).details(603).await.unwrap();
    assert_eq!(details.runtime, Some(136));
    assert_eq!(details.genres.len(), 2);
    assert_eq!(details.to_list_item().release_date.as_deref(), Some("1999-03-31"));
}

#[tokio::test]
async fn test_server_error_carries_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        })))
        .mount(&server)
        .await;

    let err = client(&server).discover(1, SortBy::None, Language::English).await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::ServerError(401, "Invalid API key: You must be granted a valid key.".into())
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).search("x", 1, Language::All).await.unwrap_err();
    assert!(matches!(err, CatalogError::ParseError(_)));
}

#[tokio::test]
async fn test_missing_key_never_hits_network() {
    let server = MockServer::start().await;
    let client = TmdbClient::new(server.uri(), String::new(), "https://img.example".into(), 5);
    let err = client.discover(1, SortBy::None, Language::English).await.unwrap_err();
    assert_eq!(err, CatalogError::MissingApiKey);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_content_filter_runs_on_list_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .mount(&server)
        .await;

    let settings = ContentFilterSettings { enabled: true, ..Default::default() };
    let filter = KeywordGenreFilter::from_settings(&settings).unwrap();
    let client = client(&server).with_content_filter(Arc::new(filter));

    let page = client.discover(1, SortBy::None, Language::All).await.unwrap();
    // Amélie carries genre 10749 (Romance)
    let ids: Vec<u64> = page.results.iter().map(|m| m.id).collect();
    assert_eq!(ids, [603]);
}
