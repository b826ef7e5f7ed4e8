pub mod api;
pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod content_filter;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod logging;
pub mod scroll;
pub mod sort;
pub mod theme;
pub mod ui;
pub mod url_sync;
pub mod watchlist;
