use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_ENV: &str = "MOVIE_BROWSER_LOG";
const LOG_FILE: &str = "movie-browser.log";

pub fn log_dir() -> PathBuf {
    crate::config::project_dirs()
        .map(|p| p.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// File-only logging for the TUI, whose terminal cannot take stray output.
/// The returned guard flushes the writer on drop and must outlive the app.
pub fn init_file() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter());

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        return None;
    }
    tracing::info!(dir = %dir.display(), "logging initialized");
    Some(guard)
}

/// Headless runs log to stderr so stdout stays clean for the listing.
pub fn init_stderr() {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());
    let _ = tracing_subscriber::registry().with(layer).try_init();
}
