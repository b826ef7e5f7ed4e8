use std::{io, sync::Arc, time::Duration};

use anyhow::Context;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use movie_browser_lib::api::{CatalogClient, TmdbClient};
use movie_browser_lib::app::{App, AsyncAction};
use movie_browser_lib::auth::{Authenticator, CredentialStore};
use movie_browser_lib::cache::SessionCache;
use movie_browser_lib::config::AppConfig;
use movie_browser_lib::engine::{InitOutcome, ListEngine, LoadOutcome};
use movie_browser_lib::handlers::{async_actions, input, mouse};
use movie_browser_lib::url_sync::{Location, MemoryRouter, Router};
use movie_browser_lib::watchlist::Watchlist;
use movie_browser_lib::{logging, ui};

#[derive(clap::Parser, Debug)]
#[command(version, about = "Browse the TMDB movie catalog from the terminal", long_about = None)]
struct Args {
    /// Location to start from, e.g. "/movies?sort=rating_desc&lang=ar"
    #[arg(short, long)]
    url: Option<String>,

    /// Print the list for --url to stdout instead of starting the TUI
    #[arg(long)]
    print: bool,

    /// Pages to fetch with --print
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Check configuration and credentials, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();
    let start = args.url.as_deref().map(Location::parse).unwrap_or_default();

    // -- CLI MODE --
    if args.check {
        logging::init_stderr();
        return check().await;
    }

    let config = AppConfig::load().context("loading config.json")?;
    let client: Arc<dyn CatalogClient> = Arc::new(TmdbClient::from_config(&config));

    if args.print {
        logging::init_stderr();
        return print_list(client.as_ref(), start, args.pages).await;
    }

    // -- TUI MODE (Default) --
    let _log_guard = logging::init_file();

    let store = CredentialStore::load(config.users_path().as_deref())?;
    let auth = Authenticator::new(store, Authenticator::default_session_path());
    let watchlist = match Watchlist::default_path() {
        Some(path) => Watchlist::open(path)?,
        None => Watchlist::in_memory(Vec::new()),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, client, auth, watchlist, start);
    let (tx, mut rx) = mpsc::channel::<AsyncAction>(64);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;
    let location = app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }
    println!("Resume with: movie-browser --url '{}'", location);

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tx: mpsc::Sender<AsyncAction>,
    rx: &mut mpsc::Receiver<AsyncAction>,
) -> Result<(), anyhow::Error>
where
    B::Error: Send + Sync + 'static,
{
    app.start(&tx);

    loop {
        terminal.draw(|f| ui::ui(f, app))?;
        app.loading_tick = app.loading_tick.wrapping_add(1);

        // 1. Drain background results (non-blocking)
        while let Ok(action) = rx.try_recv() {
            async_actions::handle_async_action(app, action, &tx);
        }

        app.ensure_session();

        // 2. Poll inputs
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if input::handle_key_event(app, key, &tx) == input::InputResult::Quit {
                        app.should_quit = true;
                    }
                }
                Event::Mouse(m) => mouse::handle_mouse_event(app, m, &tx),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Headless listing: same seeding and merge rules as the TUI, printed as
/// tab-separated rows.
async fn print_list(client: &dyn CatalogClient, start: Location, pages: u32) -> Result<(), anyhow::Error> {
    let mut router = MemoryRouter::new(start);
    let cache = SessionCache::new();
    let mut engine = ListEngine::new();

    let mut next = match engine.initialize(&mut router, &cache) {
        InitOutcome::Fetch(req) => Some(req),
        InitOutcome::Restored => None,
    };
    let mut fetched = 0;
    while let Some(req) = next.take() {
        if let LoadOutcome::Failed(message) = engine.fetch(client, req).await {
            anyhow::bail!(message);
        }
        fetched += 1;
        if fetched < pages.max(1) {
            next = engine.load_next_page();
        }
    }

    let state = engine.state();
    eprintln!(
        "{} | {} items | page {}/{}",
        router.location(),
        state.items.len(),
        state.page,
        state.total_pages
    );
    for item in &state.items {
        let year = item.year().unwrap_or("----");
        let rating = item.vote_average.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}\t{}", item.id, year, rating, item.display_title());
    }
    Ok(())
}

async fn check() -> Result<(), anyhow::Error> {
    println!("Checking configuration...");
    match AppConfig::config_path() {
        Some(path) if path.exists() => println!("Config: {}", path.display()),
        Some(path) => println!("Config: {} (not found, using defaults)", path.display()),
        None => println!("Config: no config directory available"),
    }
    let config = AppConfig::load()?;
    println!("Catalog: {}", config.tmdb.base_url);
    println!(
        "API key: {}",
        if config.has_api_key() { "present" } else { "missing (set TMDB_API_KEY)" }
    );
    println!("Theme: {}", config.theme.display_name());
    println!("Content filter: {}", if config.content_filter.enabled { "on" } else { "off" });

    let store = CredentialStore::load(config.users_path().as_deref())?;
    println!("Users: {} account(s)", store.len());
    if let Some(path) = Watchlist::default_path() {
        println!("Watchlist: {}", path.display());
    }
    println!("Logs: {}", logging::log_dir().display());

    if config.has_api_key() {
        let client = TmdbClient::from_config(&config);
        match client.discover(1, Default::default(), Default::default()).await {
            Ok(page) => println!("Catalog reachable: {} pages available", page.total_pages),
            Err(e) => println!("Catalog check failed:\n{}", e.diagnostics()),
        }
    }
    Ok(())
}
