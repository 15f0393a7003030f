//! dexcache - a terminal dashboard for the PokeAPI creature catalog.
//!
//! The dashboard reads catalog snapshots produced by `--fetch-index`,
//! resolves a sample of detail resources (memoized across sessions) and
//! renders a pokedex view plus aggregate analytics.

mod app;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dexcache_core::{ApiClient, BulkLister, Config, ListerOptions, Progress, SnapshotStore};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--fetch-index" {
        return fetch_index().await;
    }

    info!("dexcache starting");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let store = SnapshotStore::new(config.data_dir()?)?;

    // Both catalog snapshots must exist before the dashboard can run;
    // bail out with the file name before touching the terminal.
    let refs = match store.load("pokemon") {
        Ok(refs) => refs,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let ability_total = match store.load("ability") {
        Ok(abilities) => abilities.len(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let snapshot_age = store
        .age_display("pokemon")
        .unwrap_or_else(|| "unknown".to_string());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and kick off the detail load
    let mut app = App::new(config, refs, ability_total, snapshot_age);
    app.start_load(false);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("dexcache shutting down");
    Ok(())
}

/// Progress sink for the index fetch CLI mode: one line per page.
struct StderrProgress;

impl Progress for StderrProgress {
    fn step(&mut self, done: usize, total: usize, label: &str) {
        eprintln!("  {}: page {}/{}", label, done, total);
    }
}

/// Fetch both catalog indexes and write their snapshots, then exit.
/// Invoked as `dexcache --fetch-index`.
async fn fetch_index() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let store = SnapshotStore::new(config.data_dir()?)?;
    let client = ApiClient::new(&config.api_base)?;
    let lister = BulkLister::with_options(
        client,
        ListerOptions {
            delay: Duration::from_millis(config.page_delay_ms),
        },
    );

    for (endpoint, target) in [
        ("pokemon", config.pokemon_count),
        ("ability", config.ability_count),
    ] {
        eprintln!("Fetching {} index ({} records)...", endpoint, target);
        let refs = lister
            .refresh_snapshot(endpoint, target, &store, &mut StderrProgress)
            .await?;
        eprintln!(
            "Wrote {} records to {}",
            refs.len(),
            store.path(endpoint).display()
        );
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
