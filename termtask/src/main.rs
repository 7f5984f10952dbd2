//! Termtask — terminal-native task list manager.
//!
//! Launches the TUI and connects to a document store server for task
//! persistence. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/termtask/config.toml`).
//!
//! ```bash
//! # In-memory local mode
//! cargo run --bin termtask
//!
//! # Against a store server
//! cargo run --bin termtask -- --store-url ws://127.0.0.1:7070/ws
//!
//! # Or via environment variable
//! TERMTASK_STORE_URL=ws://127.0.0.1:7070/ws cargo run --bin termtask
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use termtask::app::App;
use termtask::config::{CliArgs, ClientConfig};
use termtask::gateway::memory::MemoryStore;
use termtask::gateway::remote::RemoteStore;
use termtask::sync::{StoreCommand, StoreEvent, spawn_sync};
use termtask::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("termtask starting");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("termtask exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown to
/// ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("termtask.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new().with_timestamp_format(config.timestamp_format.clone());

    let (cmd_tx, mut evt_rx) = connect_store(&mut app, config).await;

    // Initial load: fires exactly once per startup.
    let _ = cmd_tx.try_send(StoreCommand::FetchAll);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending store events (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            app.apply_store_event(event);
        }

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(StoreCommand) when a user action
            // requires a store round-trip (add, edit, delete, fetch).
            if let Some(cmd) = app.handle_key_event(key) {
                match cmd_tx.try_send(cmd) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        app.set_status("Store busy — action dropped");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        app.set_status("Store task stopped");
                    }
                }
            }
        }

        if app.should_quit {
            // Send shutdown command to the store task.
            let _ = cmd_tx.try_send(StoreCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Connect the store gateway and spawn the sync layer.
///
/// Prefers the configured remote store; any connect failure (or no URL at
/// all) falls back to an in-memory store so the UI stays usable, with a
/// status message saying tasks are not persisted.
async fn connect_store(
    app: &mut App,
    config: &ClientConfig,
) -> (mpsc::Sender<StoreCommand>, mpsc::Receiver<StoreEvent>) {
    match config.parse_store_url() {
        Ok(Some(url)) => {
            match RemoteStore::connect(url.as_str(), config.connect_timeout, config.request_timeout)
                .await
            {
                Ok(gateway) => {
                    app.set_connection_status(true, "Remote");
                    return spawn_sync(gateway, config.collection.clone(), config.channel_capacity);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "store connection failed");
                    app.set_connection_status(false, "Local");
                    app.set_status(format!(
                        "Could not reach store — running in local mode ({e})"
                    ));
                }
            }
        }
        Ok(None) => {
            app.set_connection_status(false, "Local");
            app.set_status("No store configured — tasks live in memory only");
        }
        Err(e) => {
            tracing::warn!(error = %e, "invalid store URL");
            app.set_connection_status(false, "Local");
            app.set_status(format!("Invalid store URL — running in local mode ({e})"));
        }
    }

    spawn_sync(
        MemoryStore::new(),
        config.collection.clone(),
        config.channel_capacity,
    )
}
