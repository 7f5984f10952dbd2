//! Termtask document store server.
//!
//! An axum WebSocket server holding named document collections for Termtask
//! clients. Each binary frame carries one store request (list-all, create,
//! set, delete) and is answered with one response on the same socket.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:7070
//! cargo run --bin termtask-store
//!
//! # Run on custom address
//! cargo run --bin termtask-store -- --bind 127.0.0.1:8080
//!
//! # Or via environment variable
//! STORE_ADDR=127.0.0.1:8080 cargo run --bin termtask-store
//! ```

use std::sync::Arc;

use clap::Parser;

use termtask_store::config::{StoreCliArgs, StoreConfig};
use termtask_store::server::{self, StoreState};

#[tokio::main]
async fn main() {
    let cli = StoreCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match StoreConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting termtask store server");

    let state = Arc::new(StoreState::new());

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "store server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "store server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start store server");
            std::process::exit(1);
        }
    }
}
