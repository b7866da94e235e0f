//! Eventboard server binary.
//!
//! Wires together configuration, seed data, the shared board, and the
//! HTTP/`WebSocket` API, then serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `eventboard-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load seed data into a fresh store, if configured
//! 4. Create the board and its change notifier
//! 5. Serve until a shutdown signal
//! 6. Tear the board down and log what it held

mod error;

use std::sync::Arc;

use eventboard_api::{AppState, ServerConfig};
use eventboard_core::config::LoggingConfig;
use eventboard_core::{Board, BoardConfig, load_seed};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServerBinError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, seeding, or serving fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

async fn run() -> Result<(), ServerBinError> {
    // 1. Load configuration.
    let config_path = BoardConfig::default_path();
    let config = BoardConfig::load(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = %config_path.display(),
        host = %config.server.host,
        port = config.server.port,
        channel_capacity = config.notifier.channel_capacity,
        "eventboard-server starting"
    );

    // 3-4. Load seed data and create the board.
    let capacity = config.notifier.channel_capacity;
    let board = match &config.seed.path {
        Some(path) => Board::with_store(load_seed(path)?, capacity),
        None => {
            info!("No seed file configured, starting empty");
            Board::new(capacity)
        }
    };
    let board = Arc::new(board);

    // 5. Serve.
    let server_config = ServerConfig::from(&config.server);
    eventboard_api::start_server(&server_config, AppState::new(Arc::clone(&board))).await?;

    // 6. Tear down.
    let counts = board.teardown().await;
    info!(
        users = counts.users,
        locations = counts.locations,
        events = counts.events,
        participants = counts.participants,
        "eventboard-server stopped"
    );
    Ok(())
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
