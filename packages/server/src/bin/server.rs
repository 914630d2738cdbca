//! Line-delimited JSON relay server.
//!
//! Relays every message a client sends to all other connected clients and
//! appends it to a JSON Lines history file.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linecast-server
//! cargo run --bin linecast-server -- --host 127.0.0.1 --port 3000 --history-file logs/history.log
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use linecast_server::{
    config::{
        DEFAULT_HISTORY_FILE, DEFAULT_HOST, DEFAULT_MAX_LINE_LENGTH, DEFAULT_PORT,
        DEFAULT_SHUTDOWN_GRACE_MS, DEFAULT_WRITE_TIMEOUT_MS, ServerConfig,
    },
    infrastructure::repository::{InMemoryPeerRegistry, JsonLinesHistoryLog},
    ui::{AppState, Server},
};
use linecast_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "linecast-server")]
#[command(about = "Line-delimited JSON relay server with a durable history log", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// JSON Lines file every relayed message is appended to
    #[arg(short = 'f', long, default_value = DEFAULT_HISTORY_FILE)]
    history_file: PathBuf,

    /// Timeout for a single write to one client, in milliseconds
    #[arg(long, default_value_t = DEFAULT_WRITE_TIMEOUT_MS)]
    write_timeout_ms: u64,

    /// Longest accepted line in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// How long to wait for open connections on shutdown, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SHUTDOWN_GRACE_MS)]
    shutdown_grace_ms: u64,

    /// Serialize every broadcast + history append so all clients and the log see one global order
    #[arg(long)]
    strict_order: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            history_file: args.history_file,
            write_timeout: Duration::from_millis(args.write_timeout_ms),
            max_line_length: args.max_line_length,
            shutdown_grace: Duration::from_millis(args.shutdown_grace_ms),
            strict_order: args.strict_order,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Repositories (registry + history log)
    // 2. UseCases (wired inside AppState)
    // 3. Server
    let registry = Arc::new(InMemoryPeerRegistry::new());
    let history = Arc::new(JsonLinesHistoryLog::new(&config.history_file));
    tracing::info!("Appending history to {}", history.path().display());

    let state = Arc::new(AppState::new(
        &config,
        registry,
        history,
        Arc::new(SystemClock),
    ));

    let server = Server::new(state, config.shutdown_grace);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
