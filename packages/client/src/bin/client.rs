//! Interactive terminal client for the Linecast relay server.
//!
//! Sends each line typed on stdin as a chat message and prints every message
//! the server relays.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linecast-client -- --name Alice
//! cargo run --bin linecast-client -- -H 192.168.0.10 -p 9999
//! ```

use clap::Parser;

use linecast_client::session::{normalize_name, prompt_name, run_client_session};
use linecast_server::config::DEFAULT_PORT;
use linecast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "linecast-client")]
#[command(about = "Interactive client for the Linecast relay server", long_about = None)]
struct Args {
    /// Server host to connect to
    #[arg(short = 'H', long, default_value = "localhost")]
    host: String,

    /// Server port to connect to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Display name attached to your messages (asked interactively when omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let name = match args.name {
        Some(name) => normalize_name(&name),
        None => match prompt_name().await {
            Ok(name) => name,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = run_client_session(&args.host, args.port, name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
