//! Print the relay server's history log in a human-readable form.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin linecast-history
//! cargo run --bin linecast-history -- --file logs/history.log
//! ```

use std::path::PathBuf;

use clap::Parser;

use linecast_client::history::view_history;
use linecast_server::config::DEFAULT_HISTORY_FILE;
use linecast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "linecast-history")]
#[command(about = "Print the Linecast history log", long_about = None)]
struct Args {
    /// JSON Lines history file written by the server
    #[arg(short = 'f', long, default_value = DEFAULT_HISTORY_FILE)]
    file: PathBuf,
}

fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = view_history(&args.file) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
