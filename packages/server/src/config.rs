//! Server configuration.

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9999;
pub const DEFAULT_HISTORY_FILE: &str = "history.log";
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5_000;

/// Runtime configuration of the relay server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to bind to
    pub port: u16,
    /// Path of the JSON Lines history file
    pub history_file: PathBuf,
    /// Upper bound for a single write to one peer
    pub write_timeout: Duration,
    /// Longest accepted wire line in bytes; a longer line closes the connection
    pub max_line_length: usize,
    /// How long shutdown waits for open connections to close
    pub shutdown_grace: Duration,
    /// Funnel every broadcast + history append through one lock
    pub strict_order: bool,
}

impl ServerConfig {
    /// `host:port` string passed to the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            shutdown_grace: Duration::from_millis(DEFAULT_SHUTDOWN_GRACE_MS),
            strict_order: false,
        }
    }
}
