//! Error types for the client and the history viewer.

use std::path::PathBuf;

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Unable to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the terminal failed
    #[error("Input error: {0}")]
    Input(String),

    /// Reading the history file failed
    #[error("Failed to read history file '{}': {source}", .path.display())]
    History {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
