//! Domain error types.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Wire codec failure
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not a JSON object, or a field has the wrong JSON type
    #[error("Malformed wire line: {0}")]
    Malformed(String),

    /// Serialization failed
    #[error("Failed to encode message: {0}")]
    Encode(String),
}

/// Writing to one peer failed
#[derive(Debug, Error)]
pub enum PeerWriteError {
    /// I/O error on the peer connection
    #[error("Write to peer failed: {0}")]
    Io(#[from] std::io::Error),

    /// The write did not complete in time
    #[error("Write to peer timed out after {0:?}")]
    Timeout(Duration),

    /// The outbound half was already released
    #[error("Peer connection is already closed")]
    Closed,
}

/// Appending to the history log failed
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Encode(#[from] CodecError),

    #[error("Failed to create history directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open history file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write history file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
