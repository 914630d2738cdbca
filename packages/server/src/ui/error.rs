//! Server bootstrap errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound (fatal at startup)
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
