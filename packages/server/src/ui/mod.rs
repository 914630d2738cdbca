//! TCP relay server: accept loop and per-connection handlers.

pub mod error;
pub mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::Server;
pub use signal::shutdown_signal;
pub use state::AppState;
