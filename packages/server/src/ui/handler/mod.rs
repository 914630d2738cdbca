//! Connection handlers.

pub mod connection;

pub use connection::{CloseReason, ConnectionState, handle_connection};
