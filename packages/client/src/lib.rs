//! Terminal collaborators of the Linecast relay server.
//!
//! - an interactive client speaking the line protocol
//! - an offline viewer for the JSON Lines history file

pub mod error;
pub mod formatter;
pub mod history;
pub mod session;
mod ui;
