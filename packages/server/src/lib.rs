//! Line-delimited JSON relay server.
//!
//! Clients connect over TCP and send one JSON record per line. Every accepted
//! record is stamped by the server, broadcast to the other connected clients
//! and appended to a JSON Lines history file.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
