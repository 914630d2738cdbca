//! Shared utilities for the Linecast server and client binaries.

pub mod logger;
pub mod time;
