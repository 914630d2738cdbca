//! Data Transfer Objects for the wire protocol and the history log.

pub mod conversion;
pub mod wire;
