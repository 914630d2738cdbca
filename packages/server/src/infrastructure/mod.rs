//! Infrastructure layer: wire format, history file, registry and socket sinks.

pub mod codec;
pub mod dto;
pub mod message_pusher;
pub mod repository;
