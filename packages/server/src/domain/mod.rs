//! Domain layer: message model, peer model and the traits the outer layers implement.

pub mod error;
pub mod message;
pub mod peer;
pub mod pusher;
pub mod repository;

pub use error::{CodecError, HistoryError, PeerWriteError};
pub use message::{DecodedMessage, Message, MessageKind, SERVER_SENDER, Timestamp};
pub use peer::{PeerAddr, PeerHandle, PeerId};
pub use pusher::PeerSink;
pub use repository::{HistoryStore, PeerRegistry};

#[cfg(test)]
pub use repository::MockHistoryStore;
