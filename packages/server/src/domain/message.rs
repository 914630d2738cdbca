//! Message model.
//!
//! A [`Message`] always carries a server-assigned [`Timestamp`]. Input decoded
//! from the wire is a [`DecodedMessage`] and only becomes a `Message` through
//! [`DecodedMessage::normalize`], which stamps it.

use std::fmt;

use chrono::{DateTime, Utc};
use linecast_shared::time::{Clock, to_iso8601_utc};

/// Sender used for messages originated by the server itself.
pub const SERVER_SENDER: &str = "server";

/// Kind of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    /// Message sent by a client
    #[default]
    Chat,
    /// Notice generated by the server (join / leave)
    System,
}

/// Server-assigned point in time (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Read the current time from the given clock
    pub fn now(clock: &dyn Clock) -> Self {
        Self(clock.now_utc())
    }

    /// ISO-8601 UTC representation used on the wire and in the history log
    pub fn to_iso8601(&self) -> String {
        to_iso8601_utc(&self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// A stamped message, ready to be broadcast and logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub sender: String,
    pub body: String,
    pub timestamp: Timestamp,
}

impl Message {
    /// Build a system notice sent by the server
    pub fn system(body: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::System,
            sender: SERVER_SENDER.to_string(),
            body: body.into(),
            timestamp,
        }
    }

    /// Build a chat message
    pub fn chat(sender: impl Into<String>, body: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::Chat,
            sender: sender.into(),
            body: body.into(),
            timestamp,
        }
    }
}

/// A message as decoded from a wire line, before the server stamps it
///
/// Missing fields are `None`. Any client-supplied timestamp is dropped by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedMessage {
    pub kind: Option<MessageKind>,
    pub sender: Option<String>,
    pub body: Option<String>,
}

impl DecodedMessage {
    /// Apply defaults and stamp the message with the server time.
    ///
    /// # Arguments
    ///
    /// * `fallback_sender` - sender used when the line carried none (the peer address)
    /// * `timestamp` - server time at which the message was accepted
    pub fn normalize(self, fallback_sender: &str, timestamp: Timestamp) -> Message {
        Message {
            kind: self.kind.unwrap_or_default(),
            sender: self
                .sender
                .unwrap_or_else(|| fallback_sender.to_string()),
            body: self.body.unwrap_or_default(),
            timestamp,
        }
    }
}
