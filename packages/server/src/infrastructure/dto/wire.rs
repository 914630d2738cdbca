//! Wire record exchanged over the connection and persisted in the history log.

use serde::{Deserialize, Serialize};

/// `type` value of a chat message
pub const TYPE_MESSAGE: &str = "message";
/// `type` value of a server notice
pub const TYPE_SYSTEM: &str = "system";

/// One line of the wire protocol
///
/// All fields are optional on input. Records produced by the server always
/// carry every field, records produced by the client omit `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl WireMessage {
    /// Build a client-originated chat record (no timestamp)
    pub fn outgoing_chat(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            r#type: Some(TYPE_MESSAGE.to_string()),
            from: Some(from.into()),
            text: Some(text.into()),
            timestamp: None,
        }
    }

    pub fn is_system(&self) -> bool {
        self.r#type.as_deref() == Some(TYPE_SYSTEM)
    }
}
