//! Conversion logic between DTOs and domain entities.

use crate::domain::{DecodedMessage, Message, MessageKind};

use super::wire::{TYPE_MESSAGE, TYPE_SYSTEM, WireMessage};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<WireMessage> for DecodedMessage {
    fn from(dto: WireMessage) -> Self {
        Self {
            kind: dto.r#type.map(|value| match value.as_str() {
                TYPE_SYSTEM => MessageKind::System,
                _ => MessageKind::Chat,
            }),
            sender: dto.from,
            body: dto.text,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Message> for WireMessage {
    fn from(model: &Message) -> Self {
        let r#type = match model.kind {
            MessageKind::Chat => TYPE_MESSAGE,
            MessageKind::System => TYPE_SYSTEM,
        };
        Self {
            r#type: Some(r#type.to_string()),
            from: Some(model.sender.clone()),
            text: Some(model.body.clone()),
            timestamp: Some(model.timestamp.to_iso8601()),
        }
    }
}
