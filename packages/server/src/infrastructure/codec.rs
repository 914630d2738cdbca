//! Line codec for the wire protocol.
//!
//! One JSON object per line. JSON string escaping keeps embedded newlines and
//! control characters inside the record, so a payload can never break framing.

use serde_json::Value;

use crate::domain::{CodecError, DecodedMessage, Message};

use super::dto::wire::WireMessage;

/// Encode a stamped message as a single `\n`-terminated line
pub fn encode(message: &Message) -> Result<String, CodecError> {
    encode_wire(&WireMessage::from(message))
}

/// Encode any wire record as a single `\n`-terminated line
pub fn encode_wire(record: &WireMessage) -> Result<String, CodecError> {
    let mut line =
        serde_json::to_string(record).map_err(|e| CodecError::Encode(e.to_string()))?;
    line.push('\n');
    Ok(line)
}

/// Decode one line into a [`DecodedMessage`]
///
/// Never panics. Anything that is not a JSON object whose known fields are
/// strings (or null) is reported as [`CodecError::Malformed`].
pub fn decode(line: &str) -> Result<DecodedMessage, CodecError> {
    decode_wire(line).map(DecodedMessage::from)
}

/// Decode one raw line as received from a socket
///
/// Bytes that are not valid UTF-8 are malformed like any other unparseable line.
pub fn decode_bytes(line: &[u8]) -> Result<DecodedMessage, CodecError> {
    let line = std::str::from_utf8(line).map_err(|e| CodecError::Malformed(e.to_string()))?;
    decode(line)
}

/// Decode one line into the raw wire record
pub fn decode_wire(line: &str) -> Result<WireMessage, CodecError> {
    let value: Value =
        serde_json::from_str(line.trim()).map_err(|e| CodecError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(CodecError::Malformed("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| CodecError::Malformed(e.to_string()))
}
