//! Message formatting for the client display and the history viewer.
//!
//! Both render records the same way:
//!
//! ```text
//! [2024-05-01T12:00:00.123456Z] [SYSTEM] 127.0.0.1:50000 joined
//! [2024-05-01T12:00:01.000000Z] <alice> hello
//! ```
//!
//! Lines that are not JSON objects are returned verbatim.

use serde_json::{Map, Value};

use linecast_server::infrastructure::dto::wire::{TYPE_MESSAGE, TYPE_SYSTEM};

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one received or persisted line
    ///
    /// # Arguments
    ///
    /// * `line` - The raw line (without trailing newline)
    ///
    /// # Returns
    ///
    /// The rendered record, or the line itself when it cannot be parsed
    pub fn format_line(line: &str) -> String {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => Self::format_record(&record),
            _ => line.to_string(),
        }
    }

    /// Format a parsed record, applying display defaults for missing fields
    pub fn format_record(record: &Map<String, Value>) -> String {
        let kind = field(record, "type", TYPE_MESSAGE);
        let from = field(record, "from", "unknown");
        let text = field(record, "text", "");
        let timestamp = field(record, "timestamp", "");

        if kind == TYPE_SYSTEM {
            format!("[{}] [SYSTEM] {}", timestamp, text)
        } else {
            format!("[{}] <{}> {}", timestamp, from, text)
        }
    }
}

fn field(record: &Map<String, Value>, key: &str, default: &str) -> String {
    match record.get(key) {
        Some(Value::String(value)) => value.clone(),
        None | Some(Value::Null) => default.to_string(),
        Some(other) => other.to_string(),
    }
}
