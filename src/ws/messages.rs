//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server-originated message with the current timestamp.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send in a `command` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for specific instances.
    Subscribe {
        /// `"interface/instance"` names. Use `["*"]` for all instances.
        instances: Vec<String>,
    },
    /// Unsubscribe from events for specific instances.
    Unsubscribe {
        /// `"interface/instance"` names.
        instances: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_command_parses() {
        let json = serde_json::json!({"command": "subscribe", "instances": ["IFoo/default", "*"]});
        let parsed = serde_json::from_value::<WsCommand>(json);
        assert!(matches!(parsed, Ok(WsCommand::Subscribe { instances }) if instances.len() == 2));
    }

    #[test]
    fn unknown_command_fails() {
        let json = serde_json::json!({"command": "swap"});
        assert!(serde_json::from_value::<WsCommand>(json).is_err());
    }
}
