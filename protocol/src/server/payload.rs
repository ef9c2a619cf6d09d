//! Inbound event payloads
//!
//! Fields the server leaves out default to empty values; a payload is only
//! rejected when its JSON shape is wrong.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::Timestamp;

/// Confirmation that the local client joined the chat
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Joined {
    pub username: String,

    /// Identifier the server uses for this connection
    pub session_id: String,
}

/// A chat message broadcast by the server
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub username: String,
    pub message: String,

    /// Session of the sender, compared against our own to mark own messages
    pub session_id: String,

    pub timestamp: Option<Timestamp>,
}

/// One entry of the connected users list
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct UserEntry {
    pub username: String,
    pub session_id: Option<String>,

    /// Any other fields the server attaches
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Join or leave notification for another user
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Presence {
    pub username: String,
    pub timestamp: Option<Timestamp>,
}

/// Server-reported error
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ErrorNotice {
    pub message: Option<String>,
}
