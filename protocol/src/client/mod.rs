use serde_json::json;

use crate::engine::EnginePacket;
use crate::socket::SocketPacket;

/// Events that clients can send to the server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// join {username}
    Join { username: String },

    /// message {message}
    Message { message: String },

    /// request_user_list, no payload
    RequestUserList,
}

impl ClientEvent {
    /// Socket.IO event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Message { .. } => "message",
            Self::RequestUserList => "request_user_list",
        }
    }

    /// Build the Socket.IO EVENT packet for this event
    pub fn to_packet(&self) -> SocketPacket {
        let args = match self {
            Self::Join { username } => vec![json!({ "username": username })],
            Self::Message { message } => vec![json!({ "message": message })],
            Self::RequestUserList => Vec::new(),
        };
        SocketPacket::event(self.name(), args)
    }

    /// Serialize to a websocket text frame: 42["NAME",{...}]
    pub fn to_wire_format(&self) -> String {
        EnginePacket::Message(self.to_packet().to_wire_format()).to_wire_format()
    }
}
