use thiserror::Error;

pub mod client;
pub mod endpoint;
pub mod engine;
pub mod server;
pub mod socket;

pub use client::ClientEvent;
pub use endpoint::socket_io_url;
pub use engine::{EnginePacket, Handshake};
pub use server::{
    ChatMessage, ErrorNotice, Joined, Presence, ServerEvent, Timestamp, UserEntry,
    parse_server_event,
};
pub use socket::SocketPacket;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,

    #[error("Unknown packet type: {0}")]
    UnknownPacketType(char),

    #[error("Unsupported packet: {0}")]
    Unsupported(String),
}
