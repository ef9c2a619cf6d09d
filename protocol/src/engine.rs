//! Engine.IO v4 packets
//!
//! Every websocket text frame carries exactly one Engine.IO packet: a single
//! digit packet type followed by an optional payload.

use crate::ParseError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Handshake data sent by the server in the OPEN packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,

    #[serde(default)]
    pub upgrades: Vec<String>,

    /// Milliseconds between server pings
    pub ping_interval: u64,

    /// Milliseconds the server waits for a pong
    pub ping_timeout: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// Longest silence tolerated before the connection is considered dead.
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ping_interval + self.ping_timeout)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    /// 0{handshake}
    Open(Handshake),
    /// 1
    Close,
    /// 2[probe]
    Ping(String),
    /// 3[probe]
    Pong(String),
    /// 4PAYLOAD, a Socket.IO packet
    Message(String),
    /// 5
    Upgrade,
    /// 6
    Noop,
}

impl EnginePacket {
    /// Parse a websocket text frame into an Engine.IO packet
    pub fn parse(frame: &str) -> Result<Self> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(ParseError::EmptyMessage)?;
        let data = chars.as_str();

        match kind {
            '0' => {
                let handshake: Handshake = serde_json::from_str(data).map_err(|e| {
                    ParseError::InvalidFormat(format!("invalid open handshake: {}", e))
                })?;
                Ok(Self::Open(handshake))
            }
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(data.to_string())),
            '3' => Ok(Self::Pong(data.to_string())),
            '4' => Ok(Self::Message(data.to_string())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            'b' => Err(ParseError::Unsupported("base64 binary payload".to_string()).into()),
            other => Err(ParseError::UnknownPacketType(other).into()),
        }
    }

    /// Serialize to the websocket text frame
    pub fn to_wire_format(&self) -> String {
        match self {
            // Handshake is plain data, serialization cannot fail
            Self::Open(handshake) => format!(
                "0{}",
                serde_json::to_string(handshake).unwrap_or_default()
            ),
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{}", data),
            Self::Pong(data) => format!("3{}", data),
            Self::Message(payload) => format!("4{}", payload),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let packet = EnginePacket::parse(frame).unwrap();

        let EnginePacket::Open(handshake) = packet else {
            panic!("expected open packet, got {:?}", packet);
        };
        assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(handshake.ping_interval, 25000);
        assert_eq!(handshake.max_payload, Some(1_000_000));
        assert_eq!(handshake.idle_timeout().as_secs(), 45);
    }

    #[test]
    fn test_parse_open_invalid() {
        assert!(EnginePacket::parse("0{not json").is_err());
    }

    #[test]
    fn test_parse_ping_and_pong() {
        assert_eq!(EnginePacket::parse("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(
            EnginePacket::parse("3probe").unwrap(),
            EnginePacket::Pong("probe".to_string())
        );
    }

    #[test]
    fn test_parse_message_keeps_payload() {
        let packet = EnginePacket::parse(r#"42["message",{"message":"hola"}]"#).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(r#"2["message",{"message":"hola"}]"#.to_string())
        );
    }

    #[test]
    fn test_parse_empty() {
        let err = EnginePacket::parse("").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::EmptyMessage)
        ));
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = EnginePacket::parse("9").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParseError>(),
            Some(ParseError::UnknownPacketType('9'))
        ));
    }

    #[test]
    fn test_pong_answers_ping_payload() {
        let EnginePacket::Ping(data) = EnginePacket::parse("2probe").unwrap() else {
            panic!("expected ping");
        };
        assert_eq!(EnginePacket::Pong(data).to_wire_format(), "3probe");
    }
}
