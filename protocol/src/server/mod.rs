mod payload;
mod tests;
mod timestamp;

use crate::ParseError;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use payload::{ChatMessage, ErrorNotice, Joined, Presence, UserEntry};
pub use timestamp::Timestamp;

/// Events the server sends to clients
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Joined(Joined),
    Message(ChatMessage),
    UserList(Vec<UserEntry>),
    UserJoined(Presence),
    UserLeft(Presence),
    Error(ErrorNotice),
    Unknown { name: String, args: Vec<Value> },
}

/// Parse a Socket.IO event name and its arguments into a ServerEvent
pub fn parse_server_event(name: &str, args: Vec<Value>) -> Result<ServerEvent> {
    match name {
        "joined" => Ok(ServerEvent::Joined(parse_record(name, first(args))?)),
        "message" => Ok(ServerEvent::Message(parse_record(name, first(args))?)),
        "user_list" => parse_user_list(first(args)),
        "user_joined" => Ok(ServerEvent::UserJoined(parse_record(name, first(args))?)),
        "user_left" => Ok(ServerEvent::UserLeft(parse_record(name, first(args))?)),
        "error" => Ok(ServerEvent::Error(parse_error(first(args)))),
        _ => Ok(ServerEvent::Unknown {
            name: name.to_string(),
            args,
        }),
    }
}

fn first(args: Vec<Value>) -> Option<Value> {
    args.into_iter().next()
}

fn parse_record<T: DeserializeOwned + Default>(event: &str, payload: Option<Value>) -> Result<T> {
    match payload {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|e| {
            ParseError::InvalidFormat(format!("invalid {} payload: {}", event, e)).into()
        }),
        Some(other) => Err(ParseError::InvalidFormat(format!(
            "{} payload must be an object, got {}",
            event, other
        ))
        .into()),
    }
}

fn parse_user_list(payload: Option<Value>) -> Result<ServerEvent> {
    match payload {
        Some(value @ Value::Array(_)) => {
            let users: Vec<UserEntry> = serde_json::from_value(value).map_err(|e| {
                ParseError::InvalidFormat(format!("invalid user_list payload: {}", e))
            })?;
            Ok(ServerEvent::UserList(users))
        }
        Some(other) => Err(ParseError::InvalidFormat(format!(
            "user_list payload must be an array, got {}",
            other
        ))
        .into()),
        None => Err(ParseError::MissingField("user_list payload".to_string()).into()),
    }
}

// Error payloads come as {"message": ...}, a bare string, or nothing at all
fn parse_error(payload: Option<Value>) -> ErrorNotice {
    match payload {
        Some(Value::String(message)) => ErrorNotice {
            message: Some(message),
        },
        Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => ErrorNotice::default(),
    }
}
