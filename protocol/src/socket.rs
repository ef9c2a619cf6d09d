//! Socket.IO v5 packets, carried inside Engine.IO MESSAGE packets.
//!
//! Layout: `TYPE[/NAMESPACE,][ACK_ID][JSON]`

use crate::ParseError;
use anyhow::Result;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// 0[{"sid":...}]
    Connect {
        namespace: Option<String>,
        data: Option<Value>,
    },

    /// 1
    Disconnect { namespace: Option<String> },

    /// 2["name",...args]
    Event {
        namespace: Option<String>,
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },

    /// 3ID[...args]
    Ack {
        namespace: Option<String>,
        id: u64,
        args: Vec<Value>,
    },

    /// 4{"message":...}
    ConnectError {
        namespace: Option<String>,
        message: String,
    },
}

impl SocketPacket {
    /// Connect request for the default namespace
    pub fn connect() -> Self {
        Self::Connect {
            namespace: None,
            data: None,
        }
    }

    /// Disconnect from the default namespace
    pub fn disconnect() -> Self {
        Self::Disconnect { namespace: None }
    }

    /// Event on the default namespace without acknowledgement
    pub fn event(name: &str, args: Vec<Value>) -> Self {
        Self::Event {
            namespace: None,
            id: None,
            name: name.to_string(),
            args,
        }
    }

    /// Parse the payload of an Engine.IO MESSAGE packet
    pub fn parse(payload: &str) -> Result<Self> {
        let mut chars = payload.chars();
        let kind = chars.next().ok_or(ParseError::EmptyMessage)?;
        let rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(ParseError::Unsupported("binary socket.io packet".to_string()).into());
        }

        let (namespace, rest) = split_namespace(rest);

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (id_str, data) = rest.split_at(digits);
        let id = if id_str.is_empty() {
            None
        } else {
            Some(
                id_str
                    .parse::<u64>()
                    .map_err(|_| ParseError::InvalidFormat(format!("invalid ack id: {}", id_str)))?,
            )
        };

        match kind {
            '0' => Ok(Self::Connect {
                namespace,
                data: parse_optional_json(data)?,
            }),
            '1' => Ok(Self::Disconnect { namespace }),
            '2' => {
                let mut args = parse_array(data)?;
                if args.is_empty() {
                    return Err(ParseError::MissingField("event name".to_string()).into());
                }
                let name = match args.remove(0) {
                    Value::String(name) => name,
                    other => {
                        return Err(ParseError::InvalidFormat(format!(
                            "event name must be a string, got {}",
                            other
                        ))
                        .into());
                    }
                };
                Ok(Self::Event {
                    namespace,
                    id,
                    name,
                    args,
                })
            }
            '3' => {
                let id = id.ok_or_else(|| ParseError::MissingField("ack id".to_string()))?;
                Ok(Self::Ack {
                    namespace,
                    id,
                    args: parse_array(data)?,
                })
            }
            '4' => Ok(Self::ConnectError {
                namespace,
                message: parse_connect_error(data)?,
            }),
            other => Err(ParseError::UnknownPacketType(other).into()),
        }
    }

    /// Serialize to the payload of an Engine.IO MESSAGE packet
    pub fn to_wire_format(&self) -> String {
        match self {
            Self::Connect { namespace, data } => {
                let mut out = header('0', namespace.as_deref(), None);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
            Self::Disconnect { namespace } => header('1', namespace.as_deref(), None),
            Self::Event {
                namespace,
                id,
                name,
                args,
            } => {
                let mut out = header('2', namespace.as_deref(), *id);
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                out.push_str(&Value::Array(items).to_string());
                out
            }
            Self::Ack {
                namespace,
                id,
                args,
            } => {
                let mut out = header('3', namespace.as_deref(), Some(*id));
                out.push_str(&Value::Array(args.clone()).to_string());
                out
            }
            Self::ConnectError { namespace, message } => {
                let mut out = header('4', namespace.as_deref(), None);
                out.push_str(&serde_json::json!({ "message": message }).to_string());
                out
            }
        }
    }
}

fn header(kind: char, namespace: Option<&str>, id: Option<u64>) -> String {
    let mut out = String::new();
    out.push(kind);
    if let Some(namespace) = namespace {
        out.push_str(namespace);
        out.push(',');
    }
    if let Some(id) = id {
        out.push_str(&id.to_string());
    }
    out
}

/// The default namespace "/" is reported as None
fn split_namespace(rest: &str) -> (Option<String>, &str) {
    if !rest.starts_with('/') {
        return (None, rest);
    }

    let (namespace, tail) = rest.split_once(',').unwrap_or((rest, ""));
    if namespace == "/" {
        (None, tail)
    } else {
        (Some(namespace.to_string()), tail)
    }
}

fn parse_optional_json(data: &str) -> Result<Option<Value>> {
    if data.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(data)
        .map_err(|e| ParseError::InvalidFormat(format!("invalid packet json: {}", e)))?;
    Ok(Some(value))
}

fn parse_array(data: &str) -> Result<Vec<Value>> {
    match parse_optional_json(data)? {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ParseError::InvalidFormat(format!("expected json array, got {}", other)).into()),
        None => Err(ParseError::MissingField("packet data".to_string()).into()),
    }
}

// Servers send either {"message": "..."} or, on older versions, a bare string
fn parse_connect_error(data: &str) -> Result<String> {
    let message = match parse_optional_json(data)? {
        Some(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(message)) => message,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    Ok(message)
}
