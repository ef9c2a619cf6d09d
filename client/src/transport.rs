use std::time::Duration;

use charla_protocol::{ClientEvent, ServerEvent, SocketPacket, parse_server_event};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::connection::Connection;

/// What the transport task reports to the application
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The namespace connection was acknowledged
    Connected { sid: Option<String> },

    /// An event sent by the server
    Event(ServerEvent),

    /// The connection could not be established; nothing follows
    ConnectError { message: String },

    /// The connection ended; nothing follows
    Disconnected { reason: String },
}

/// Requests from a ChatHandle to the transport task
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Emit(ClientEvent),
    Disconnect,
}

/// Owns the connection for its whole life. Never reconnects.
pub(crate) async fn transport_loop(
    url: String,
    connect_timeout: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::Sender<TransportEvent>,
) {
    let (mut connection, sid) = match Connection::open(&url, connect_timeout).await {
        Ok(opened) => opened,
        Err(e) => {
            tracing::warn!(url = %url, error = %format!("{:#}", e), "Connection failed");
            let _ = events
                .send(TransportEvent::ConnectError {
                    message: format!("{:#}", e),
                })
                .await;
            return;
        }
    };

    tracing::info!(url = %url, sid = ?sid, "Connected");
    if events.send(TransportEvent::Connected { sid }).await.is_err() {
        let _ = connection.close().await;
        return;
    }

    let idle_timeout = connection.handshake().idle_timeout();

    let reason = loop {
        let idle_deadline = connection.last_seen() + idle_timeout;

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Emit(event)) => {
                    tracing::debug!(event = event.name(), "Emitting event");
                    if let Err(e) = connection.send(&event.to_packet()).await {
                        break format!("{:#}", e);
                    }
                }
                Some(Command::Disconnect) | None => {
                    if let Err(e) = connection.close().await {
                        tracing::debug!(error = %e, "Close handshake failed");
                    }
                    break "client disconnect".to_string();
                }
            },
            received = connection.recv() => match received {
                Err(e) => break format!("{:#}", e),
                Ok(None) => break "transport close".to_string(),
                Ok(Some(packet)) => {
                    if let Some(reason) = forward(packet, &events).await {
                        break reason;
                    }
                }
            },
            // Only frames from the server move the deadline, outbound
            // commands do not
            _ = sleep_until(idle_deadline) => {
                if connection.last_seen() + idle_timeout <= Instant::now() {
                    break "ping timeout".to_string();
                }
            },
        }
    };

    tracing::info!(reason = %reason, "Disconnected");
    let _ = events.send(TransportEvent::Disconnected { reason }).await;
}

/// Forward a packet to the application. Returns a reason when the
/// connection should end.
async fn forward(packet: SocketPacket, events: &mpsc::Sender<TransportEvent>) -> Option<String> {
    match packet {
        SocketPacket::Event { name, args, .. } => match parse_server_event(&name, args) {
            Ok(event) => {
                if events.send(TransportEvent::Event(event)).await.is_err() {
                    return Some("event receiver dropped".to_string());
                }
            }
            Err(e) => tracing::warn!(event = %name, error = %e, "Dropping malformed event"),
        },
        SocketPacket::Disconnect { namespace: None } => {
            return Some("server disconnect".to_string());
        }
        other => tracing::debug!(packet = ?other, "Ignoring packet"),
    }
    None
}
