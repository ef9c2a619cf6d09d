use anyhow::{Context, Result};
use charla_protocol::{EnginePacket, Handshake, SocketPacket};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::{Duration, Instant, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Socket.IO session on the default namespace, over one websocket
pub struct Connection {
    ws: WsStream,
    handshake: Handshake,

    /// When the server last sent anything, heartbeats included
    last_seen: Instant,
}

impl Connection {
    /// Open the websocket and join the default namespace, giving up after
    /// `deadline`.
    ///
    /// Returns the connection together with the namespace session id, when
    /// the server sends one.
    pub async fn open(url: &str, deadline: Duration) -> Result<(Self, Option<String>)> {
        match timeout(deadline, Self::establish(url)).await {
            Ok(opened) => opened,
            Err(_) => Err(ClientError::Handshake(format!(
                "no answer from {} within {}ms",
                url,
                deadline.as_millis()
            ))
            .into()),
        }
    }

    async fn establish(url: &str) -> Result<(Self, Option<String>)> {
        let (mut ws, _response) = connect_async(url)
            .await
            .map_err(ClientError::from)
            .with_context(|| format!("Failed to connect to {}", url))?;

        let handshake = Self::read_handshake(&mut ws).await?;
        tracing::debug!(
            sid = %handshake.sid,
            ping_interval = handshake.ping_interval,
            ping_timeout = handshake.ping_timeout,
            "Engine.IO handshake"
        );

        let mut connection = Self {
            ws,
            handshake,
            last_seen: Instant::now(),
        };
        connection.send(&SocketPacket::connect()).await?;
        let sid = connection.await_namespace().await?;

        Ok((connection, sid))
    }

    async fn read_handshake(ws: &mut WsStream) -> Result<Handshake> {
        while let Some(message) = ws.next().await {
            let message = message.map_err(ClientError::from)?;

            match message {
                Message::Text(text) => match EnginePacket::parse(&text)? {
                    EnginePacket::Open(handshake) => return Ok(handshake),
                    other => tracing::debug!(packet = ?other, "Ignoring packet before open"),
                },
                Message::Ping(data) => ws.send(Message::Pong(data)).await?,
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(ClientError::Handshake("connection closed before open packet".to_string()).into())
    }

    async fn await_namespace(&mut self) -> Result<Option<String>> {
        while let Some(packet) = self.recv().await? {
            match packet {
                SocketPacket::Connect {
                    namespace: None,
                    data,
                } => {
                    let sid = data
                        .as_ref()
                        .and_then(|data| data.get("sid"))
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    return Ok(sid);
                }
                SocketPacket::ConnectError { message, .. } => {
                    return Err(ClientError::Rejected(message).into());
                }
                other => tracing::debug!(packet = ?other, "Ignoring packet before namespace connect"),
            }
        }

        Err(ClientError::Handshake("connection closed before namespace connect".to_string()).into())
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    /// Receive the next Socket.IO packet. Returns None once the server closes.
    ///
    /// Engine.IO heartbeats are answered here and malformed frames are
    /// dropped, so callers only see packets.
    pub async fn recv(&mut self) -> Result<Option<SocketPacket>> {
        while let Some(message) = self.ws.next().await {
            let message = message.map_err(ClientError::from)?;
            self.last_seen = Instant::now();

            let text = match message {
                Message::Text(text) => text,
                Message::Ping(data) => {
                    self.ws
                        .send(Message::Pong(data))
                        .await
                        .context("Failed to send pong")?;
                    continue;
                }
                Message::Close(_) => return Ok(None),
                _ => continue,
            };

            let packet = match EnginePacket::parse(&text) {
                Ok(packet) => packet,
                Err(e) => {
                    tracing::warn!(error = %e, frame = %text, "Dropping malformed frame");
                    continue;
                }
            };

            match packet {
                EnginePacket::Message(payload) => match SocketPacket::parse(&payload) {
                    Ok(packet) => return Ok(Some(packet)),
                    Err(e) => tracing::warn!(error = %e, payload = %payload, "Dropping malformed packet"),
                },
                EnginePacket::Ping(data) => self.send_engine(EnginePacket::Pong(data)).await?,
                EnginePacket::Close => return Ok(None),
                EnginePacket::Open(_) => tracing::warn!("Unexpected open packet"),
                EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
            }
        }

        Ok(None)
    }

    /// Send a Socket.IO packet
    pub async fn send(&mut self, packet: &SocketPacket) -> Result<()> {
        self.send_engine(EnginePacket::Message(packet.to_wire_format()))
            .await
    }

    async fn send_engine(&mut self, packet: EnginePacket) -> Result<()> {
        self.ws
            .send(Message::Text(packet.to_wire_format()))
            .await
            .context("Failed to send message")
    }

    /// Leave the namespace and close the websocket
    pub async fn close(&mut self) -> Result<()> {
        self.send(&SocketPacket::disconnect()).await?;
        self.ws
            .close(None)
            .await
            .context("Failed to close websocket")
    }
}
