mod app;
pub mod config;
mod connection;
mod error;
mod handle;
mod handler;
pub mod render;
mod session;
mod terminal;
mod transcript;
mod transport;
pub mod view;

use std::time::Duration;

use anyhow::Result;
use charla_protocol::socket_io_url;
use tokio::sync::mpsc;

pub use charla_protocol::{
    ChatMessage, ClientEvent, ErrorNotice, Joined, Presence, ServerEvent, Timestamp, UserEntry,
};

pub use app::{ChatApp, DEFAULT_STATUS_TIMEOUT, Flow, Intent, Outcome};
pub use config::Config;
pub use error::ClientError;
pub use handle::ChatHandle;
pub use handler::{Handler, dispatch};
pub use session::Session;
pub use terminal::TerminalView;
pub use transcript::HtmlTranscript;
pub use transport::{Command, TransportEvent};
pub use view::{MessageBubble, StatusKind, View};

pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning for the transport task
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Inbound events buffered before the transport waits for the consumer.
    /// Values below 1 are clamped to 1.
    pub event_channel_capacity: usize,

    /// How long the websocket and Socket.IO handshakes may take together
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Chat server client.
///
/// The connection lives in a background task; this value holds the
/// command handle and the stream of events it reports.
pub struct ChatClient {
    handle: ChatHandle,
    events: mpsc::Receiver<TransportEvent>,
}

impl ChatClient {
    /// Start connecting to a chat server, e.g. `http://localhost:5001`.
    ///
    /// Fails only for an unusable address; connection problems arrive as
    /// [`TransportEvent::ConnectError`]. Must be called inside a tokio runtime.
    pub fn start(server: &str, config: &ClientConfig) -> Result<Self> {
        let url = socket_io_url(server)?;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(config.event_channel_capacity.max(1));

        tokio::spawn(transport::transport_loop(
            url.to_string(),
            config.connect_timeout,
            cmd_rx,
            event_tx,
        ));

        Ok(Self {
            handle: ChatHandle::new(cmd_tx),
            events: event_rx,
        })
    }

    /// Get a cloneable handle for sending events
    pub fn handle(&self) -> ChatHandle {
        self.handle.clone()
    }

    /// Wait for the next transport event; None once the transport has ended
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    /// Dispatch events to the handler until the transport ends
    pub async fn run<H: Handler>(&mut self, handler: &mut H) {
        while let Some(event) = self.events.recv().await {
            dispatch(handler, event);
        }
    }

    pub fn into_parts(self) -> (ChatHandle, mpsc::Receiver<TransportEvent>) {
        (self.handle, self.events)
    }
}
