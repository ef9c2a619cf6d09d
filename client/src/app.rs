use std::time::Duration;

use charla_protocol::{ChatMessage, ErrorNotice, Joined, Presence, UserEntry};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::error::ClientError;
use crate::handle::ChatHandle;
use crate::handler::{Handler, dispatch};
use crate::render::{self, COMMAND_HELP};
use crate::session::Session;
use crate::transport::TransportEvent;
use crate::view::{StatusKind, View};

pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a quitting client waits for the transport to close
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

pub const LIST_COMMAND: &str = "/listar";
pub const QUIT_COMMAND: &str = "/quitar";

/// What a line typed in the chat panel asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    Empty,
    ListUsers,
    Quit,
    Chat(&'a str),
}

impl<'a> Intent<'a> {
    pub fn parse(text: &'a str) -> Self {
        match text.trim() {
            "" => Self::Empty,
            LIST_COMMAND => Self::ListUsers,
            QUIT_COMMAND => Self::Quit,
            message => Self::Chat(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Why the run loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Disconnected,
    ConnectFailed,
}

/// The chat client proper: turns user input into outbound events and
/// server events into view updates.
pub struct ChatApp<V: View> {
    handle: ChatHandle,
    session: Session,
    view: V,
    auto_join: Option<String>,
    status_timeout: Duration,
    status_deadline: Option<Instant>,
    outcome: Option<Outcome>,
}

impl<V: View> ChatApp<V> {
    pub fn new(handle: ChatHandle, mut view: V) -> Self {
        view.show_login();
        view.set_input_enabled(false);

        Self {
            handle,
            session: Session::new(),
            view,
            auto_join: None,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            status_deadline: None,
            outcome: None,
        }
    }

    /// Submit this name as soon as the connection is up
    #[must_use]
    pub fn with_auto_join(mut self, username: Option<String>) -> Self {
        self.auto_join = username;
        self
    }

    #[must_use]
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// When the current status notice is due to disappear
    pub fn status_deadline(&self) -> Option<Instant> {
        self.status_deadline
    }

    fn show_status(&mut self, text: &str, kind: StatusKind) {
        self.view.show_status(text, kind);
        self.status_deadline = Some(Instant::now() + self.status_timeout);
    }

    pub fn dismiss_status(&mut self) {
        self.view.clear_status();
        self.status_deadline = None;
    }

    /// A line entered by the user: a name until the server confirms the
    /// join, chat input afterwards
    pub fn submit_line(&mut self, line: &str) -> Flow {
        if self.session.is_joined() {
            self.submit_message(line)
        } else {
            self.submit_name(line)
        }
    }

    pub fn submit_name(&mut self, text: &str) -> Flow {
        let username = text.trim();
        if username.is_empty() {
            tracing::debug!("Rejected empty username");
            self.show_status(render::STATUS_EMPTY_NAME, StatusKind::Error);
            return Flow::Continue;
        }

        tracing::info!(username, "Joining chat");
        self.session.request(username);
        if let Err(e) = self.handle.join(username) {
            self.send_failed(e);
        }
        Flow::Continue
    }

    pub fn submit_message(&mut self, text: &str) -> Flow {
        match Intent::parse(text) {
            Intent::Empty => Flow::Continue,
            Intent::ListUsers => {
                if let Err(e) = self.handle.request_user_list() {
                    self.send_failed(e);
                }
                self.view.clear_input();
                Flow::Continue
            }
            Intent::Quit => self.quit(),
            Intent::Chat(message) => {
                tracing::debug!(text = message, "Sending message");
                if let Err(e) = self.handle.send_message(message) {
                    self.send_failed(e);
                }
                self.view.clear_input();
                Flow::Continue
            }
        }
    }

    /// Tear down the connection and stop
    pub fn quit(&mut self) -> Flow {
        tracing::info!("Leaving chat");
        self.view.show_status(render::STATUS_LEAVING, StatusKind::Success);
        if let Err(e) = self.handle.disconnect() {
            tracing::debug!(error = %e, "Transport already closed");
        }
        self.outcome = Some(Outcome::Quit);
        Flow::Quit
    }

    fn send_failed(&mut self, error: ClientError) {
        tracing::warn!(error = %error, "Failed to queue event");
        self.show_status(render::STATUS_DISCONNECTED, StatusKind::Error);
    }

    /// Run until the user quits or the transport ends.
    ///
    /// Every event and input line is handled to completion before the next
    /// one is looked at.
    pub async fn run(
        &mut self,
        events: &mut mpsc::Receiver<TransportEvent>,
        input: &mut mpsc::Receiver<String>,
    ) -> Outcome {
        loop {
            let deadline = self.status_deadline;

            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => dispatch(self, event),
                    None => break,
                },
                line = input.recv() => {
                    let flow = match line {
                        Some(line) => self.submit_line(&line),
                        None => self.quit(),
                    };
                    if flow == Flow::Quit {
                        break;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.dismiss_status();
                },
            }
        }

        if self.outcome == Some(Outcome::Quit) {
            // Give the transport a moment to send the disconnect
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
                while events.recv().await.is_some() {}
            })
            .await;
        }

        self.outcome.unwrap_or(Outcome::Disconnected)
    }
}

impl<V: View> Handler for ChatApp<V> {
    fn on_connect(&mut self, sid: Option<&str>) {
        tracing::debug!(sid = ?sid, "Connected to server");
        self.show_status(render::STATUS_CONNECTED, StatusKind::Success);

        if let Some(username) = self.auto_join.take() {
            self.submit_name(&username);
        }
    }

    fn on_disconnect(&mut self, reason: &str) {
        tracing::info!(reason, "Disconnected from server");
        self.outcome.get_or_insert(Outcome::Disconnected);
        self.show_status(render::STATUS_DISCONNECTED, StatusKind::Error);
    }

    fn on_connect_error(&mut self, message: &str) {
        tracing::error!(error = %message, "Could not connect to server");
        self.outcome = Some(Outcome::ConnectFailed);
        self.show_status(render::STATUS_CONNECT_ERROR, StatusKind::Error);
    }

    fn on_joined(&mut self, joined: &Joined) {
        tracing::info!(username = %joined.username, session_id = %joined.session_id, "Joined chat");
        self.session.establish(&joined.username, &joined.session_id);

        self.view.show_chat(&joined.username);
        self.view.set_input_enabled(true);
        self.view.append_notice(&render::welcome(&joined.username));
        self.view.append_notice(COMMAND_HELP);
    }

    fn on_message(&mut self, message: &ChatMessage) {
        tracing::debug!(from = %message.username, "Message received");
        let bubble = render::message_bubble(message, &self.session);
        self.view.append_message(&bubble);
    }

    fn on_user_list(&mut self, users: &[UserEntry]) {
        self.view.set_user_count(users.len());
        self.view.append_notice(&render::roster(users));
    }

    fn on_user_joined(&mut self, presence: &Presence) {
        self.view.append_notice(&render::user_joined(&presence.username));
    }

    fn on_user_left(&mut self, presence: &Presence) {
        self.view.append_notice(&render::user_left(&presence.username));
    }

    fn on_error(&mut self, error: &ErrorNotice) {
        tracing::warn!(error = ?error.message, "Server reported an error");
        let text = error
            .message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(render::STATUS_UNKNOWN_ERROR);
        self.show_status(text, StatusKind::Error);
    }
}
