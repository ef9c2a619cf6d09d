use charla_protocol::{ChatMessage, ErrorNotice, Joined, Presence, ServerEvent, UserEntry};
use serde_json::Value;

use crate::transport::TransportEvent;

/// Trait for handling chat server events.
///
/// Implement this trait to react to the transport. All methods have
/// default no-op implementations, so you only need to implement the
/// events you care about. Handlers run to completion on the task that
/// drives them and must not block.
///
/// # Example
///
/// ```ignore
/// struct Echo {
///     handle: ChatHandle,
/// }
///
/// impl Handler for Echo {
///     fn on_message(&mut self, message: &ChatMessage) {
///         println!("{}: {}", message.username, message.message);
///     }
/// }
/// ```
pub trait Handler {
    /// Called once the Socket.IO namespace connection is acknowledged.
    fn on_connect(&mut self, sid: Option<&str>) {
        let _ = sid;
    }

    /// Called when the connection ends, for whatever reason.
    fn on_disconnect(&mut self, reason: &str) {
        let _ = reason;
    }

    /// Called when the connection could not be established.
    fn on_connect_error(&mut self, message: &str) {
        let _ = message;
    }

    /// Called when the server confirms our join request.
    fn on_joined(&mut self, joined: &Joined) {
        let _ = joined;
    }

    fn on_message(&mut self, message: &ChatMessage) {
        let _ = message;
    }

    fn on_user_list(&mut self, users: &[UserEntry]) {
        let _ = users;
    }

    fn on_user_joined(&mut self, presence: &Presence) {
        let _ = presence;
    }

    fn on_user_left(&mut self, presence: &Presence) {
        let _ = presence;
    }

    /// Called for server-reported errors.
    fn on_error(&mut self, error: &ErrorNotice) {
        let _ = error;
    }

    /// Called for any event without a specific method.
    fn on_unknown(&mut self, name: &str, args: &[Value]) {
        let _ = (name, args);
    }
}

/// Dispatch a single transport event to the appropriate handler method
pub fn dispatch<H: Handler + ?Sized>(handler: &mut H, event: TransportEvent) {
    match event {
        TransportEvent::Connected { sid } => handler.on_connect(sid.as_deref()),
        TransportEvent::Disconnected { reason } => handler.on_disconnect(&reason),
        TransportEvent::ConnectError { message } => handler.on_connect_error(&message),
        TransportEvent::Event(event) => dispatch_server_event(handler, event),
    }
}

fn dispatch_server_event<H: Handler + ?Sized>(handler: &mut H, event: ServerEvent) {
    match event {
        ServerEvent::Joined(joined) => handler.on_joined(&joined),
        ServerEvent::Message(message) => handler.on_message(&message),
        ServerEvent::UserList(users) => handler.on_user_list(&users),
        ServerEvent::UserJoined(presence) => handler.on_user_joined(&presence),
        ServerEvent::UserLeft(presence) => handler.on_user_left(&presence),
        ServerEvent::Error(error) => handler.on_error(&error),
        ServerEvent::Unknown { name, args } => {
            tracing::debug!(event = %name, "Unhandled server event");
            handler.on_unknown(&name, &args);
        }
    }
}
