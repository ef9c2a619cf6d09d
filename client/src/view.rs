//! Rendering port
//!
//! The chat logic talks to the screen only through [`View`], so it can be
//! driven without a terminal. Views receive plain text and are responsible
//! for neutralizing anything their medium would interpret as markup.

/// Style of a transient status notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// A rendered chat message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBubble {
    pub username: String,

    /// Local time of the message, HH:MM
    pub time: String,

    pub text: String,

    /// Sent from this session
    pub own: bool,
}

pub trait View {
    /// Show the name prompt
    fn show_login(&mut self);

    /// Hide the name prompt and show the chat for this user
    fn show_chat(&mut self, username: &str);

    fn set_input_enabled(&mut self, enabled: bool);

    fn clear_input(&mut self);

    fn append_message(&mut self, bubble: &MessageBubble);

    /// Append a locally generated notice (welcome, join/leave, roster)
    fn append_notice(&mut self, text: &str);

    fn set_user_count(&mut self, count: usize);

    /// Show a transient status notice, replacing the current one
    fn show_status(&mut self, text: &str, kind: StatusKind);

    fn clear_status(&mut self);
}

/// Render to two views at once
impl<A: View, B: View> View for (A, B) {
    fn show_login(&mut self) {
        self.0.show_login();
        self.1.show_login();
    }

    fn show_chat(&mut self, username: &str) {
        self.0.show_chat(username);
        self.1.show_chat(username);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.0.set_input_enabled(enabled);
        self.1.set_input_enabled(enabled);
    }

    fn clear_input(&mut self) {
        self.0.clear_input();
        self.1.clear_input();
    }

    fn append_message(&mut self, bubble: &MessageBubble) {
        self.0.append_message(bubble);
        self.1.append_message(bubble);
    }

    fn append_notice(&mut self, text: &str) {
        self.0.append_notice(text);
        self.1.append_notice(text);
    }

    fn set_user_count(&mut self, count: usize) {
        self.0.set_user_count(count);
        self.1.set_user_count(count);
    }

    fn show_status(&mut self, text: &str, kind: StatusKind) {
        self.0.show_status(text, kind);
        self.1.show_status(text, kind);
    }

    fn clear_status(&mut self) {
        self.0.clear_status();
        self.1.clear_status();
    }
}
