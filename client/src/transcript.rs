use std::io::Write;

use crate::render::escape_html;
use crate::view::{MessageBubble, StatusKind, View};

/// Appends the chat as HTML fragments, the same markup a browser client
/// builds for its message list.
///
/// Only the conversation is recorded; prompts and status notices are
/// transient and left out.
pub struct HtmlTranscript<W: Write> {
    out: W,
}

impl<W: Write> HtmlTranscript<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, fragment: &str) {
        let result = self
            .out
            .write_all(fragment.as_bytes())
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write transcript");
        }
    }
}

impl<W: Write> View for HtmlTranscript<W> {
    fn show_login(&mut self) {}

    fn show_chat(&mut self, username: &str) {
        let fragment = format!(
            r#"<div class="chat-header"><span id="currentUser">{}</span></div>"#,
            escape_html(username)
        );
        self.write(&fragment);
    }

    fn set_input_enabled(&mut self, _enabled: bool) {}

    fn clear_input(&mut self) {}

    fn append_message(&mut self, bubble: &MessageBubble) {
        let class = if bubble.own {
            "message user own"
        } else {
            "message user"
        };
        let fragment = format!(
            concat!(
                r#"<div class="{}">"#,
                r#"<div class="message-header">"#,
                r#"<span class="username">{}</span>"#,
                r#"<span class="timestamp">{}</span>"#,
                "</div>",
                r#"<div class="message-text">{}</div>"#,
                "</div>"
            ),
            class,
            escape_html(&bubble.username),
            escape_html(&bubble.time),
            escape_html(&bubble.text),
        );
        self.write(&fragment);
    }

    fn append_notice(&mut self, text: &str) {
        let fragment = format!(r#"<div class="message system">{}</div>"#, escape_html(text));
        self.write(&fragment);
    }

    fn set_user_count(&mut self, _count: usize) {}

    fn show_status(&mut self, _text: &str, _kind: StatusKind) {}

    fn clear_status(&mut self) {}
}
