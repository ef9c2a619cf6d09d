//! Text of everything the client shows, and escaping helpers for views.

use charla_protocol::{ChatMessage, Timestamp, UserEntry};

use crate::session::Session;
use crate::view::MessageBubble;

pub const STATUS_CONNECTED: &str = "Conectado al servidor";
pub const STATUS_EMPTY_NAME: &str = "Por favor ingresa un nombre de usuario";
pub const STATUS_DISCONNECTED: &str = "Desconectado del servidor";
pub const STATUS_CONNECT_ERROR: &str = "Error al conectar con el servidor";
pub const STATUS_UNKNOWN_ERROR: &str = "Error desconocido";
pub const STATUS_LEAVING: &str = "Desconectando del chat...";

pub const COMMAND_HELP: &str = "Comandos: /listar (usuarios) | /quitar (salir)";

pub fn welcome(username: &str) -> String {
    format!("¡Bienvenido al chat, {}!", username)
}

pub fn user_joined(username: &str) -> String {
    format!("{} se unió al chat", username)
}

pub fn user_left(username: &str) -> String {
    format!("{} abandonó el chat", username)
}

/// Numbered list of connected users, as a single notice
pub fn roster(users: &[UserEntry]) -> String {
    let mut text = String::from("\n👥 USUARIOS CONECTADOS:\n");
    for (i, user) in users.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, user.username));
    }
    text
}

/// Local HH:MM of a message, or whatever can be salvaged from the raw value
pub fn clock(timestamp: Option<&Timestamp>) -> String {
    match timestamp {
        Some(timestamp) => timestamp
            .to_local()
            .map(|local| local.format("%H:%M").to_string())
            .unwrap_or_else(|| timestamp.raw_clock()),
        None => String::new(),
    }
}

pub fn message_bubble(message: &ChatMessage, session: &Session) -> MessageBubble {
    MessageBubble {
        username: message.username.clone(),
        time: clock(message.timestamp.as_ref()),
        text: message.message.clone(),
        own: session.is_own(&message.session_id),
    }
}

/// Escape text for insertion into HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Drop control characters so remote text cannot drive the terminal.
/// Newlines and tabs are kept.
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserEntry {
        UserEntry {
            username: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_roster_is_numbered() {
        let text = roster(&[user("alice"), user("bob")]);
        assert_eq!(text, "\n👥 USUARIOS CONECTADOS:\n1. alice\n2. bob\n");
    }

    #[test]
    fn test_roster_empty() {
        assert_eq!(roster(&[]), "\n👥 USUARIOS CONECTADOS:\n");
    }

    #[test]
    fn test_notices() {
        assert_eq!(welcome("Alice"), "¡Bienvenido al chat, Alice!");
        assert_eq!(user_joined("bob"), "bob se unió al chat");
        assert_eq!(user_left("bob"), "bob abandonó el chat");
    }

    #[test]
    fn test_clock() {
        let naive = Timestamp::Text("2024-05-01T08:05:59".into());
        assert_eq!(clock(Some(&naive)), "08:05");

        let garbled = Timestamp::Text("ayer".into());
        assert_eq!(clock(Some(&garbled)), "ayer");

        assert_eq!(clock(None), "");
    }

    #[test]
    fn test_message_bubble_own_style() {
        let mut session = Session::new();
        session.establish("Alice", "s1");

        let mine = ChatMessage {
            username: "Alice".into(),
            message: "hola".into(),
            session_id: "s1".into(),
            timestamp: None,
        };
        let theirs = ChatMessage {
            session_id: "s2".into(),
            ..mine.clone()
        };

        assert!(message_bubble(&mine, &session).own);
        assert!(!message_bubble(&theirs, &session).own);
    }

    #[test]
    fn test_message_without_session_is_never_own() {
        let session = Session::new();
        let anonymous = ChatMessage {
            message: "hola".into(),
            ..Default::default()
        };

        assert!(!message_bubble(&anonymous, &session).own);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") && 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp;&amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("hola"), "hola");
    }

    #[test]
    fn test_strip_controls() {
        assert_eq!(strip_controls("\u{1b}[2Jhola\u{7}"), "[2Jhola");
        assert_eq!(strip_controls("a\tb\nc\r"), "a\tb\nc");
        assert_eq!(strip_controls("\u{9b}31m"), "31m");
    }
}
