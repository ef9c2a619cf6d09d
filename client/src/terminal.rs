use std::fmt;
use std::io::Write;

use crate::render::strip_controls;
use crate::view::{MessageBubble, StatusKind, View};

const RULE: &str = "============================================================";

/// Line-oriented view for a terminal.
///
/// Input is line-buffered by the terminal itself, so enabling and clearing
/// the input only change the prompt text.
pub struct TerminalView<W: Write> {
    out: W,
    input_enabled: bool,
    user_count: usize,
    status: Option<String>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            input_enabled: false,
            user_count: 0,
            status: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    /// The status notice currently on display
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        let result = self
            .out
            .write_fmt(args)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_login(&mut self) {
        self.line(format_args!("\n{}", RULE));
        self.line(format_args!("    CHARLA - CLIENTE DE CHAT"));
        self.line(format_args!("{}\n", RULE));
        self.line(format_args!("Ingresa tu nombre de usuario:"));
    }

    fn show_chat(&mut self, username: &str) {
        let username = strip_controls(username);
        self.line(format_args!("\n{}", RULE));
        self.line(format_args!("    Conectado como {}", username));
        self.line(format_args!("{}\n", RULE));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if enabled && !self.input_enabled {
            self.line(format_args!("📝 Escribe tus mensajes y presiona Enter"));
        }
        self.input_enabled = enabled;
    }

    fn clear_input(&mut self) {}

    fn append_message(&mut self, bubble: &MessageBubble) {
        let username = strip_controls(&bubble.username);
        let time = strip_controls(&bubble.time);
        let text = strip_controls(&bubble.text);
        let marker = if bubble.own { " (tú)" } else { "" };
        self.line(format_args!("[{}] {}{}: {}", time, username, marker, text));
    }

    fn append_notice(&mut self, text: &str) {
        let text = strip_controls(text);
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            self.line(format_args!("[SISTEMA] {}", line));
        }
    }

    fn set_user_count(&mut self, count: usize) {
        self.user_count = count;
        self.line(format_args!("[SISTEMA] Usuarios conectados: {}", count));
    }

    fn show_status(&mut self, text: &str, kind: StatusKind) {
        let text = strip_controls(text);
        let prefix = match kind {
            StatusKind::Success => "[CLIENTE]",
            StatusKind::Error => "[ERROR]",
        };
        self.line(format_args!("{} {}", prefix, text));
        self.status = Some(text);
    }

    // Printed lines stay in the scrollback; only the tracked notice goes away
    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_message_lines() {
        let mut view = TerminalView::new(Vec::new());
        view.append_message(&MessageBubble {
            username: "bob".into(),
            time: "13:45".into(),
            text: "hola".into(),
            own: false,
        });
        view.append_message(&MessageBubble {
            username: "Alice".into(),
            time: "13:46".into(),
            text: "qué tal".into(),
            own: true,
        });

        assert_eq!(
            output(view),
            "[13:45] bob: hola\n[13:46] Alice (tú): qué tal\n"
        );
    }

    #[test]
    fn test_markup_is_printed_literally() {
        let mut view = TerminalView::new(Vec::new());
        view.append_message(&MessageBubble {
            username: "<b>eve</b>".into(),
            time: "00:00".into(),
            text: "<script>alert(1)</script>\u{1b}[2J".into(),
            own: false,
        });
        view.append_notice("<script> se unió al chat");

        assert_eq!(
            output(view),
            "[00:00] <b>eve</b>: <script>alert(1)</script>[2J\n[SISTEMA] <script> se unió al chat\n"
        );
    }

    #[test]
    fn test_multiline_notice() {
        let mut view = TerminalView::new(Vec::new());
        view.append_notice("\n👥 USUARIOS CONECTADOS:\n1. alice\n");

        assert_eq!(
            output(view),
            "[SISTEMA] 👥 USUARIOS CONECTADOS:\n[SISTEMA] 1. alice\n"
        );
    }

    #[test]
    fn test_status_tracking() {
        let mut view = TerminalView::new(Vec::new());
        view.show_status("Conectado al servidor", StatusKind::Success);
        assert_eq!(view.status(), Some("Conectado al servidor"));

        view.show_status("Desconectado del servidor", StatusKind::Error);
        assert_eq!(view.status(), Some("Desconectado del servidor"));

        view.clear_status();
        assert_eq!(view.status(), None);
        assert_eq!(
            output(view),
            "[CLIENTE] Conectado al servidor\n[ERROR] Desconectado del servidor\n"
        );
    }

    #[test]
    fn test_input_prompt_printed_once() {
        let mut view = TerminalView::new(Vec::new());
        view.set_input_enabled(true);
        view.set_input_enabled(true);

        assert!(view.input_enabled());
        assert_eq!(output(view).lines().count(), 1);
    }
}
