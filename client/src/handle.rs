use charla_protocol::ClientEvent;
use tokio::sync::mpsc;

use crate::error::ClientError;
use crate::transport::Command;

/// Cloneable handle for sending events to the server.
///
/// Every method queues a command for the transport task and returns
/// immediately; it fails only once the transport task has ended.
#[derive(Clone)]
pub struct ChatHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl ChatHandle {
    pub fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    fn send(&self, command: Command) -> Result<(), ClientError> {
        self.tx.send(command).map_err(|_| ClientError::Closed)
    }

    fn emit(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.send(Command::Emit(event))
    }

    /// Ask to join the chat under this name
    pub fn join(&self, username: &str) -> Result<(), ClientError> {
        self.emit(ClientEvent::Join {
            username: username.to_string(),
        })
    }

    /// Send a chat message to everyone
    pub fn send_message(&self, message: &str) -> Result<(), ClientError> {
        self.emit(ClientEvent::Message {
            message: message.to_string(),
        })
    }

    /// Ask the server for the connected users list
    pub fn request_user_list(&self) -> Result<(), ClientError> {
        self.emit(ClientEvent::RequestUserList)
    }

    /// Leave the namespace and close the connection
    pub fn disconnect(&self) -> Result<(), ClientError> {
        self.send(Command::Disconnect)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_are_queued_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ChatHandle::new(tx);

        handle.join("Alice").unwrap();
        handle.send_message("hola").unwrap();
        handle.request_user_list().unwrap();
        handle.disconnect().unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            Command::Emit(ClientEvent::Join {
                username: "Alice".into()
            })
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Command::Emit(ClientEvent::Message {
                message: "hola".into()
            })
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Command::Emit(ClientEvent::RequestUserList)
        );
        assert_eq!(rx.try_recv().unwrap(), Command::Disconnect);
    }

    #[test]
    fn test_send_after_transport_ended() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ChatHandle::new(tx);
        drop(rx);

        assert!(handle.is_closed());
        assert!(matches!(handle.join("Alice"), Err(ClientError::Closed)));
    }
}
