use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection closed")]
    Closed,

    #[error("Server did not complete the handshake: {0}")]
    Handshake(String),

    #[error("Server refused the connection: {0}")]
    Rejected(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
