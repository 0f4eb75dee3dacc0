//! Error types for the client transport.

use volley_protocol::ProtocolError;

/// Errors surfaced by the client transport.
///
/// Most network failures are absorbed by the reconnect loop rather than
/// returned; these variants cover the places where an error must stop the
/// current attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The WebSocket layer failed (connect, send or receive).
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Encoding an outbound message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
