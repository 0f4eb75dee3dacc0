//! Error types for the gateway layer.

use volley_protocol::ProtocolError;

/// Errors that can occur while running the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Binding the listener failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade failed (bad path, bad origin, or a protocol
    /// violation during the handshake).
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),

    /// Encoding an outbound message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session actor is gone; no further commands can be delivered.
    #[error("session is no longer running")]
    SessionClosed,
}
