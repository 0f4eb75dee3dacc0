//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// When you see a `ProtocolError` the problem is in serialization, not in
/// networking or session state — each crate in the workspace keeps its own
/// error enum for exactly this reason.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed. Common causes: malformed JSON, missing
    /// required fields, wrong data types, truncated frames.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
