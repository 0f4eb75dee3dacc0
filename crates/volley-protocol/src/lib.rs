//! Wire protocol for Volley.
//!
//! This crate defines the "language" that the game client and server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`StateSnapshot`]) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw WebSocket frames) and
//! the game session. It doesn't know about connections or roles — it only
//! knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage/ServerMessage) → Session
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, Command, ServerMessage, StateSnapshot};
