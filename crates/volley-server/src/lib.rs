//! Connection gateway and session host for Volley.
//!
//! This crate ties the layers together on the server side:
//!
//! ```text
//! TcpListener → WebSocket upgrade (path/origin checks) → role assignment
//!            → session actor (tick loop + broadcast)
//! ```
//!
//! Exactly one [`GameSession`](volley_engine::GameSession) exists per
//! process. It lives inside a single Tokio task (the session actor), which
//! is the sole writer of game state; connections talk to it through an mpsc
//! command channel and receive broadcasts through per-peer channels.
//!
//! Authentication is out of scope: the gateway trusts that a connection
//! reaching it has already been authorized by the surrounding deployment
//! (reverse proxy, cookie check, ...). What it does enforce is the reserved
//! upgrade path and an exact-match Origin check.

mod error;
mod gateway;
mod session;
mod tick;

pub use error::GatewayError;
pub use gateway::{VolleyServer, VolleyServerBuilder};
pub use session::{ConnectionId, ConnectionRole, PeerSender, SessionHandle};
pub use tick::TickSource;
