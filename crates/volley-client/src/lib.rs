//! Client-side building blocks for Volley: a reconnecting WebSocket
//! transport and a debounced keyboard tracker.
//!
//! The two pieces are independent. A typical UI loop wires them together:
//!
//! ```rust,ignore
//! let (client, mut events) = VolleyClient::connect(
//!     ClientConfig::new("ws://127.0.0.1:8080/ws/pong"),
//! );
//! let mut tracker = InputTracker::new();
//!
//! // From the key-event handler:
//! match tracker.key_down(key) {
//!     Some(InputEvent::Intent { up, down }) => client.set_intent(up, down),
//!     Some(InputEvent::TogglePause) => client.toggle_pause(),
//!     None => {}
//! }
//!
//! // From the render loop:
//! while let Ok(event) = events.try_recv() {
//!     if let ClientEvent::State(snapshot) = event {
//!         latest = snapshot; // newest wins, older snapshots are stale
//!     }
//! }
//! ```

mod backoff;
mod error;
mod input;
mod transport;

pub use backoff::Backoff;
pub use error::ClientError;
pub use input::{InputEvent, InputTracker, Key};
pub use transport::{ClientConfig, ClientEvent, VolleyClient};
