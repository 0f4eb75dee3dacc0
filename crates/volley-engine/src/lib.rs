//! Authoritative game session simulation for Volley.
//!
//! This crate is the only writer of game state. It is pure simulation — no
//! sockets, no timers, no tasks. The server drives it by calling
//! [`GameSession::tick`] at a fixed cadence and broadcasting the returned
//! [snapshot](GameSession::snapshot); the gateway mutates it only through
//! the session's methods (`set_controller_intent`, `toggle_pause`, ...).
//!
//! Keeping the simulation synchronous and I/O-free is what makes the
//! physics testable: every test in `tests/simulation.rs` drives the session
//! with explicit `dt` values and asserts on the resulting state.

mod session;
mod state;

pub use session::{GameSession, ServeDirection};
pub use state::{
    ARENA_HEIGHT, ARENA_WIDTH, BALL_BASE_SPEED, BALL_RADIUS, InputIntent,
    MAX_TICK_DT, PADDLE_HEIGHT, PADDLE_INSET, PADDLE_SPEED, PADDLE_WIDTH,
    Phase, TICK_HZ,
};
