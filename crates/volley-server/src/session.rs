//! Session actor: the single Tokio task that owns the game simulation.
//!
//! Connections never touch [`GameSession`] directly. They hold a
//! [`SessionHandle`] and send commands over an mpsc channel; the actor
//! serializes every mutation between ticks, so the simulation needs no
//! locking and no field is ever written from two places.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::{mpsc, oneshot};
use volley_engine::{GameSession, Phase, TICK_HZ};
use volley_protocol::ServerMessage;

use crate::GatewayError;
use crate::tick::TickSource;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// The role a connection holds for the lifetime of its socket.
///
/// Assigned by occupancy at accept time, never by message content: the
/// first connection while no controller is live becomes the controller,
/// everyone else observes. When the controller disconnects the slot is
/// vacant until a *new* connection claims it — spectators are never
/// promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    /// The single connection steering the left paddle.
    Controller,
    /// Receives broadcasts but cannot affect the simulation.
    Spectator,
}

/// Channel on which a connection receives its outbound messages.
pub type PeerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to the session actor.
pub(crate) enum SessionCommand {
    /// Register a connection and assign its role.
    Join {
        conn_id: ConnectionId,
        sender: PeerSender,
        reply: oneshot::Sender<ConnectionRole>,
    },
    /// Remove a connection (disconnect or explicit close).
    Leave { conn_id: ConnectionId },
    /// Directional intent from a connection. Only honored for the
    /// controller; spectator input is dropped without a reply so the role
    /// split is not observable from the wire.
    Input {
        conn_id: ConnectionId,
        seq: u64,
        up: bool,
        down: bool,
    },
    /// One-shot pause/start toggle.
    TogglePause { conn_id: ConnectionId },
    /// Close every live peer, then stop the actor.
    Shutdown,
}

/// Handle to the running session actor. Cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Spawns the session actor and returns a handle to it.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(64);
        let actor = SessionActor {
            game: GameSession::new(),
            ticker: TickSource::new(TICK_HZ),
            controller: None,
            spectators: HashMap::new(),
            receiver: rx,
        };
        tokio::spawn(actor.run());
        Self { sender: tx }
    }

    /// Registers a connection and returns its assigned role.
    pub async fn join(
        &self,
        conn_id: ConnectionId,
        sender: PeerSender,
    ) -> Result<ConnectionRole, GatewayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Join {
                conn_id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| GatewayError::SessionClosed)?;
        reply_rx.await.map_err(|_| GatewayError::SessionClosed)
    }

    /// Removes a connection from the session.
    pub async fn leave(&self, conn_id: ConnectionId) -> Result<(), GatewayError> {
        self.sender
            .send(SessionCommand::Leave { conn_id })
            .await
            .map_err(|_| GatewayError::SessionClosed)
    }

    /// Delivers directional intent (fire-and-forget).
    pub async fn input(
        &self,
        conn_id: ConnectionId,
        seq: u64,
        up: bool,
        down: bool,
    ) -> Result<(), GatewayError> {
        self.sender
            .send(SessionCommand::Input {
                conn_id,
                seq,
                up,
                down,
            })
            .await
            .map_err(|_| GatewayError::SessionClosed)
    }

    /// Delivers a pause/start toggle.
    pub async fn toggle_pause(
        &self,
        conn_id: ConnectionId,
    ) -> Result<(), GatewayError> {
        self.sender
            .send(SessionCommand::TogglePause { conn_id })
            .await
            .map_err(|_| GatewayError::SessionClosed)
    }

    /// Tells the actor to close all peers and stop.
    pub async fn shutdown(&self) -> Result<(), GatewayError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| GatewayError::SessionClosed)
    }
}

/// The actor's internal state. Lives inside one Tokio task.
struct SessionActor {
    game: GameSession,
    ticker: TickSource,
    controller: Option<(ConnectionId, PeerSender)>,
    spectators: HashMap<ConnectionId, PeerSender>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!("session actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd) {
                                break;
                            }
                        }
                        // All handles dropped: nothing can reach us anymore.
                        None => break,
                    }
                }
                dt = self.ticker.next_tick() => {
                    self.game.tick(dt);
                    self.broadcast();
                }
            }
        }

        // Close peers before the tick source is released.
        self.controller = None;
        self.spectators.clear();
        tracing::info!("session actor stopped");
    }

    /// Applies one command. Returns `true` when the actor should stop.
    fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Join {
                conn_id,
                sender,
                reply,
            } => {
                let role = if self.controller.is_none() {
                    self.controller = Some((conn_id, sender));
                    ConnectionRole::Controller
                } else {
                    self.spectators.insert(conn_id, sender);
                    ConnectionRole::Spectator
                };
                tracing::info!(
                    %conn_id,
                    ?role,
                    spectators = self.spectators.len(),
                    "connection joined"
                );
                let _ = reply.send(role);
            }

            SessionCommand::Leave { conn_id } => {
                if self
                    .controller
                    .as_ref()
                    .is_some_and(|(id, _)| *id == conn_id)
                {
                    // Vacate the slot and release the paddle. The next new
                    // connection becomes controller; spectators stay put.
                    self.controller = None;
                    self.game.set_controller_intent(false, false);
                    tracing::info!(%conn_id, "controller left, slot vacant");
                } else if self.spectators.remove(&conn_id).is_some() {
                    tracing::info!(%conn_id, "spectator left");
                }
            }

            SessionCommand::Input {
                conn_id,
                seq,
                up,
                down,
            } => {
                if self
                    .controller
                    .as_ref()
                    .is_some_and(|(id, _)| *id == conn_id)
                {
                    // seq is informational; most recent received wins.
                    tracing::trace!(%conn_id, seq, up, down, "intent");
                    self.game.set_controller_intent(up, down);
                } else {
                    tracing::debug!(%conn_id, "ignoring non-controller input");
                }
            }

            SessionCommand::TogglePause { conn_id } => {
                if self
                    .controller
                    .as_ref()
                    .is_some_and(|(id, _)| *id == conn_id)
                {
                    match self.game.phase() {
                        Phase::Idle => {
                            self.game.start_round(None);
                            self.ticker.reset();
                        }
                        Phase::Playing => {
                            let paused = self.game.toggle_pause();
                            if !paused {
                                // No time debt across the pause.
                                self.ticker.reset();
                            }
                        }
                    }
                } else {
                    tracing::debug!(%conn_id, "ignoring non-controller command");
                }
            }

            SessionCommand::Shutdown => {
                tracing::info!("session shutting down");
                return true;
            }
        }
        false
    }

    /// Sends the current snapshot to every live peer, best-effort.
    ///
    /// A send fails only when the peer's channel is closed (its connection
    /// task is gone). Failed peers are collected and dropped after the
    /// iteration; one dead peer never affects the others or the tick.
    fn broadcast(&mut self) {
        let msg = ServerMessage::State {
            state: self.game.snapshot(),
        };

        let mut dead: Vec<ConnectionId> = Vec::new();

        if let Some((id, sender)) = &self.controller {
            if sender.send(msg.clone()).is_err() {
                dead.push(*id);
            }
        }
        for (id, sender) in &self.spectators {
            if sender.send(msg.clone()).is_err() {
                dead.push(*id);
            }
        }

        for id in dead {
            if self
                .controller
                .as_ref()
                .is_some_and(|(cid, _)| *cid == id)
            {
                self.controller = None;
                self.game.set_controller_intent(false, false);
            }
            self.spectators.remove(&id);
            tracing::debug!(conn_id = %id, "dropped unreachable peer");
        }
    }
}
