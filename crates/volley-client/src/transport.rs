//! Reconnecting WebSocket transport.
//!
//! [`VolleyClient`] is a cheap handle; the connection itself lives in a
//! background task that dials, joins, pumps frames and re-dials after an
//! unexpected close. Callers observe the connection through a
//! [`ClientEvent`] channel and steer it through the handle.
//!
//! Intent is sent diff-only: a bounded-rate loop compares the currently
//! desired intent to the last transmitted one and only puts a frame on the
//! wire when they differ. Pause toggles bypass that loop and go out
//! immediately on the key edge.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use volley_protocol::{
    ClientMessage, Codec, Command, JsonCodec, ServerMessage, StateSnapshot,
};

use crate::backoff::Backoff;
use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full WebSocket URL, e.g. `ws://127.0.0.1:8080/ws/pong`.
    pub url: String,
    /// Rate of the diff-only intent send loop.
    pub send_rate_hz: u32,
    /// Reconnect delay schedule.
    pub backoff: Backoff,
}

impl ClientConfig {
    /// Configuration with the default send rate and backoff schedule.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            send_rate_hz: 60,
            backoff: Backoff::default(),
        }
    }
}

/// What the transport reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The connection is established and `join` has been sent.
    Connected,
    /// A fresh authoritative snapshot. Newer snapshots supersede older
    /// ones; render the latest and drop the rest.
    State(StateSnapshot),
    /// The connection closed unexpectedly. A reconnect is already
    /// scheduled unless [`VolleyClient::disconnect`] was called.
    Disconnected,
}

/// One-shot instructions delivered outside the intent diff loop.
enum ClientCommand {
    TogglePause,
}

/// State shared between the handle and the connection task.
struct Shared {
    /// The intent the owner currently wants on the wire.
    want: Mutex<(bool, bool)>,
    /// Set once by `disconnect()`; never cleared.
    closed: AtomicBool,
    /// Wakes the task out of a backoff sleep or a connected select loop
    /// so `disconnect()` takes effect promptly.
    notify: Notify,
}

/// Handle to a running client transport.
pub struct VolleyClient {
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<ClientCommand>,
}

impl VolleyClient {
    /// Spawns the connection task and returns the handle plus the event
    /// stream. The first event is [`ClientEvent::Connected`] once the
    /// initial dial succeeds.
    pub fn connect(config: ClientConfig) -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let shared = Arc::new(Shared {
            want: Mutex::new((false, false)),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        });
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = ConnectionTask {
            config,
            shared: Arc::clone(&shared),
            commands: cmd_rx,
            events: event_tx,
            seq: 0,
        };
        tokio::spawn(task.run());

        (
            Self {
                shared,
                commands: cmd_tx,
            },
            event_rx,
        )
    }

    /// Updates the desired intent. The diff loop picks it up on its next
    /// pass; calling this with an unchanged value costs nothing on the
    /// wire.
    pub fn set_intent(&self, up: bool, down: bool) {
        if let Ok(mut want) = self.shared.want.lock() {
            *want = (up, down);
        }
    }

    /// Requests a pause/start toggle, sent immediately.
    pub fn toggle_pause(&self) {
        let _ = self.commands.send(ClientCommand::TogglePause);
    }

    /// Closes the connection and suppresses all future reconnects.
    /// Terminal: the handle cannot be revived afterwards. Dropping the
    /// handle has the same effect.
    pub fn disconnect(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        self.shared.notify.notify_waiters();
    }
}

/// The background task owning the socket.
struct ConnectionTask {
    config: ClientConfig,
    shared: Arc<Shared>,
    commands: mpsc::UnboundedReceiver<ClientCommand>,
    events: mpsc::UnboundedSender<ClientEvent>,
    /// Monotonic across reconnects so the server always sees increasing
    /// sequence numbers from this client instance.
    seq: u64,
}

impl ConnectionTask {
    async fn run(mut self) {
        let mut backoff = self.config.backoff.clone();

        loop {
            if self.shared.closed.load(Ordering::SeqCst) {
                break;
            }

            match connect_async(&self.config.url).await {
                Ok((ws, _)) => {
                    tracing::info!(url = %self.config.url, "connected");
                    backoff.reset();
                    let _ = self.events.send(ClientEvent::Connected);

                    if let Err(e) = self.drive(ws).await {
                        tracing::debug!(error = %e, "connection error");
                    }
                    if self.shared.closed.load(Ordering::SeqCst) {
                        break;
                    }
                    let _ = self.events.send(ClientEvent::Disconnected);
                }
                Err(e) => {
                    tracing::debug!(url = %self.config.url, error = %e, "dial failed");
                }
            }

            let delay = backoff.next_delay();
            tracing::debug!(?delay, "reconnecting after backoff");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shared.notify.notified() => {}
            }
        }

        tracing::debug!("client transport stopped");
    }

    /// Pumps one established connection until it closes.
    async fn drive(&mut self, ws: WsStream) -> Result<(), ClientError> {
        let codec = JsonCodec;
        let (mut sink, mut frames) = ws.split();

        let join = codec.encode(&ClientMessage::Join { room: None })?;
        sink.send(Message::Binary(join.into())).await?;

        let period = Duration::from_secs_f64(
            1.0 / self.config.send_rate_hz.max(1) as f64,
        );
        let mut frame_timer = tokio::time::interval(period);
        // Neutral counts as already transmitted: the server starts every
        // connection with neutral intent, so only a change needs a frame.
        let mut last_sent = (false, false);

        loop {
            if self.shared.closed.load(Ordering::SeqCst) {
                let _ = sink.close().await;
                return Ok(());
            }

            tokio::select! {
                frame = frames.next() => {
                    let data: Vec<u8> = match frame {
                        Some(Ok(Message::Binary(data))) => data.into(),
                        Some(Ok(Message::Text(text))) => {
                            text.as_bytes().to_vec()
                        }
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                    };
                    self.handle_server_message(&codec, &data);
                }

                _ = frame_timer.tick() => {
                    let want = match self.shared.want.lock() {
                        Ok(want) => *want,
                        Err(_) => continue,
                    };
                    if last_sent == want {
                        continue;
                    }
                    self.seq += 1;
                    let (up, down) = want;
                    let msg = ClientMessage::Input { seq: self.seq, up, down };
                    sink.send(Message::Binary(codec.encode(&msg)?.into())).await?;
                    last_sent = want;
                }

                cmd = self.commands.recv() => {
                    match cmd {
                        Some(ClientCommand::TogglePause) => {
                            let msg = ClientMessage::Command {
                                command: Command::TogglePause,
                            };
                            sink.send(
                                Message::Binary(codec.encode(&msg)?.into()),
                            ).await?;
                        }
                        // Handle dropped: nothing can steer this transport
                        // anymore, so treat it as a disconnect.
                        None => {
                            self.shared.closed.store(true, Ordering::SeqCst);
                            let _ = sink.close().await;
                            return Ok(());
                        }
                    }
                }

                _ = self.shared.notify.notified() => {
                    // Re-check `closed` at the top of the loop.
                }
            }
        }
    }

    fn handle_server_message(&self, codec: &JsonCodec, data: &[u8]) {
        match codec.decode::<ServerMessage>(data) {
            Ok(ServerMessage::Hello) => {
                tracing::debug!("server greeting received");
            }
            Ok(ServerMessage::State { state }) => {
                let _ = self.events.send(ClientEvent::State(state));
            }
            Ok(ServerMessage::Error { message }) => {
                tracing::warn!(%message, "server reported an error");
            }
            Err(e) => {
                tracing::debug!(error = %e, "undecodable server frame");
            }
        }
    }
}
