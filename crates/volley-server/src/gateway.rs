//! WebSocket gateway: accept loop, upgrade validation, message routing.
//!
//! Each accepted socket gets its own Tokio task. The task performs the
//! WebSocket upgrade (rejecting wrong paths and foreign origins before any
//! protocol message is exchanged), registers with the session actor to get
//! a role, then pumps frames in both directions until the peer goes away.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response,
};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use volley_protocol::{ClientMessage, Codec, Command, JsonCodec, ServerMessage};

use crate::session::{ConnectionId, SessionHandle};
use crate::GatewayError;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Default upgrade path, matching the browser client.
pub const DEFAULT_PATH: &str = "/ws/pong";

/// Gateway settings shared by all connection tasks.
struct GatewayShared {
    path: String,
    allowed_origin: Option<String>,
}

/// Builder for configuring and starting a Volley server.
///
/// # Example
///
/// ```rust,ignore
/// let server = VolleyServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .allowed_origin("https://localhost:5173")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct VolleyServerBuilder {
    bind_addr: String,
    path: String,
    allowed_origin: Option<String>,
}

impl VolleyServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            path: DEFAULT_PATH.to_string(),
            allowed_origin: None,
        }
    }

    /// Sets the address to bind the listener to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the reserved upgrade path.
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Restricts upgrades to requests whose Origin header exactly matches
    /// `origin`. Requests without an Origin header are still tolerated
    /// (non-browser clients don't send one).
    pub fn allowed_origin(mut self, origin: &str) -> Self {
        self.allowed_origin = Some(origin.to_string());
        self
    }

    /// Binds the listener and spawns the session actor.
    pub async fn build(self) -> Result<VolleyServer, GatewayError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(GatewayError::Bind)?;
        tracing::info!(addr = %self.bind_addr, path = %self.path, "gateway listening");

        Ok(VolleyServer {
            listener,
            shared: Arc::new(GatewayShared {
                path: self.path,
                allowed_origin: self.allowed_origin,
            }),
            session: SessionHandle::spawn(),
        })
    }
}

impl Default for VolleyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Volley server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct VolleyServer {
    listener: TcpListener,
    shared: Arc<GatewayShared>,
    session: SessionHandle,
}

impl VolleyServer {
    /// Creates a new builder.
    pub fn builder() -> VolleyServerBuilder {
        VolleyServerBuilder::new()
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the session actor (for shutdown and tests).
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), GatewayError> {
        tracing::info!("volley server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    tracing::debug!(%addr, "inbound connection");
                    let shared = Arc::clone(&self.shared);
                    let session = self.session.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, shared, session).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Builds the rejection response for an invalid upgrade request.
///
/// The body stays empty: a rejected peer learns nothing beyond the status.
fn reject(status: StatusCode) -> ErrorResponse {
    let mut resp = ErrorResponse::new(None);
    *resp.status_mut() = status;
    resp
}

/// Handles a single connection from upgrade to close.
async fn handle_connection(
    stream: TcpStream,
    shared: Arc<GatewayShared>,
    session: SessionHandle,
) -> Result<(), GatewayError> {
    // Validate path and origin during the upgrade, before any protocol
    // message is exchanged.
    let callback = {
        let shared = Arc::clone(&shared);
        move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            if req.uri().path() != shared.path {
                tracing::debug!(
                    path = %req.uri().path(),
                    "rejecting upgrade: wrong path"
                );
                return Err(reject(StatusCode::NOT_FOUND));
            }
            if let (Some(allowed), Some(origin)) =
                (&shared.allowed_origin, req.headers().get("origin"))
            {
                if origin.to_str().ok() != Some(allowed.as_str()) {
                    tracing::warn!("rejecting upgrade: origin mismatch");
                    return Err(reject(StatusCode::FORBIDDEN));
                }
            }
            Ok(resp)
        }
    };

    let ws = tokio_tungstenite::accept_hdr_async(stream, callback).await?;
    let conn_id =
        ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
    let codec = JsonCodec;

    let (mut sink, mut frames) = ws.split();

    // Greeting goes out before the broadcast channel is registered, so
    // `hello` is always the first message a peer sees.
    let hello = codec.encode(&ServerMessage::Hello)?;
    sink.send(Message::Binary(hello.into())).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let role = session.join(conn_id, tx.clone()).await?;
    tracing::info!(%conn_id, ?role, "connection accepted");

    // Writer task: drains this peer's channel into the socket. Exits when
    // the channel closes (peer dropped by the session, or this task ends).
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let bytes = match codec.encode(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(error = %e, "encode failed");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Reader loop: route inbound frames until the peer disconnects.
    while let Some(frame) = frames.next().await {
        let data: Vec<u8> = match frame {
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Binary(data)) => data.into(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/raw frame
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        match codec.decode::<ClientMessage>(&data) {
            Ok(ClientMessage::Join { room }) => {
                // Single session per process; `room` is reserved.
                tracing::debug!(%conn_id, ?room, "join message");
            }
            Ok(ClientMessage::Input { seq, up, down }) => {
                session.input(conn_id, seq, up, down).await?;
            }
            Ok(ClientMessage::Command {
                command: Command::TogglePause,
            }) => {
                session.toggle_pause(conn_id).await?;
            }
            Err(e) => {
                // Reply to this peer only; the session is untouched and
                // the connection stays open.
                tracing::debug!(%conn_id, error = %e, "unparseable frame");
                let _ = tx.send(ServerMessage::Error {
                    message: "bad message".to_string(),
                });
            }
        }
    }

    let _ = session.leave(conn_id).await;
    drop(tx);
    let _ = writer.await;
    tracing::info!(%conn_id, "connection closed");
    Ok(())
}
