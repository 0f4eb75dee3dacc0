//! Wire message types for Volley.
//!
//! Every message on the wire is a JSON object with a lowercase `"type"` tag.
//! Browser clients parse these directly, so the JSON shapes here are part of
//! the public contract and are pinned by the tests at the bottom of this file.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// A message sent by a client to the server.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "input", "seq": 3, "up": true, "down": false }` rather than
/// `{ "Input": { ... } }`. Together with `rename_all = "lowercase"` this
/// matches the wire format the browser client expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// First message after the socket opens. `room` is reserved for future
    /// multi-room support; the server currently runs a single session and
    /// ignores it.
    Join {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },

    /// The controller's current directional intent.
    ///
    /// `seq` increments once per transmitted message. It is informational:
    /// the server never validates it for gaps — the most recent received
    /// intent wins.
    Input { seq: u64, up: bool, down: bool },

    /// A one-shot command, sent on a key edge rather than per frame.
    Command { command: Command },
}

/// Commands a client can issue outside the per-frame intent stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Start the round from idle, or toggle pause while playing.
    #[serde(rename = "togglePause")]
    TogglePause,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// A message sent by the server to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Greeting dispatched once per connection, immediately after accept.
    Hello,

    /// Full authoritative state, broadcast every tick.
    State { state: StateSnapshot },

    /// Per-connection error reply (e.g. an unparseable frame). Receiving
    /// one does not mean the connection is closing.
    Error { message: String },
}

/// The full projection of session state that clients render from.
///
/// All fields are numeric and none are optional — a renderer never has to
/// merge partial snapshots. Field names are camelCase on the wire
/// (`leftY`, `ballX`, ...) for the browser client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub width: f32,
    pub height: f32,
    pub left_y: f32,
    pub right_y: f32,
    pub paddle_w: f32,
    pub paddle_h: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_r: f32,
    pub left_score: u32,
    pub right_score: u32,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire format is consumed by a browser client that parses these
    //! shapes by hand, so the tests pin exact JSON rather than just
    //! round-tripping through serde.

    use super::*;

    fn snapshot() -> StateSnapshot {
        StateSnapshot {
            width: 720.0,
            height: 420.0,
            left_y: 165.0,
            right_y: 165.0,
            paddle_w: 10.0,
            paddle_h: 90.0,
            ball_x: 360.0,
            ball_y: 210.0,
            ball_r: 6.0,
            left_score: 0,
            right_score: 0,
        }
    }

    // =====================================================================
    // ClientMessage
    // =====================================================================

    #[test]
    fn test_join_json_format() {
        let msg = ClientMessage::Join {
            room: Some("lobby".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "join");
        assert_eq!(json["room"], "lobby");
    }

    #[test]
    fn test_join_without_room_omits_field() {
        // `skip_serializing_if` keeps `"room": null` off the wire.
        let msg = ClientMessage::Join { room: None };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "join");
        assert!(json.get("room").is_none());
    }

    #[test]
    fn test_join_parses_without_room() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Join { room: None });
    }

    #[test]
    fn test_input_json_format() {
        let msg = ClientMessage::Input {
            seq: 7,
            up: true,
            down: false,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "input");
        assert_eq!(json["seq"], 7);
        assert_eq!(json["up"], true);
        assert_eq!(json["down"], false);
    }

    #[test]
    fn test_input_round_trip() {
        let msg = ClientMessage::Input {
            seq: 42,
            up: false,
            down: true,
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ClientMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_command_json_format() {
        let msg = ClientMessage::Command {
            command: Command::TogglePause,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "command");
        assert_eq!(json["command"], "togglePause");
    }

    #[test]
    fn test_input_missing_fields_fails() {
        // `up`/`down` are required — a truncated input frame must not parse.
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"input","seq":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_type_tag_fails() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"teleport","x":1}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerMessage
    // =====================================================================

    #[test]
    fn test_hello_json_format() {
        let json = serde_json::to_string(&ServerMessage::Hello).unwrap();
        assert_eq!(json, r#"{"type":"hello"}"#);
    }

    #[test]
    fn test_state_json_format() {
        let msg = ServerMessage::State { state: snapshot() };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "state");
        assert_eq!(json["state"]["width"], 720.0);
        assert_eq!(json["state"]["leftY"], 165.0);
        assert_eq!(json["state"]["ballX"], 360.0);
        assert_eq!(json["state"]["leftScore"], 0);
    }

    #[test]
    fn test_snapshot_fields_are_camel_case() {
        let json: serde_json::Value =
            serde_json::to_value(snapshot()).unwrap();
        for field in [
            "width",
            "height",
            "leftY",
            "rightY",
            "paddleW",
            "paddleH",
            "ballX",
            "ballY",
            "ballR",
            "leftScore",
            "rightScore",
        ] {
            assert!(
                json.get(field).is_some(),
                "snapshot is missing field {field}"
            );
        }
    }

    #[test]
    fn test_error_json_format() {
        let msg = ServerMessage::Error {
            message: "bad message".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "bad message");
    }

    #[test]
    fn test_state_round_trip() {
        let msg = ServerMessage::State { state: snapshot() };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<ClientMessage, _> =
            serde_json::from_slice(b"not json at all");
        assert!(result.is_err());
    }
}
