//! Session state: the arena, paddles, ball, and scores.
//!
//! All coordinates use the arena's logical units with the origin at the
//! top-left corner and y growing downward, matching the renderer.

use volley_protocol::StateSnapshot;

// ---------------------------------------------------------------------------
// Arena constants
// ---------------------------------------------------------------------------

/// Logical arena width. Fixed for the lifetime of a session.
pub const ARENA_WIDTH: f32 = 720.0;
/// Logical arena height.
pub const ARENA_HEIGHT: f32 = 420.0;
/// Paddle width (collision plane thickness).
pub const PADDLE_WIDTH: f32 = 10.0;
/// Paddle height.
pub const PADDLE_HEIGHT: f32 = 90.0;
/// Horizontal gap between the arena edge and a paddle's back face.
pub const PADDLE_INSET: f32 = 24.0;
/// Paddle travel speed in units per second.
pub const PADDLE_SPEED: f32 = 360.0;
/// Ball radius.
pub const BALL_RADIUS: f32 = 6.0;
/// Horizontal serve speed in units per second.
pub const BALL_BASE_SPEED: f32 = 280.0;

/// Simulation tick rate.
pub const TICK_HZ: u32 = 60;

/// Upper bound on a single tick's `dt`, in seconds. Bounds worst-case
/// integration error when the host stalls (GC pause, suspended laptop).
pub const MAX_TICK_DT: f32 = 0.05;

/// Horizontal speed multiplier applied on each paddle hit. Greater than 1,
/// so a rally speeds up until someone misses.
pub(crate) const RALLY_SPEEDUP: f32 = 1.03;

/// Vertical speed added per unit of normalized paddle-center offset on a
/// hit. Hitting near a paddle edge imparts a stronger deflection — this is
/// the core skill mechanic.
pub(crate) const DEFLECTION_GAIN: f32 = 80.0;

/// Fraction of full paddle speed the automated right paddle may use per
/// tick while pursuing the ball. Below 1.0 so the AI can be outplayed.
pub(crate) const AI_PURSUIT_FACTOR: f32 = 0.7;

/// How far past the arena boundary the ball must travel before a score is
/// awarded. Keeps a ball that grazes the boundary during a paddle save from
/// counting as out.
pub(crate) const SCORE_OUT_MARGIN: f32 = 20.0;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// Whether the ball is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No ball motion. Paddles remain controllable.
    Idle,
    /// Physics integrates ball velocity each tick.
    Playing,
}

/// The controller's current directional intent.
///
/// Distinct from paddle position: the controller sends only intent, never
/// position, and the server integrates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub up: bool,
    pub down: bool,
}

impl InputIntent {
    /// Net direction for this intent: `-1` up, `+1` down, `0` when neither
    /// or both directions are held (opposing keys cancel).
    pub fn displacement(self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// A paddle: vertical position of its top edge plus its height.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paddle {
    pub y: f32,
    pub height: f32,
}

impl Paddle {
    pub(crate) fn centered() -> Self {
        Self {
            y: (ARENA_HEIGHT - PADDLE_HEIGHT) / 2.0,
            height: PADDLE_HEIGHT,
        }
    }

    /// Re-establishes the invariant `0 <= y <= arena_height - height`.
    /// Called after every position update.
    pub(crate) fn clamp_to_arena(&mut self) {
        self.y = self.y.clamp(0.0, ARENA_HEIGHT - self.height);
    }

    pub(crate) fn center(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Ball {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Ball {
    pub(crate) fn resting() -> Self {
        Self {
            x: ARENA_WIDTH / 2.0,
            y: ARENA_HEIGHT / 2.0,
            radius: BALL_RADIUS,
            vx: 0.0,
            vy: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The complete authoritative state of the single game session.
///
/// Owned exclusively by [`GameSession`](crate::GameSession); nothing outside
/// this crate mutates fields directly.
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    pub phase: Phase,
    /// Independent of `phase`: while paused, paddle motion continues but
    /// ball motion and scoring freeze.
    pub paused: bool,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub ball: Ball,
    pub left_score: u32,
    pub right_score: u32,
    /// The right paddle is AI-driven; there is no second human controller.
    pub right_is_automated: bool,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            paused: false,
            left_paddle: Paddle::centered(),
            right_paddle: Paddle::centered(),
            ball: Ball::resting(),
            left_score: 0,
            right_score: 0,
            right_is_automated: true,
        }
    }

    /// Projects the state into the wire snapshot clients render from.
    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            left_y: self.left_paddle.y,
            right_y: self.right_paddle.y,
            paddle_w: PADDLE_WIDTH,
            paddle_h: PADDLE_HEIGHT,
            ball_x: self.ball.x,
            ball_y: self.ball.y,
            ball_r: self.ball.radius,
            left_score: self.left_score,
            right_score: self.right_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_displacement_precedence() {
        let neutral = InputIntent::default();
        assert_eq!(neutral.displacement(), 0.0);

        let up = InputIntent {
            up: true,
            down: false,
        };
        assert_eq!(up.displacement(), -1.0);

        let down = InputIntent {
            up: false,
            down: true,
        };
        assert_eq!(down.displacement(), 1.0);

        // Opposing keys cancel rather than favoring either direction.
        let both = InputIntent {
            up: true,
            down: true,
        };
        assert_eq!(both.displacement(), 0.0);
    }

    #[test]
    fn test_paddle_clamp() {
        let mut p = Paddle::centered();
        p.y = -50.0;
        p.clamp_to_arena();
        assert_eq!(p.y, 0.0);

        p.y = ARENA_HEIGHT;
        p.clamp_to_arena();
        assert_eq!(p.y, ARENA_HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn test_initial_snapshot_is_centered() {
        let snap = SessionState::new().snapshot();
        assert_eq!(snap.ball_x, ARENA_WIDTH / 2.0);
        assert_eq!(snap.ball_y, ARENA_HEIGHT / 2.0);
        assert_eq!(snap.left_y, snap.right_y);
        assert_eq!(snap.left_score, 0);
        assert_eq!(snap.right_score, 0);
    }
}
