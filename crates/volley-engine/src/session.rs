//! The game session: state machine, physics tick, collision and scoring.

use rand::Rng;
use volley_protocol::StateSnapshot;

use crate::state::{
    AI_PURSUIT_FACTOR, ARENA_HEIGHT, ARENA_WIDTH, BALL_BASE_SPEED,
    DEFLECTION_GAIN, InputIntent, MAX_TICK_DT, PADDLE_INSET, PADDLE_SPEED,
    PADDLE_WIDTH, Phase, RALLY_SPEEDUP, SCORE_OUT_MARGIN, SessionState,
};

/// Horizontal direction of a serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeDirection {
    /// Toward the left paddle (negative x velocity).
    Left,
    /// Toward the right paddle (positive x velocity).
    Right,
}

impl ServeDirection {
    fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    fn random() -> Self {
        if rand::rng().random_bool(0.5) {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// The authoritative simulation. Exactly one exists per process.
///
/// The server's session actor is the sole owner; all mutation goes through
/// these methods, and the tick loop is the sole caller of [`tick`](Self::tick).
pub struct GameSession {
    state: SessionState,
    intent: InputIntent,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates an idle session: centered paddles, resting ball, zero scores.
    pub fn new() -> Self {
        Self {
            state: SessionState::new(),
            intent: InputIntent::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Serves the ball from center and enters `Playing`.
    ///
    /// No-op if a round is already in progress. `direction` picks the
    /// horizontal serve direction; `None` chooses randomly. The serve gets a
    /// small random vertical component so rounds don't repeat.
    pub fn start_round(&mut self, direction: Option<ServeDirection>) {
        if self.state.phase == Phase::Playing {
            return;
        }
        let dir = direction.unwrap_or_else(ServeDirection::random);
        self.serve(dir);
        self.state.phase = Phase::Playing;
        self.state.paused = false;
        tracing::info!(direction = ?dir, "round started");
    }

    /// Halts ball motion: `Idle` phase, zero velocity, ball recentered.
    /// Scores are kept — a stopped round is not a reset match.
    pub fn stop_round(&mut self) {
        self.state.phase = Phase::Idle;
        self.state.ball.x = ARENA_WIDTH / 2.0;
        self.state.ball.y = ARENA_HEIGHT / 2.0;
        self.state.ball.vx = 0.0;
        self.state.ball.vy = 0.0;
        tracing::info!("round stopped");
    }

    /// Overwrites the controller's directional intent. Idempotent and safe
    /// to call in any phase; takes effect on the next tick.
    pub fn set_controller_intent(&mut self, up: bool, down: bool) {
        self.intent = InputIntent { up, down };
    }

    /// Flips the pause flag and returns the new value.
    ///
    /// The caller that drives the tick loop must reset its elapsed-time
    /// accumulator when this returns `false`, so the time spent paused is
    /// not integrated as one giant catch-up step on resume.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.state.paused);
        self.state.paused
    }

    /// Sets the pause flag. Idempotent.
    pub fn set_paused(&mut self, paused: bool) {
        if self.state.paused != paused {
            self.state.paused = paused;
            tracing::info!(paused, "pause toggled");
        }
    }

    /// Whether the ball is frozen by pause.
    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// The intent currently applied to the left paddle.
    pub fn controller_intent(&self) -> InputIntent {
        self.intent
    }

    /// Projects the full state for broadcast.
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advances the simulation by `dt` seconds (clamped to [`MAX_TICK_DT`]).
    ///
    /// Paddles move in every phase, so the arena stays interactive between
    /// rounds and while paused. Ball integration, collisions, and scoring
    /// run only while `Playing` and unpaused.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_TICK_DT);
        let s = &mut self.state;

        // Left paddle follows controller intent.
        s.left_paddle.y += self.intent.displacement() * PADDLE_SPEED * dt;

        // Right paddle pursues the ball, rate-limited so it stays beatable.
        if s.right_is_automated {
            let target = s.ball.y - s.right_paddle.height / 2.0;
            let dy = target - s.right_paddle.y;
            let max_step = PADDLE_SPEED * dt * AI_PURSUIT_FACTOR;
            s.right_paddle.y += dy.clamp(-max_step, max_step);
        }

        s.left_paddle.clamp_to_arena();
        s.right_paddle.clamp_to_arena();

        if s.phase != Phase::Playing || s.paused {
            return;
        }

        s.ball.x += s.ball.vx * dt;
        s.ball.y += s.ball.vy * dt;

        // Vertical walls: reflect and clamp so the ball can't tunnel out.
        if s.ball.y - s.ball.radius < 0.0 {
            s.ball.y = s.ball.radius;
            s.ball.vy = s.ball.vy.abs();
        } else if s.ball.y + s.ball.radius > ARENA_HEIGHT {
            s.ball.y = ARENA_HEIGHT - s.ball.radius;
            s.ball.vy = -s.ball.vy.abs();
        }

        // Left paddle. A hit requires the ball's edge to have reached the
        // paddle face, a vertical overlap, and inbound velocity — the
        // velocity check prevents a double trigger while receding.
        let left_face = PADDLE_INSET + PADDLE_WIDTH;
        if s.ball.x - s.ball.radius <= left_face
            && s.ball.vx < 0.0
            && s.ball.y + s.ball.radius >= s.left_paddle.y
            && s.ball.y - s.ball.radius
                <= s.left_paddle.y + s.left_paddle.height
        {
            s.ball.x = left_face + s.ball.radius;
            s.ball.vx = s.ball.vx.abs() * RALLY_SPEEDUP;
            let offset = (s.ball.y - s.left_paddle.center())
                / (s.left_paddle.height / 2.0);
            s.ball.vy += offset * DEFLECTION_GAIN;
        }

        // Right paddle, mirrored.
        let right_face = ARENA_WIDTH - (PADDLE_INSET + PADDLE_WIDTH);
        if s.ball.x + s.ball.radius >= right_face
            && s.ball.vx > 0.0
            && s.ball.y + s.ball.radius >= s.right_paddle.y
            && s.ball.y - s.ball.radius
                <= s.right_paddle.y + s.right_paddle.height
        {
            s.ball.x = right_face - s.ball.radius;
            s.ball.vx = -s.ball.vx.abs() * RALLY_SPEEDUP;
            let offset = (s.ball.y - s.right_paddle.center())
                / (s.right_paddle.height / 2.0);
            s.ball.vy += offset * DEFLECTION_GAIN;
        }

        // Scoring: the ball must fully exit past the margin. Both sides
        // reset-and-continue; the next serve travels away from the side
        // that conceded, as in the original game.
        let next_serve = if s.ball.x < -SCORE_OUT_MARGIN {
            s.right_score += 1;
            Some(ServeDirection::Right)
        } else if s.ball.x > ARENA_WIDTH + SCORE_OUT_MARGIN {
            s.left_score += 1;
            Some(ServeDirection::Left)
        } else {
            None
        };

        if let Some(dir) = next_serve {
            tracing::info!(
                left = self.state.left_score,
                right = self.state.right_score,
                "point scored"
            );
            self.serve(dir);
        }
    }

    /// Places the ball at center with base speed in `dir` and a small
    /// random vertical component.
    fn serve(&mut self, dir: ServeDirection) {
        let ball = &mut self.state.ball;
        ball.x = ARENA_WIDTH / 2.0;
        ball.y = ARENA_HEIGHT / 2.0;
        ball.vx = BALL_BASE_SPEED * dir.sign();
        ball.vy = BALL_BASE_SPEED * rand::rng().random_range(-0.2..0.2);
    }
}

// =========================================================================
// Tests
// =========================================================================
