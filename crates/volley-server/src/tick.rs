//! Fixed-cadence tick source for the session actor.
//!
//! Wraps a Tokio interval and measures the wall-clock delta between firings.
//! The simulation clamps `dt` itself; this type's job is cadence and the
//! ability to forget accumulated time across a pause.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Drives the session actor's `tokio::select!` loop at a fixed rate.
///
/// Designed to sit next to the command channel:
///
/// ```ignore
/// loop {
///     tokio::select! {
///         Some(cmd) = rx.recv() => { /* handle commands */ }
///         dt = ticker.next_tick() => {
///             game.tick(dt);
///             broadcast(game.snapshot());
///         }
///     }
/// }
/// ```
pub struct TickSource {
    interval: Interval,
    last: Instant,
}

impl TickSource {
    /// Creates a tick source firing `rate_hz` times per second.
    ///
    /// Missed ticks are delayed rather than burst: if the actor stalls, the
    /// next tick fires once and the schedule slides forward, which together
    /// with the simulation's `dt` clamp prevents catch-up death spirals.
    pub fn new(rate_hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(rate_hz, ?period, "tick source created");
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Waits until the next tick is due and returns the elapsed wall-clock
    /// seconds since the previous tick (unclamped).
    pub async fn next_tick(&mut self) -> f32 {
        self.interval.tick().await;
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt
    }

    /// Forgets accumulated elapsed time and restarts the cadence from now.
    ///
    /// Called when the session unpauses or a round starts, so the time
    /// spent idle isn't handed to the simulation as one giant step.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.interval.reset();
    }
}

#[cfg(test)]
mod tests {
    //! Timing tests use `start_paused` so Tokio's clock auto-advances and
    //! the assertions are deterministic.

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_next_tick_reports_period_delta() {
        let mut ticker = TickSource::new(20);

        // First firing is immediate for a fresh interval; skip it.
        let _ = ticker.next_tick().await;

        let dt = ticker.next_tick().await;
        assert!((dt - 0.05).abs() < 1e-3, "expected ~50ms, got {dt}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_swallows_elapsed_time() {
        let mut ticker = TickSource::new(20);
        let _ = ticker.next_tick().await;

        // A long stall (e.g. paused game) followed by a reset must not
        // report the stall as delta time.
        tokio::time::advance(Duration::from_secs(5)).await;
        ticker.reset();

        let dt = ticker.next_tick().await;
        assert!(dt < 0.1, "reset should forget the stall, got {dt}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_zero_is_clamped() {
        // Guards against a divide-by-zero period; 0 Hz makes no sense for
        // a continuous simulation.
        let mut ticker = TickSource::new(0);
        let _ = ticker.next_tick().await;
        let dt = ticker.next_tick().await;
        assert!(dt > 0.5, "0 Hz should degrade to 1 Hz, got {dt}");
    }
}
