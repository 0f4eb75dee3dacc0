//! Reconnect delay schedule.

use std::time::Duration;

/// Exponential backoff with a floor and a ceiling.
///
/// Delays form the sequence `f, f*m, f*m^2, …` truncated at the ceiling,
/// which makes them non-decreasing and bounded. [`reset()`](Self::reset)
/// returns to the floor after a successful connection.
#[derive(Debug, Clone)]
pub struct Backoff {
    floor: Duration,
    factor: f64,
    ceiling: Duration,
    current: Duration,
}

impl Backoff {
    /// Creates a schedule from its three parameters.
    pub fn new(floor: Duration, factor: f64, ceiling: Duration) -> Self {
        Self {
            floor,
            factor,
            ceiling,
            current: floor,
        }
    }

    /// Returns the delay before the next attempt and advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.mul_f64(self.factor).min(self.ceiling);
        delay
    }

    /// Restarts the schedule from the floor.
    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}

impl Default for Backoff {
    /// Floor 500ms, factor 1.7, ceiling 8s.
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 1.7, Duration::from_secs(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sequence() {
        let mut backoff = Backoff::default();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_millis(850));
        assert_eq!(backoff.next_delay(), Duration::from_millis(1445));
    }

    #[test]
    fn test_saturates_at_ceiling() {
        let mut backoff = Backoff::default();
        let mut last = Duration::ZERO;
        for _ in 0..20 {
            let delay = backoff.next_delay();
            assert!(delay >= last, "delays must be non-decreasing");
            assert!(delay <= Duration::from_secs(8));
            last = delay;
        }
        assert_eq!(last, Duration::from_secs(8));
    }

    #[test]
    fn test_reset_returns_to_floor() {
        let mut backoff = Backoff::default();
        for _ in 0..5 {
            backoff.next_delay();
        }
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    }
}
