//! Exponential backoff for object-storage listing.
//!
//! Listing runs constantly (storyboard refreshes, completion watchers), so
//! a flapping provider must not be hammered. After a failure the next
//! listing is blocked for a delay that doubles per consecutive failure,
//! capped at four minutes; attempts inside the window are suppressed
//! without touching the provider, and a success resets the delay.

use std::time::{Duration, Instant};

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay applied after the first failure.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each consecutive failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(240),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`BackoffConfig::max_delay`].
pub fn next_delay(current: Duration, config: &BackoffConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Outcome of asking whether a listing attempt may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// No window is open; go ahead.
    Allowed,
    /// A window is open; wait at least this long.
    Suppressed { retry_in: Duration },
}

/// Backoff state machine for one listing target.
///
/// Time is passed in explicitly so the transitions stay testable without
/// sleeping.
#[derive(Debug)]
pub struct ListingBackoff {
    config: BackoffConfig,
    /// Delay to apply on the next failure; `None` until a failure occurs.
    current_delay: Option<Duration>,
    /// End of the open suppression window, if one is open.
    blocked_until: Option<Instant>,
}

impl ListingBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            current_delay: None,
            blocked_until: None,
        }
    }

    /// May a listing attempt proceed at `now`?
    pub fn check(&self, now: Instant) -> Attempt {
        match self.blocked_until {
            Some(until) if now < until => Attempt::Suppressed {
                retry_in: until - now,
            },
            _ => Attempt::Allowed,
        }
    }

    /// Record a successful listing: close any window and reset the delay.
    pub fn record_success(&mut self) {
        self.current_delay = None;
        self.blocked_until = None;
    }

    /// Record a failed listing: open a suppression window and grow the
    /// delay for the next failure.
    pub fn record_failure(&mut self, now: Instant) {
        let delay = match self.current_delay {
            None => self.config.initial_delay.min(self.config.max_delay),
            Some(current) => next_delay(current, &self.config),
        };
        self.blocked_until = Some(now + delay);
        self.current_delay = Some(delay);
    }

    /// The delay the most recent failure applied, if any.
    pub fn current_delay(&self) -> Option<Duration> {
        self.current_delay
    }
}

impl Default for ListingBackoff {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let config = BackoffConfig::default();
        assert_eq!(
            next_delay(Duration::from_secs(5), &config),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let config = BackoffConfig::default();
        assert_eq!(
            next_delay(Duration::from_secs(200), &config),
            Duration::from_secs(240)
        );
    }

    #[test]
    fn delay_doubles_per_consecutive_failure_up_to_cap() {
        let mut backoff = ListingBackoff::default();
        let now = Instant::now();
        let expected = [5, 10, 20, 40, 80, 160, 240, 240];

        for &secs in &expected {
            backoff.record_failure(now);
            assert_eq!(backoff.current_delay(), Some(Duration::from_secs(secs)));
        }
    }

    #[test]
    fn success_resets_the_delay() {
        let mut backoff = ListingBackoff::default();
        let now = Instant::now();

        backoff.record_failure(now);
        backoff.record_failure(now);
        assert_eq!(backoff.current_delay(), Some(Duration::from_secs(10)));

        backoff.record_success();
        assert_eq!(backoff.current_delay(), None);
        assert_eq!(backoff.check(now), Attempt::Allowed);

        // The sequence restarts from the initial delay.
        backoff.record_failure(now);
        assert_eq!(backoff.current_delay(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn attempts_inside_the_window_are_suppressed() {
        let mut backoff = ListingBackoff::default();
        let now = Instant::now();

        assert_eq!(backoff.check(now), Attempt::Allowed);
        backoff.record_failure(now);

        match backoff.check(now + Duration::from_secs(2)) {
            Attempt::Suppressed { retry_in } => {
                assert_eq!(retry_in, Duration::from_secs(3));
            }
            Attempt::Allowed => panic!("expected suppression inside the window"),
        }

        assert_eq!(backoff.check(now + Duration::from_secs(5)), Attempt::Allowed);
    }
}
