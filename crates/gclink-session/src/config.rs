//! Session tunables.

use std::time::Duration;

use gclink_protocol::{Engine, GameId};
use rand::Rng;
use tracing::warn;

/// Timing and identity settings for a GC session.
///
/// Every duration has a sensible default. Create one with
/// `SessionConfig::default()` and override just the fields you care about.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Which game's coordinator to talk to.
    pub game: GameId,
    /// Engine generation announced in the hello.
    pub engine: Engine,
    /// Client version sent with lobby commands that carry one.
    pub client_version: u32,
    /// Pause between announcing the game and the first hello.
    ///
    /// Default: 1 second.
    pub launch_delay: Duration,
    /// Period of hello retransmission while no session exists.
    ///
    /// Default: 30 seconds.
    pub hello_interval: Duration,
    /// Wait before reconnecting after an unexpected disconnect.
    ///
    /// Default: 5 seconds.
    pub reconnect_delay: Duration,
    /// Random extra wait (0 up to this value) added to `reconnect_delay`, so
    /// a fleet of clients does not reconnect in lockstep.
    ///
    /// Default: 1 second.
    pub reconnect_jitter: Duration,
    /// How long `connect` waits for the session to become ready.
    ///
    /// Default: 60 seconds.
    pub ready_timeout: Duration,
    /// Default timeout of correlated requests.
    ///
    /// Default: 10 seconds.
    pub request_timeout: Duration,
    /// Capacity of the event broadcast channel. Slow subscribers that fall
    /// further behind than this miss events.
    ///
    /// Default: 256.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameId::DOTA2,
            engine: Engine::Source2,
            client_version: 0,
            launch_delay: Duration::from_secs(1),
            hello_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(5),
            reconnect_jitter: Duration::from_secs(1),
            ready_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
            event_capacity: 256,
        }
    }
}

impl SessionConfig {
    /// Shortest hello period accepted.
    pub const MIN_HELLO_INTERVAL: Duration = Duration::from_millis(100);
    /// Smallest event channel accepted.
    pub const MIN_EVENT_CAPACITY: usize = 16;

    /// Clamp any out-of-range values so the config is safe to use.
    ///
    /// Rules:
    /// - `hello_interval` at least [`Self::MIN_HELLO_INTERVAL`].
    /// - `event_capacity` at least [`Self::MIN_EVENT_CAPACITY`].
    /// - `ready_timeout` and `request_timeout` non-zero (zero becomes the
    ///   default).
    pub fn validated(mut self) -> Self {
        if self.hello_interval < Self::MIN_HELLO_INTERVAL {
            warn!(
                interval_ms = self.hello_interval.as_millis() as u64,
                "hello_interval below minimum, clamping"
            );
            self.hello_interval = Self::MIN_HELLO_INTERVAL;
        }
        if self.event_capacity < Self::MIN_EVENT_CAPACITY {
            self.event_capacity = Self::MIN_EVENT_CAPACITY;
        }
        let defaults = Self::default();
        if self.ready_timeout.is_zero() {
            self.ready_timeout = defaults.ready_timeout;
        }
        if self.request_timeout.is_zero() {
            self.request_timeout = defaults.request_timeout;
        }
        self
    }

    /// Wait before the next reconnect attempt: the fixed delay plus jitter.
    pub fn reconnect_backoff(&self) -> Duration {
        let jitter_ms = self.reconnect_jitter.as_millis() as u64;
        let extra = if jitter_ms > 0 {
            Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };
        self.reconnect_delay + extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.game, GameId::DOTA2);
        assert_eq!(cfg.launch_delay, Duration::from_secs(1));
        assert_eq!(cfg.hello_interval, Duration::from_secs(30));
        assert_eq!(cfg.reconnect_delay, Duration::from_secs(5));
        assert_eq!(cfg.ready_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validated_clamps_hello_interval_and_capacity() {
        let cfg = SessionConfig {
            hello_interval: Duration::ZERO,
            event_capacity: 1,
            ready_timeout: Duration::ZERO,
            ..Default::default()
        }
        .validated();
        assert_eq!(cfg.hello_interval, SessionConfig::MIN_HELLO_INTERVAL);
        assert_eq!(cfg.event_capacity, SessionConfig::MIN_EVENT_CAPACITY);
        assert_eq!(cfg.ready_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_reconnect_backoff_within_jitter_window() {
        let cfg = SessionConfig::default();
        for _ in 0..50 {
            let wait = cfg.reconnect_backoff();
            assert!(wait >= cfg.reconnect_delay);
            assert!(wait <= cfg.reconnect_delay + cfg.reconnect_jitter);
        }
    }

    #[test]
    fn test_reconnect_backoff_without_jitter_is_fixed() {
        let cfg = SessionConfig {
            reconnect_jitter: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(cfg.reconnect_backoff(), cfg.reconnect_delay);
    }
}
