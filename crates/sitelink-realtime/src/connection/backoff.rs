//! Exponential reconnect backoff.

use std::time::Duration;

use sitelink_core::config::realtime::RealtimeConfig;

/// Computes the delay before each reconnect attempt.
///
/// Delays double per attempt from `base` up to `max`; the attempt counter
/// itself is unbounded, so a persistently unreachable backend is retried
/// forever at the capped interval.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    base: Duration,
    max: Duration,
}

impl ReconnectPolicy {
    /// Create a policy with explicit bounds.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// Build from configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reconnect_base_delay_ms),
            Duration::from_millis(config.reconnect_max_delay_ms),
        )
    }

    /// Delay before the given 1-based attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let multiplier = 1u64 << exponent;
        let delay_ms = (self.base.as_millis() as u64).saturating_mul(multiplier);
        Duration::from_millis(delay_ms).min(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_until_the_cap() {
        let policy = ReconnectPolicy::new(Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(4), Duration::from_millis(800));
        assert_eq!(policy.delay(5), Duration::from_secs(1));
        assert_eq!(policy.delay(50), Duration::from_secs(1));
    }

    #[test]
    fn large_attempt_numbers_do_not_overflow() {
        let policy = ReconnectPolicy::new(Duration::from_millis(500), Duration::from_secs(30));
        assert_eq!(policy.delay(u32::MAX), Duration::from_secs(30));
    }
}
