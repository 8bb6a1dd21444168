//! Backoff policies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A stateful sequence of wait intervals.
///
/// `next_backoff` returns `None` once the budget is spent. A policy instance
/// covers one read session; build a fresh one (or [`reset`](BackOff::reset))
/// before the next.
pub trait BackOff {
    /// Returns the next interval to wait, or `None` to stop retrying.
    fn next_backoff(&mut self) -> Option<Duration>;

    /// Restores the initial state.
    fn reset(&mut self);
}

/// Parameters of an [`ExponentialBackOff`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackOffConfig {
    /// First interval in milliseconds
    pub initial_interval_ms: u64,
    /// Growth factor applied after every interval (values below 1.0, and
    /// non-finite values, act as 1.0)
    pub multiplier: f64,
    /// Upper bound for any single interval in milliseconds
    pub max_interval_ms: u64,
    /// Number of retries before stopping
    pub max_retries: u32,
    /// Upper bound for the sum of all intervals in milliseconds
    pub max_cumulative_backoff_ms: u64,
}

impl Default for BackOffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 10_000,
            multiplier: 1.5,
            max_interval_ms: 300_000,
            max_retries: 4,
            max_cumulative_backoff_ms: 600_000,
        }
    }
}

impl BackOffConfig {
    /// A policy that retries `max_retries` times without waiting.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            initial_interval_ms: 0,
            max_retries,
            ..Self::default()
        }
    }

    /// Builds a fresh policy in its initial state.
    pub fn backoff(&self) -> ExponentialBackOff {
        ExponentialBackOff::new(self.clone())
    }
}

/// Exponentially growing intervals bounded by a retry count and a
/// cumulative-time budget.
///
/// The interval that would cross the cumulative budget is truncated to fit
/// it exactly; the call after that stops. The sequence is fully determined
/// by the config.
#[derive(Debug, Clone)]
pub struct ExponentialBackOff {
    config: BackOffConfig,
    retries: u32,
    current: Duration,
    cumulative: Duration,
}

impl ExponentialBackOff {
    pub fn new(config: BackOffConfig) -> Self {
        let current = Duration::from_millis(config.initial_interval_ms);
        Self {
            config,
            retries: 0,
            current,
            cumulative: Duration::ZERO,
        }
    }

    /// Retries handed out so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Sum of all intervals handed out so far.
    pub fn cumulative(&self) -> Duration {
        self.cumulative
    }

    pub fn config(&self) -> &BackOffConfig {
        &self.config
    }

    // Non-finite multipliers act as 1.0; a product past `Duration::MAX`
    // saturates at the max interval.
    fn grow(&self, max_interval: Duration) -> Duration {
        let multiplier = if self.config.multiplier.is_finite() {
            self.config.multiplier.max(1.0)
        } else {
            1.0
        };
        Duration::try_from_secs_f64(self.current.as_secs_f64() * multiplier)
            .unwrap_or(max_interval)
            .min(max_interval)
    }
}

impl Default for ExponentialBackOff {
    fn default() -> Self {
        Self::new(BackOffConfig::default())
    }
}

impl BackOff for ExponentialBackOff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.config.max_retries {
            return None;
        }

        let budget = Duration::from_millis(self.config.max_cumulative_backoff_ms);
        let max_interval = Duration::from_millis(self.config.max_interval_ms);
        let remaining = budget.checked_sub(self.cumulative)?;
        if remaining.is_zero() && !self.current.is_zero() {
            return None;
        }

        let interval = self.current.min(max_interval).min(remaining);
        self.retries += 1;
        self.cumulative += interval;
        self.current = self.grow(max_interval);

        Some(interval)
    }

    fn reset(&mut self) {
        self.retries = 0;
        self.current = Duration::from_millis(self.config.initial_interval_ms);
        self.cumulative = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(backoff: &mut impl BackOff) -> Vec<Duration> {
        std::iter::from_fn(|| backoff.next_backoff()).collect()
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_default_config() {
        let config = BackOffConfig::default();
        assert_eq!(config.initial_interval_ms, 10_000);
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.multiplier, 1.5);
    }

    #[test]
    fn test_exponential_growth_and_retry_limit() {
        let mut backoff = BackOffConfig {
            initial_interval_ms: 100,
            multiplier: 2.0,
            max_interval_ms: 10_000,
            max_retries: 4,
            max_cumulative_backoff_ms: 60_000,
        }
        .backoff();

        assert_eq!(drain(&mut backoff), vec![ms(100), ms(200), ms(400), ms(800)]);
        assert_eq!(backoff.retries(), 4);
        assert_eq!(backoff.cumulative(), ms(1_500));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_max_interval_caps_each_wait() {
        let mut backoff = BackOffConfig {
            initial_interval_ms: 100,
            multiplier: 10.0,
            max_interval_ms: 500,
            max_retries: 3,
            max_cumulative_backoff_ms: 60_000,
        }
        .backoff();

        assert_eq!(drain(&mut backoff), vec![ms(100), ms(500), ms(500)]);
    }

    #[test]
    fn test_cumulative_budget_truncates_and_stops() {
        let mut backoff = BackOffConfig {
            initial_interval_ms: 400,
            multiplier: 1.0,
            max_interval_ms: 10_000,
            max_retries: 100,
            max_cumulative_backoff_ms: 1_000,
        }
        .backoff();

        assert_eq!(drain(&mut backoff), vec![ms(400), ms(400), ms(200)]);
        assert_eq!(backoff.cumulative(), ms(1_000));
    }

    #[test]
    fn test_zero_budget_stops_immediately() {
        let mut backoff = BackOffConfig {
            max_cumulative_backoff_ms: 0,
            ..BackOffConfig::default()
        }
        .backoff();
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_immediate_policy() {
        let mut backoff = BackOffConfig::immediate(3).backoff();
        assert_eq!(drain(&mut backoff), vec![Duration::ZERO; 3]);
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let config = BackOffConfig {
            initial_interval_ms: 10,
            multiplier: 2.0,
            max_interval_ms: 1_000,
            max_retries: 2,
            max_cumulative_backoff_ms: 1_000,
        };
        let mut backoff = config.backoff();
        let first = drain(&mut backoff);
        backoff.reset();
        assert_eq!(drain(&mut backoff), first);
    }

    #[test]
    fn test_deterministic_for_same_config() {
        let config = BackOffConfig::default();
        assert_eq!(drain(&mut config.backoff()), drain(&mut config.backoff()));
    }

    #[test]
    fn test_infinite_multiplier_keeps_initial_interval() {
        for multiplier in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut backoff = BackOffConfig {
                initial_interval_ms: 100,
                multiplier,
                max_interval_ms: 1_000,
                max_retries: 3,
                max_cumulative_backoff_ms: 60_000,
            }
            .backoff();
            assert_eq!(drain(&mut backoff), vec![ms(100); 3]);
        }
    }

    #[test]
    fn test_huge_multiplier_saturates_at_max_interval() {
        let mut backoff = BackOffConfig {
            initial_interval_ms: 100,
            multiplier: f64::MAX,
            max_interval_ms: 1_000,
            max_retries: 4,
            max_cumulative_backoff_ms: 60_000,
        }
        .backoff();
        assert_eq!(drain(&mut backoff), vec![ms(100), ms(1_000), ms(1_000), ms(1_000)]);
    }

    #[test]
    fn test_intervals_non_decreasing_until_truncation() {
        let mut backoff = BackOffConfig {
            max_retries: 20,
            ..BackOffConfig::default()
        }
        .backoff();
        let intervals = drain(&mut backoff);
        let (last, body) = intervals.split_last().unwrap();
        assert!(body.windows(2).all(|w| w[0] <= w[1]));
        assert!(*last <= *body.last().unwrap());
        assert!(backoff.cumulative() <= ms(600_000));
    }
}
