//! Retry policy for transient remote failures.

use super::transport::{RawResponse, TransportFailure};
use crate::constants::{DEFAULT_MAX_ATTEMPTS, MAX_BACKOFF, RETRY_BUDGET};
use rand::Rng;
use std::time::Duration;

/// Outcome of one failed attempt, as seen by the policy.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    Status(RawResponse),
    Transport(TransportFailure),
}

/// When and how long to wait before re-sending a request.
///
/// Only failures without a definitive server-processed answer are retried:
/// network failures, timeouts, 429 and 500/502/503/504. Everything else
/// fails on the first attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per request, counting the first one.
    pub max_attempts: u32,
    /// Ceiling for one exponential backoff sleep.
    pub max_backoff: Duration,
    /// Ceiling for the sum of all sleeps of one request.
    pub budget: Duration,
    /// Adds up to 25% random delay to each sleep.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_backoff: MAX_BACKOFF,
            budget: RETRY_BUDGET,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// The delay before the next attempt, or `None` if the failure is final.
    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn delay_for(&self, failure: &AttemptFailure, attempt: u32) -> Option<Duration> {
        let base = match failure {
            AttemptFailure::Status(response) => match response.status {
                429 => response
                    .retry_after
                    .as_deref()
                    .and_then(parse_retry_after)
                    .unwrap_or_else(|| self.backoff(attempt)),
                500 | 502 | 503 | 504 => self.backoff(attempt),
                _ => return None,
            },
            AttemptFailure::Transport(_) => self.backoff(attempt),
        };
        Some(base.saturating_add(self.jitter_for(base)))
    }

    /// `min(max_backoff, 2^attempt seconds)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let seconds = 2u64.saturating_pow(attempt.min(32));
        Duration::from_secs(seconds).min(self.max_backoff)
    }

    fn jitter_for(&self, base: Duration) -> Duration {
        if !self.jitter || base.is_zero() {
            return Duration::ZERO;
        }
        let fraction: f64 = rand::rng().random_range(0.0..0.25);
        Duration::try_from_secs_f64(base.as_secs_f64() * fraction).unwrap_or(Duration::ZERO)
    }
}

/// Parses a `Retry-After` value in seconds; fractional values are allowed.
/// Values too large for a `Duration` saturate to `Duration::MAX`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !(seconds.is_finite() && seconds >= 0.0) {
        return None;
    }
    Some(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX))
}
