//! Retry policy and per-attempt outcome classification.
//!
//! Each attempt ends in one of three [`Outcome`]s. The classification is
//! fixed:
//!
//! | Answer                          | Outcome                         |
//! |---------------------------------|---------------------------------|
//! | 2xx                             | success                         |
//! | 400                             | terminal `BadRequest(body)`     |
//! | 401                             | terminal `Unauthorized`         |
//! | 404                             | terminal `NotFound`             |
//! | 429, 500, 502, 503, 504         | retryable `ServerError`         |
//! | any other status                | terminal `ServerError`          |
//! | transport fault                 | retryable `NetworkError`        |
//!
//! Retryable outcomes are retried with a linear backoff until the
//! [`RetryPolicy`] runs out of attempts.

use crate::transport::{TransportError, TransportResponse};
use crate::Error;
use http::StatusCode;
use std::time::Duration;

/// Default number of attempts per call, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default backoff unit. The n-th retry waits `n * DEFAULT_BASE_DELAY`.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// How many times a call is attempted and how long to wait in between.
///
/// # Examples
///
/// ```
/// use pinata::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_after(0), Some(Duration::from_millis(500)));
/// assert_eq!(policy.delay_after(1), Some(Duration::from_millis(1000)));
/// assert_eq!(policy.delay_after(2), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// The total number of attempts per call.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The backoff unit.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the delay before the next attempt after a retryable failure of
    /// attempt `attempt` (0-indexed), or `None` if the budget is spent.
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        let multiplier = u32::try_from(attempt + 1).unwrap_or(u32::MAX);
        Some(self.base_delay.saturating_mul(multiplier))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

/// The result of a single attempt.
#[derive(Debug)]
pub enum Outcome {
    /// The server answered with a 2xx status.
    Success(TransportResponse),
    /// The attempt failed in a way that may resolve on its own.
    Retryable(Error),
    /// The attempt failed in a way retrying cannot fix.
    Terminal(Error),
}

impl Outcome {
    /// Classifies the result of one transport call.
    pub fn classify(result: Result<TransportResponse, TransportError>) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(fault) => return Outcome::Retryable(Error::NetworkError(fault)),
        };

        let status = response.status;
        if status.is_success() {
            return Outcome::Success(response);
        }

        match status {
            StatusCode::BAD_REQUEST => Outcome::Terminal(Error::BadRequest(response.text())),
            StatusCode::UNAUTHORIZED => Outcome::Terminal(Error::Unauthorized),
            StatusCode::NOT_FOUND => Outcome::Terminal(Error::NotFound),
            _ => {
                let error = Error::ServerError {
                    status,
                    raw_response: response.text(),
                };
                if is_retryable_status(status) {
                    Outcome::Retryable(error)
                } else {
                    Outcome::Terminal(error)
                }
            }
        }
    }
}

/// Returns `true` for the statuses that signal a transient server condition.
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
