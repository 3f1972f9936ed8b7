use crate::rate_limit::RateLimitSignal;
use chrono::{DateTime, Utc};
use sentiscope_core::{FetchError, RetrySettings, TwitterApiError};
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Rate-limit waits longer than this are surfaced instead of slept out
    pub max_wait: Duration,
    /// Assumed reset delay when the response carries no usable header
    pub default_reset: Duration,
    /// Added to every rate-limit wait before retrying
    pub backoff_padding: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_wait: Duration::from_secs(60),
            default_reset: Duration::from_secs(60),
            backoff_padding: Duration::from_secs(1),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            max_wait: Duration::from_secs(settings.max_wait_secs),
            default_reset: Duration::from_secs(settings.default_reset_secs),
            backoff_padding: Duration::from_secs(settings.backoff_padding_secs),
        }
    }
}

/// Why an attempt did not produce posts.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// The call succeeded but matched nothing.
    Empty,
    RateLimited(RateLimitSignal),
    Unexpected(String),
}

impl From<TwitterApiError> for AttemptFailure {
    fn from(error: TwitterApiError) -> Self {
        match error {
            TwitterApiError::RateLimitExceeded { status, headers } => {
                AttemptFailure::RateLimited(RateLimitSignal::new(status, headers))
            }
            other => AttemptFailure::Unexpected(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    RetryNow,
    RetryAfter(Duration),
    GiveUp(FetchError),
}

impl RetryPolicy {
    pub fn is_terminal_wait(&self, wait: Duration) -> bool {
        wait > self.max_wait
    }

    pub fn backoff(&self, wait: Duration) -> Duration {
        wait.saturating_add(self.backoff_padding)
    }

    /// Decide what follows a failed attempt. Pure: no sleeping, no I/O.
    pub fn decide(&self, failure: AttemptFailure, now: DateTime<Utc>) -> RetryDecision {
        match failure {
            AttemptFailure::Empty => {
                info!("No posts found. Retrying...");
                RetryDecision::RetryNow
            }
            AttemptFailure::RateLimited(signal) => {
                let wait = signal.wait_time(now, self.default_reset);
                warn!(
                    "Rate limit response status={:?} headers={:?}",
                    signal.status, signal.headers
                );

                if self.is_terminal_wait(wait) {
                    warn!(
                        "Rate limit exceeded. Wait time too long ({}s). Try again later.",
                        wait.as_secs()
                    );
                    RetryDecision::GiveUp(FetchError::RateLimited {
                        wait_seconds: wait.as_secs(),
                        status: signal.status,
                        headers: signal.headers,
                    })
                } else {
                    let backoff = self.backoff(wait);
                    warn!(
                        "Rate limit exceeded. Waiting for {}s before retrying...",
                        backoff.as_secs()
                    );
                    RetryDecision::RetryAfter(backoff)
                }
            }
            AttemptFailure::Unexpected(message) => {
                warn!("Unexpected error: {}", message);
                RetryDecision::GiveUp(FetchError::Unexpected { message })
            }
        }
    }
}
