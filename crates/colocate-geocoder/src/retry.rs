//! Retry-on-timeout policy shared by the anchor resolver and POI search.
//!
//! A timed-out provider call is resubmitted immediately and identically: no
//! back-off, no jitter. Every other error is returned on the first failure.
//! The attempt cap defaults to unbounded, so a run against a provider that
//! keeps timing out only stops when the process is terminated.

use std::future::Future;

use crate::error::GeocodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry timeouts forever.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Give up after `max_attempts` total attempts (at least one).
    #[must_use]
    pub const fn with_max_attempts(max_attempts: u32) -> Self {
        let max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        Self {
            max_attempts: Some(max_attempts),
        }
    }

    /// `None` (the configuration default) means unbounded.
    #[must_use]
    pub const fn from_config(max_attempts: Option<u32>) -> Self {
        match max_attempts {
            Some(n) => Self::with_max_attempts(n),
            None => Self::unbounded(),
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Runs `operation` until it returns something other than a timeout, or
    /// the attempt cap is reached, in which case the last timeout is returned.
    ///
    /// # Errors
    ///
    /// Returns the first non-timeout error unchanged, or the final timeout
    /// once `max_attempts` is exhausted.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, GeocodeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeocodeError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt = attempt.saturating_add(1);
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_timeout() => {
                    if self.max_attempts.is_some_and(|max| attempt >= max) {
                        tracing::error!(
                            label,
                            attempt,
                            error = %err,
                            "geocoder still timing out; giving up"
                        );
                        return Err(err);
                    }
                    tracing::warn!(
                        label,
                        attempt,
                        max_attempts = ?self.max_attempts,
                        error = %err,
                        "geocoder timed out; resubmitting request"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}
