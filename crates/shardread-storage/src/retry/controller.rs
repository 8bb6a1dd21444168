//! The attempt loop.

use super::backoff::BackOff;
use super::sleeper::Sleeper;
use crate::error::{AttemptError, ShardedFileError};

/// Runs an attempt until it succeeds or the backoff policy says stop.
///
/// Attempt state (count, last failure) lives only for the duration of
/// [`run`](RetryController::run); nothing carries over between runs.
pub struct RetryController<'s, 'b> {
    sleeper: &'s dyn Sleeper,
    backoff: &'b mut dyn BackOff,
}

impl<'s, 'b> RetryController<'s, 'b> {
    pub fn new(sleeper: &'s dyn Sleeper, backoff: &'b mut dyn BackOff) -> Self {
        Self { sleeper, backoff }
    }

    /// Calls `attempt` with a 1-based attempt number until it returns `Ok`.
    ///
    /// Every failed attempt is followed by one `next_backoff` call. When the
    /// policy stops, the result is [`ShardedFileError::Unavailable`] carrying
    /// the last failure.
    pub fn run<T, F>(self, mut attempt: F) -> Result<T, ShardedFileError>
    where
        F: FnMut(u32) -> Result<T, AttemptError>,
    {
        let mut attempts = 0u32;
        let mut last_error = None;

        loop {
            attempts += 1;
            match attempt(attempts) {
                Ok(value) => {
                    if attempts > 1 {
                        tracing::info!(attempts, "Read succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(attempt = attempts, error = %e, "Read attempt failed");
                    last_error = Some(e);
                }
            }

            match self.backoff.next_backoff() {
                Some(interval) => {
                    tracing::debug!(
                        attempt = attempts,
                        wait_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
                        "Backing off before next attempt"
                    );
                    self.sleeper.sleep(interval);
                }
                None => {
                    tracing::warn!(attempts, "Retry budget exhausted");
                    return Err(ShardedFileError::Unavailable {
                        attempts,
                        last_error,
                    });
                }
            }
        }
    }
}
