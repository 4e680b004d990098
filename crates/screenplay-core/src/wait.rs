//! Bounded-wait primitives shared by the abilities
//!
//! Two shapes only:
//! - [`wait_until`]: fixed-interval polling against a deadline
//! - [`retry`]: a fixed number of attempts with a fixed delay between them
//!
//! Intervals, timeouts and attempt counts always come from settings.

use crate::error::ScreenplayError;
use screenplay_config::RetrySettings;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Poll interval and deadline for a bounded wait
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Fixed sleep between probes
    pub interval: Duration,
    /// Total time before the wait fails
    pub timeout: Duration,
}

impl PollSettings {
    /// Build from explicit durations
    #[inline]
    #[must_use]
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Poll `probe` at a fixed interval until it yields a value or the
/// deadline passes.
///
/// The probe returns `Ok(Some(value))` when the condition holds,
/// `Ok(None)` to keep waiting, or `Err` to abort the wait immediately
/// (a collaborator failure is not a timeout). The probe always runs at
/// least once, even with a zero timeout.
///
/// # Errors
/// - `ScreenplayError::Timeout` naming `subject` and `expected`
/// - Whatever the probe itself fails with
pub async fn wait_until<T, F, Fut>(
    subject: &str,
    expected: &str,
    poll: PollSettings,
    mut probe: F,
) -> Result<T, ScreenplayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ScreenplayError>>,
{
    let started = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }
        if started.elapsed() >= poll.timeout {
            tracing::warn!(subject, expected, timeout = ?poll.timeout, "wait timed out");
            return Err(ScreenplayError::Timeout {
                subject: subject.to_string(),
                expected: expected.to_string(),
                waited: poll.timeout,
            });
        }
        tokio::time::sleep(poll.interval).await;
    }
}

/// Run `op` up to `settings.max_retries` times with a fixed delay between
/// attempts, returning the first success or the last failure.
///
/// Linear retry only; there is no backoff. An attempt count of zero is
/// treated as one.
pub async fn retry<T, F, Fut>(
    what: &str,
    settings: &RetrySettings,
    mut op: F,
) -> Result<T, ScreenplayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScreenplayError>>,
{
    let attempts = settings.max_retries.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts => {
                tracing::debug!(what, attempt, %error, "attempt failed, retrying");
                attempt += 1;
                tokio::time::sleep(settings.delay()).await;
            }
            Err(error) => {
                tracing::debug!(what, attempt, %error, "giving up");
                return Err(error);
            }
        }
    }
}
