// ── Bounded polling ──
//
// Every wait on the controllers goes through `poll_until`: check, and if
// the answer is not ready yet, sleep with exponential backoff and check
// again, up to `max_attempts` checks. Exhaustion is a typed
// `CoreError::Timeout`.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::CoreError;

/// Backoff schedule for a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the second check.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Total number of checks, including the first.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: 60,
        }
    }
}

impl PollPolicy {
    /// Delay after the check numbered `attempt` (0-based).
    ///
    /// `min(initial * 2^attempt, max)` scaled by a deterministic factor in
    /// `[0.75, 1.25]` derived from the attempt number. No RNG, so a
    /// schedule is reproducible.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.min(30)).unwrap_or(30);
        let base = self.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());

        let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
        Duration::from_secs_f64((capped * jitter_factor).max(0.0))
    }
}

/// Outcome of a single check.
#[derive(Debug)]
pub enum Attempt<T> {
    /// Done; stop polling.
    Ready(T),
    /// Not yet; check again after the backoff.
    Pending,
    /// The check itself failed in a way worth retrying.
    Transient(String),
}

/// Check until `Ready`, a hard error, or the attempt budget runs out.
///
/// `operation` names the wait in logs and in the timeout error.
pub async fn poll_until<T, F, Fut>(
    policy: &PollPolicy,
    operation: &str,
    mut check: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Attempt<T>, CoreError>>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 0..attempts {
        match check().await? {
            Attempt::Ready(value) => {
                debug!(operation, attempt, "poll complete");
                return Ok(value);
            }
            Attempt::Pending => {
                debug!(operation, attempt, "not ready yet");
            }
            Attempt::Transient(reason) => {
                warn!(operation, attempt, %reason, "poll check failed, retrying");
            }
        }

        if attempt + 1 < attempts {
            tokio::time::sleep(policy.backoff(attempt)).await;
        }
    }

    Err(CoreError::Timeout {
        operation: operation.to_owned(),
        attempts,
    })
}

// ── Tests ────────────────────────────────────────────────────────────
