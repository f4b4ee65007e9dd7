//! Retry policy for Umbrella API calls.
//!
//! Split in two so it can be tested without a server: `decide` is a pure
//! function of the status and the retry count, and the client runs the
//! pre-retry hook (token refresh) that the decision asks for.

use common::HttpStatusCode;

use std::time::Duration;

use backoff::backoff::Constant;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop and hand the failure to the classifier.
    GiveUp,
    /// Wait, optionally force a new token, then send again.
    Retry { refresh_token: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Decide what to do after a failed attempt.
    ///
    /// `retries_so_far` counts retries already made, not attempts.
    ///
    /// 403 is read as "token may have gone stale" and earns a forced refresh.
    /// Umbrella does not tell a stale token from a real denial, so a genuine
    /// permission problem costs a few extra token calls before it surfaces.
    pub fn decide(&self, status: HttpStatusCode, retries_so_far: u32) -> RetryDecision {
        if retries_so_far >= self.max_retries {
            return RetryDecision::GiveUp;
        }

        if status.is_rate_limited() {
            RetryDecision::Retry {
                refresh_token: false,
            }
        } else if status.is_forbidden() {
            RetryDecision::Retry {
                refresh_token: true,
            }
        } else {
            RetryDecision::GiveUp
        }
    }

    /// Fixed wait between attempts, no jitter.
    pub fn backoff(&self) -> Constant {
        Constant::new(self.delay)
    }
}
