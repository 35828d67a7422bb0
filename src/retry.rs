//! Bounded retry with a terminal fallback
//!
//! Remote generative calls are flaky and slow. A fixed-delay linear retry
//! buys a materially higher success rate for a small latency cost, and the
//! fallback guarantees the caller is never left waiting on a dead operation:
//! once a fallback is configured, nothing escapes `with_retry`.
//!
//! The policy is an explicit state machine rather than recursive
//! self-invocation, so the transitions are unit-testable on their own:
//! `Idle -> Attempting -> {Succeeded | Retrying -> Attempting | FailedWithFallback}`.

use crate::error::BucketListError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Fixed-delay linear retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Non-blocking wait between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Policy for on-demand per-card enrichments: 1 retry, 1 second apart.
    pub const fn per_card() -> Self {
        Self::new(2, Duration::from_millis(1000))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Idle,
    Attempting { attempt: u32 },
    Retrying { next_attempt: u32 },
    Succeeded,
    FailedWithFallback,
}

impl RetryState {
    /// Enter the next attempt. Terminal states are left untouched.
    pub fn begin(self) -> Self {
        match self {
            RetryState::Idle => RetryState::Attempting { attempt: 1 },
            RetryState::Retrying { next_attempt } => RetryState::Attempting {
                attempt: next_attempt,
            },
            other => other,
        }
    }

    pub fn complete(self) -> Self {
        RetryState::Succeeded
    }

    /// Record a failed attempt: retry while budget remains, otherwise fall
    /// back terminally.
    pub fn fail(self, policy: &RetryPolicy) -> Self {
        match self {
            RetryState::Attempting { attempt } if attempt < policy.max_attempts => {
                RetryState::Retrying {
                    next_attempt: attempt + 1,
                }
            }
            _ => RetryState::FailedWithFallback,
        }
    }
}

/// Terminal result of a retried operation. Keeps the real-success /
/// degraded-fallback distinction (and the last error) instead of silently
/// collapsing them into one value.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Succeeded {
        value: T,
        attempts: u32,
    },
    FailedWithFallback {
        value: T,
        attempts: u32,
        last_error: BucketListError,
    },
}

impl<T> RetryOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            RetryOutcome::Succeeded { value, .. } => value,
            RetryOutcome::FailedWithFallback { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RetryOutcome::FailedWithFallback { .. })
    }
}

/// Run `operation` under `policy`. Returns the first success immediately;
/// otherwise sleeps `policy.delay` between attempts and, once the budget is
/// exhausted, produces the fallback value. Concurrent invocations are
/// independent; nothing here is shared.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
    fallback: impl FnOnce() -> T,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::Result<T>>,
{
    let mut state = RetryState::Idle;

    loop {
        state = state.begin();
        let attempt = match state {
            RetryState::Attempting { attempt } => attempt,
            // begin() only yields Attempting from the states this loop
            // produces; treat anything else as a first attempt.
            _ => 1,
        };

        match operation().await {
            Ok(value) => {
                return RetryOutcome::Succeeded {
                    value,
                    attempts: attempt,
                };
            }
            Err(e) => match state.fail(&policy) {
                RetryState::Retrying { next_attempt } => {
                    warn!(attempt, error = %e, "Attempt failed, retrying after delay");
                    sleep(policy.delay).await;
                    state = RetryState::Retrying { next_attempt };
                }
                _ => {
                    warn!(attempt, error = %e, "Retry budget exhausted, using fallback");
                    return RetryOutcome::FailedWithFallback {
                        value: fallback(),
                        attempts: attempt,
                        last_error: e,
                    };
                }
            },
        }
    }
}
