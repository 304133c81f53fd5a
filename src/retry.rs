//! Retry policy shared by the repository and package-manager loops.

use crate::error::UpdateError;
use std::time::Duration;

/// How often a failing command is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries until the command succeeds.
    pub max_attempts: Option<u32>,
    pub delay: Duration,
}

/// Final state of a retried operation.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Succeeded { value: T, failures: u32 },
    Exhausted { failures: u32, last_error: UpdateError },
}

/// Passed to the failure hook after every failed attempt.
#[derive(Debug)]
pub struct FailedAttempt<'a> {
    /// 1-based number of the attempt that failed.
    pub attempt: u32,
    pub error: &'a UpdateError,
    /// Whether another attempt follows after the delay.
    pub will_retry: bool,
}

impl RetryPolicy {
    #[must_use]
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            delay,
        }
    }

    #[must_use]
    pub fn capped(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            delay,
        }
    }

    /// Returns true if attempt number `attempt` (1-based) may run.
    #[must_use]
    pub fn allows_attempt(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt <= max)
    }

    /// Runs `op` until it succeeds or the policy gives up.
    ///
    /// `op` returns an outer error for problems that must abort the whole run (a log
    /// write failing) and an inner `UpdateError` for a failed attempt. `on_failure` sees
    /// every failed attempt before the delay. Only the outer errors propagate.
    pub fn run<T, Op, OnFailure>(
        &self,
        mut op: Op,
        mut on_failure: OnFailure,
    ) -> anyhow::Result<RetryOutcome<T>>
    where
        Op: FnMut(u32) -> anyhow::Result<Result<T, UpdateError>>,
        OnFailure: FnMut(&FailedAttempt<'_>) -> anyhow::Result<()>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let error = match op(attempt)? {
                Ok(value) => {
                    return Ok(RetryOutcome::Succeeded {
                        value,
                        failures: attempt - 1,
                    });
                }
                Err(error) => error,
            };

            let will_retry = self.allows_attempt(attempt.saturating_add(1));
            on_failure(&FailedAttempt {
                attempt,
                error: &error,
                will_retry,
            })?;

            if !will_retry {
                return Ok(RetryOutcome::Exhausted {
                    failures: attempt,
                    last_error: error,
                });
            }
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }
    }
}
