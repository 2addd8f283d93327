//! Bounded exponential-backoff policy.

use std::time::Duration;

use super::policy::{
    backoff_delay, AttemptContext, FailureKind, RetryAction, RetryPolicy, RetryVerdict,
};

/// Default policy: retries transport errors and 5xx responses against a
/// different host with exponential backoff, up to `max_retries` retries
/// beyond the first attempt. Other non-2xx statuses fail immediately.
#[derive(Debug, Clone, Copy)]
pub struct DefaultRetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl DefaultRetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }
}

impl Default for DefaultRetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_secs(30))
    }
}

impl RetryPolicy for DefaultRetryPolicy {
    fn decide(&self, ctx: &AttemptContext<'_>) -> RetryVerdict {
        if ctx.is_success_status() {
            return RetryVerdict::Success;
        }
        if ctx.is_transport_failure() || ctx.is_server_error() {
            if ctx.attempts > self.max_retries {
                return RetryVerdict::Fail(FailureKind::RetriesExhausted);
            }
            let delay = backoff_delay(ctx.attempts, self.base_delay, self.max_delay);
            return RetryVerdict::Retry(RetryAction::DifferentHostAfter(delay));
        }
        match ctx.status {
            Some(status) => RetryVerdict::Fail(FailureKind::UnexpectedStatus(status)),
            None => RetryVerdict::Fail(FailureKind::RetriesExhausted),
        }
    }
}
