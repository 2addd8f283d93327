//! Policy that never retries.

use super::policy::{AttemptContext, FailureKind, RetryPolicy, RetryVerdict};

/// Succeeds only on a 200 with no transport error; any other outcome is an
/// immediate terminal failure, regardless of attempt count.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetryPolicy;

impl RetryPolicy for NoRetryPolicy {
    fn decide(&self, ctx: &AttemptContext<'_>) -> RetryVerdict {
        match ctx.status {
            _ if ctx.is_transport_failure() => RetryVerdict::Fail(FailureKind::RetriesExhausted),
            Some(200) => RetryVerdict::Success,
            Some(status) => RetryVerdict::Fail(FailureKind::UnexpectedStatus(status)),
            None => RetryVerdict::Fail(FailureKind::RetriesExhausted),
        }
    }
}
