//! Conflict-tolerant policy for non-idempotent create operations.

use std::time::Duration;

use super::default::DefaultRetryPolicy;
use super::policy::{AttemptContext, FailureKind, RetryPolicy, RetryVerdict};

/// Like [`DefaultRetryPolicy`], except a 409 response counts as success when
/// an earlier attempt in the same execution failed at the transport level:
/// the create may have landed server-side before the client saw the outcome.
/// A 409 with no such ambiguous prior attempt is a genuine conflict and
/// fails. Note the ambiguity cuts both ways: a conflict that follows an
/// unrelated transient error is indistinguishable from a masked duplicate.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreConflictRetryPolicy {
    delegate: DefaultRetryPolicy,
}

impl IgnoreConflictRetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            delegate: DefaultRetryPolicy::new(max_retries, base_delay, max_delay),
        }
    }
}

impl RetryPolicy for IgnoreConflictRetryPolicy {
    fn decide(&self, ctx: &AttemptContext<'_>) -> RetryVerdict {
        if ctx.status == Some(409) {
            return if ctx.prior_transport_failure {
                RetryVerdict::Success
            } else {
                RetryVerdict::Fail(FailureKind::UnexpectedStatus(409))
            };
        }
        self.delegate.decide(ctx)
    }
}
