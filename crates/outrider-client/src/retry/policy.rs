//! Retry decision contract shared by all policy variants.

use std::time::Duration;

use crate::transport::TransportError;

/// What the executor should do next with a retried attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Retry immediately against the instance that just answered.
    SameHostNow,
    /// Retry against the same instance after a delay.
    SameHostAfter(Duration),
    /// Retry against a different, untried instance after a delay.
    DifferentHostAfter(Duration),
}

/// Why a policy declared the execution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The attempt budget is spent.
    RetriesExhausted,
    /// A status the policy refuses to retry.
    UnexpectedStatus(u16),
}

/// Outcome of one `decide` invocation: exactly one of terminal success,
/// terminal failure, or continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryVerdict {
    Success,
    Fail(FailureKind),
    Retry(RetryAction),
}

/// Everything a policy may look at when deciding. Exactly one of `status`
/// and `error` is set; `attempts` counts completed attempts including the
/// one under judgment.
#[derive(Debug)]
pub struct AttemptContext<'a> {
    pub attempts: u32,
    pub status: Option<u16>,
    pub error: Option<&'a TransportError>,
    /// Whether the selection policy still has an untried instance.
    pub can_try_other_instance: bool,
    /// Whether an earlier attempt in this execution failed at the transport
    /// level, i.e. the operation may have succeeded server-side without the
    /// client observing it.
    pub prior_transport_failure: bool,
}

impl AttemptContext<'_> {
    pub fn is_transport_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status, Some(status) if (500..600).contains(&status))
    }

    pub fn is_success_status(&self) -> bool {
        matches!(self.status, Some(status) if (200..300).contains(&status))
    }
}

/// Decision function invoked once per completed attempt.
pub trait RetryPolicy: Send + Sync {
    fn decide(&self, ctx: &AttemptContext<'_>) -> RetryVerdict;
}

/// Exponential backoff: `base * 2^(attempts-1)`, capped at `max`.
pub(crate) fn backoff_delay(attempts: u32, base: Duration, max: Duration) -> Duration {
    let exp = 1u32 << attempts.saturating_sub(1).min(16);
    base.saturating_mul(exp).min(max)
}
