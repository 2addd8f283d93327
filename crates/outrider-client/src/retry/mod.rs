//! Retry policies.
//!
//! A retry policy is a pure decision function consulted after every attempt:
//! it yields exactly one verdict (success, terminal failure, or retry with a
//! target directive) and never touches the completion handle. The executor
//! interprets the verdict, performs the backoff wait, and re-targets.

mod default;
mod ignore_conflict;
mod no_retry;
mod on_status;
mod policy;

pub use default::DefaultRetryPolicy;
pub use ignore_conflict::IgnoreConflictRetryPolicy;
pub use no_retry::NoRetryPolicy;
pub use on_status::OnStatusRetryPolicy;
pub use policy::{AttemptContext, FailureKind, RetryAction, RetryPolicy, RetryVerdict};
