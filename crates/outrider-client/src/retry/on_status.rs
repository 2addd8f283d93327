//! Long-poll policy: a "not yet complete" status keeps polling the same host.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::policy::{AttemptContext, RetryAction, RetryPolicy, RetryVerdict};

/// Wraps a delegate policy. A response with the configured trigger status
/// (e.g. 202 Accepted for an import still running server-side) invokes the
/// side-effect callback and polls the same host again after `delay`, up to
/// `max_consecutive` consecutive triggers. Past the cap, and for every other
/// outcome, the delegate decides; a non-trigger outcome resets the counter.
///
/// The consecutive counter is per-policy state, so build one of these per
/// logical operation rather than sharing it across executions.
pub struct OnStatusRetryPolicy {
    delegate: Arc<dyn RetryPolicy>,
    trigger_status: u16,
    max_consecutive: u32,
    delay: Duration,
    on_trigger: Box<dyn Fn() + Send + Sync>,
    consecutive: AtomicU32,
}

impl OnStatusRetryPolicy {
    pub fn new(
        delegate: Arc<dyn RetryPolicy>,
        trigger_status: u16,
        max_consecutive: u32,
        delay: Duration,
        on_trigger: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            delegate,
            trigger_status,
            max_consecutive,
            delay,
            on_trigger: Box::new(on_trigger),
            consecutive: AtomicU32::new(0),
        }
    }
}

impl RetryPolicy for OnStatusRetryPolicy {
    fn decide(&self, ctx: &AttemptContext<'_>) -> RetryVerdict {
        if ctx.status == Some(self.trigger_status) {
            let seen = self.consecutive.fetch_add(1, Ordering::Relaxed) + 1;
            if seen <= self.max_consecutive {
                (self.on_trigger)();
                return RetryVerdict::Retry(RetryAction::SameHostAfter(self.delay));
            }
            return self.delegate.decide(ctx);
        }
        self.consecutive.store(0, Ordering::Relaxed);
        self.delegate.decide(ctx)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::retry::DefaultRetryPolicy;

    fn ctx(attempts: u32, status: u16) -> AttemptContext<'static> {
        AttemptContext {
            attempts,
            status: Some(status),
            error: None,
            can_try_other_instance: false,
            prior_transport_failure: false,
        }
    }

    fn counting_policy(cap: u32) -> (Arc<AtomicUsize>, OnStatusRetryPolicy) {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_cb = Arc::clone(&calls);
        let policy = OnStatusRetryPolicy::new(
            Arc::new(DefaultRetryPolicy::default()),
            202,
            cap,
            Duration::from_millis(10),
            move || {
                calls_cb.fetch_add(1, Ordering::Relaxed);
            },
        );
        (calls, policy)
    }

    #[test]
    fn polls_same_host_and_fires_callback() {
        let (calls, policy) = counting_policy(10);
        for attempt in 1..=4 {
            assert_eq!(
                policy.decide(&ctx(attempt, 202)),
                RetryVerdict::Retry(RetryAction::SameHostAfter(Duration::from_millis(10)))
            );
        }
        assert_eq!(policy.decide(&ctx(5, 200)), RetryVerdict::Success);
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn past_the_cap_the_delegate_decides() {
        let (calls, policy) = counting_policy(2);
        assert!(matches!(policy.decide(&ctx(1, 202)), RetryVerdict::Retry(_)));
        assert!(matches!(policy.decide(&ctx(2, 202)), RetryVerdict::Retry(_)));
        // Third consecutive 202 exceeds the cap and goes to the delegate,
        // which takes any 2xx as terminal success. The callback no longer
        // fires.
        assert_eq!(policy.decide(&ctx(3, 202)), RetryVerdict::Success);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn non_trigger_outcome_resets_the_counter() {
        let (calls, policy) = counting_policy(2);
        assert!(matches!(policy.decide(&ctx(1, 202)), RetryVerdict::Retry(_)));
        assert!(matches!(policy.decide(&ctx(2, 202)), RetryVerdict::Retry(_)));
        assert!(matches!(policy.decide(&ctx(3, 500)), RetryVerdict::Retry(_)));
        assert!(matches!(policy.decide(&ctx(4, 202)), RetryVerdict::Retry(_)));
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }
}
