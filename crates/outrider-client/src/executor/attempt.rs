//! Per-execution attempt bookkeeping.

use std::collections::HashSet;

use super::context::RequestContext;
use crate::error::ClientError;
use crate::instance::SidecarInstance;
use crate::retry::{AttemptContext, FailureKind, RetryAction, RetryVerdict};
use crate::transport::TransportError;

/// Mutable state for one execution: attempt count, instances tried, last
/// outcome. Owned exclusively by the driving loop and dropped when the
/// execution terminates; nothing here is shared across executions.
#[derive(Default)]
struct AttemptState {
    attempts: u32,
    tried: HashSet<SidecarInstance>,
    last_instance: Option<SidecarInstance>,
    prior_transport_failure: bool,
    last_error: Option<TransportError>,
    last_status: Option<u16>,
}

/// Drives target selection and retry decisions for one execution. Both the
/// unary and the streaming paths run their attempts through this.
pub(crate) struct AttemptDriver<'a> {
    context: &'a RequestContext,
    state: AttemptState,
}

impl<'a> AttemptDriver<'a> {
    pub(crate) fn new(context: &'a RequestContext) -> Self {
        Self {
            context,
            state: AttemptState::default(),
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.state.attempts
    }

    /// Resolves the target for the next attempt. Same-host actions reuse the
    /// previous instance; everything else asks the selection policy,
    /// excluding instances already tried. Once every instance has been tried
    /// the exclusion resets, so later retries may revisit hosts rather than
    /// repeat the one that just failed while untried ones remained.
    pub(crate) fn next_target(
        &mut self,
        action: Option<&RetryAction>,
    ) -> Result<SidecarInstance, ClientError> {
        if matches!(
            action,
            Some(RetryAction::SameHostNow | RetryAction::SameHostAfter(_))
        ) {
            if let Some(instance) = self.state.last_instance.clone() {
                return Ok(instance);
            }
        }
        let selection = self.context.selection_policy();
        match selection.select(&self.state.tried) {
            Ok(instance) => Ok(instance),
            Err(_) if !self.state.tried.is_empty() => selection
                .select(&HashSet::new())
                .map_err(|_| self.no_instance()),
            Err(_) => Err(self.no_instance()),
        }
    }

    /// Records a completed attempt and consults the retry policy exactly
    /// once. `status` and `error` are mutually exclusive.
    pub(crate) fn decide(
        &mut self,
        instance: SidecarInstance,
        status: Option<u16>,
        error: Option<TransportError>,
    ) -> RetryVerdict {
        let prior_transport_failure = self.state.prior_transport_failure;
        self.state.attempts += 1;
        self.state.tried.insert(instance.clone());
        self.state.last_instance = Some(instance);
        self.state.last_status = status;
        if error.is_some() {
            self.state.prior_transport_failure = true;
        }
        self.state.last_error = error;

        let ctx = AttemptContext {
            attempts: self.state.attempts,
            status,
            error: self.state.last_error.as_ref(),
            can_try_other_instance: self
                .context
                .selection_policy()
                .has_untried(&self.state.tried),
            prior_transport_failure,
        };
        let verdict = self.context.retry_policy().decide(&ctx);
        tracing::debug!(
            request = %self.context.request().describe(),
            attempts = self.state.attempts,
            status = ?status,
            error = ?self.state.last_error,
            verdict = ?verdict,
            "attempt completed"
        );
        verdict
    }

    /// Converts a policy failure into the terminal error, attaching the
    /// operation description and attempt count.
    pub(crate) fn fail(&mut self, kind: FailureKind) -> ClientError {
        let operation = self.context.request().describe();
        match kind {
            FailureKind::RetriesExhausted => ClientError::RetriesExhausted {
                operation,
                attempts: self.state.attempts,
                source: self.state.last_error.take(),
                last_status: self.state.last_status,
            },
            FailureKind::UnexpectedStatus(status) => ClientError::UnexpectedStatus {
                operation,
                status,
                attempts: self.state.attempts,
            },
        }
    }

    /// Non-blocking wait for the delay a retry action carries.
    pub(crate) async fn wait(&self, action: &RetryAction) {
        match action {
            RetryAction::SameHostNow => {}
            RetryAction::SameHostAfter(delay) | RetryAction::DifferentHostAfter(delay) => {
                tokio::time::sleep(*delay).await;
            }
        }
    }

    fn no_instance(&self) -> ClientError {
        ClientError::NoInstanceAvailable {
            operation: self.context.request().describe(),
        }
    }
}
