//! Execution context: a request bound to its policies.

use std::sync::Arc;

use crate::error::ClientError;
use crate::instance::SidecarInstance;
use crate::request::Request;
use crate::retry::RetryPolicy;
use crate::selection::{InstanceSelectionPolicy, SingleInstanceSelectionPolicy};

/// One request plus the retry and selection policies that govern its
/// execution. Immutable once built; the executor only reads it.
#[derive(Clone)]
pub struct RequestContext {
    request: Request,
    retry_policy: Arc<dyn RetryPolicy>,
    selection_policy: Arc<dyn InstanceSelectionPolicy>,
}

impl RequestContext {
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn retry_policy(&self) -> &Arc<dyn RetryPolicy> {
        &self.retry_policy
    }

    pub fn selection_policy(&self) -> &Arc<dyn InstanceSelectionPolicy> {
        &self.selection_policy
    }
}

/// Builder for [`RequestContext`]. Setters consume and return the builder,
/// and the builder is `Clone`: callers building from a shared base clone it
/// first, so one caller's edits are never visible to another.
#[derive(Clone, Default)]
pub struct RequestContextBuilder {
    request: Option<Request>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    selection_policy: Option<Arc<dyn InstanceSelectionPolicy>>,
}

impl RequestContextBuilder {
    pub fn request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    pub fn retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn selection_policy(mut self, policy: Arc<dyn InstanceSelectionPolicy>) -> Self {
        self.selection_policy = Some(policy);
        self
    }

    /// Pins every attempt of this execution to `instance`.
    pub fn single_instance(self, instance: SidecarInstance) -> Self {
        self.selection_policy(Arc::new(SingleInstanceSelectionPolicy::new(instance)))
    }

    pub fn build(self) -> Result<RequestContext, ClientError> {
        let request = self
            .request
            .ok_or_else(|| ClientError::Validation("no request configured".to_string()))?;
        let retry_policy = self
            .retry_policy
            .ok_or_else(|| ClientError::Validation("no retry policy configured".to_string()))?;
        let selection_policy = self.selection_policy.ok_or_else(|| {
            ClientError::Validation("no instance selection policy configured".to_string())
        })?;
        Ok(RequestContext {
            request,
            retry_policy,
            selection_policy,
        })
    }
}
