//! Request executor: drives one execution to a single terminal outcome.

mod attempt;
mod context;

pub use context::{RequestContext, RequestContextBuilder};

pub(crate) use attempt::AttemptDriver;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::retry::{RetryAction, RetryVerdict};
use crate::transport::{HttpResponse, HttpTransport, TransportError};

/// Executes request contexts against the fleet: resolve a target via the
/// selection policy, send one attempt through the transport, feed the
/// outcome to the retry policy, repeat until a terminal verdict.
///
/// The returned future is the completion handle: it resolves to exactly one
/// success or failure, and dropping it cancels the execution; no further
/// attempt or backoff wait is scheduled past the drop. Attempts within one
/// execution are strictly sequential.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Runs the context and returns the raw response of the successful
    /// attempt. Used for operations whose response body is irrelevant.
    pub async fn execute(&self, context: &RequestContext) -> Result<HttpResponse, ClientError> {
        self.run(context, |response| Ok(response.clone())).await
    }

    /// Runs the context and decodes the successful response body as JSON.
    /// Decoding happens inside the attempt loop: a 2xx response that fails
    /// to decode counts as a transport-level failure and goes back through
    /// the retry policy instead of surfacing half-parsed.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        context: &RequestContext,
    ) -> Result<T, ClientError> {
        self.run(context, |response| {
            serde_json::from_slice(&response.body)
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
        .await
    }

    async fn run<T>(
        &self,
        context: &RequestContext,
        decode: impl Fn(&HttpResponse) -> Result<T, TransportError>,
    ) -> Result<T, ClientError> {
        // Local validation never touches the transport.
        context.request().validate()?;

        let mut driver = AttemptDriver::new(context);
        let mut action: Option<RetryAction> = None;
        loop {
            let instance = driver.next_target(action.as_ref())?;
            let outcome = self.transport.send(&instance, context.request()).await;

            let (response, error, decoded) = match outcome {
                Ok(response) if response.is_success() => match decode(&response) {
                    Ok(value) => (Some(response), None, Some(value)),
                    Err(e) => (None, Some(e), None),
                },
                Ok(response) => (Some(response), None, None),
                Err(e) => (None, Some(e), None),
            };

            let status = response.as_ref().map(|r| r.status);
            match driver.decide(instance, status, error) {
                RetryVerdict::Success => {
                    if let Some(value) = decoded {
                        return Ok(value);
                    }
                    // A policy may accept a non-2xx response (e.g. an
                    // ignored conflict); decode whatever we hold.
                    return match response {
                        Some(response) => decode(&response).map_err(|e| {
                            ClientError::RetriesExhausted {
                                operation: context.request().describe(),
                                attempts: driver.attempts(),
                                source: Some(e),
                                last_status: Some(response.status),
                            }
                        }),
                        None => Err(ClientError::RetriesExhausted {
                            operation: context.request().describe(),
                            attempts: driver.attempts(),
                            source: None,
                            last_status: None,
                        }),
                    };
                }
                RetryVerdict::Fail(kind) => return Err(driver.fail(kind)),
                RetryVerdict::Retry(next) => {
                    tracing::debug!(
                        request = %context.request().describe(),
                        action = ?next,
                        "retrying"
                    );
                    driver.wait(&next).await;
                    action = Some(next);
                }
            }
        }
    }
}
