//! Resumable streaming transfers.
//!
//! Large objects (SSTable components) are delivered as an ordered chunk
//! stream instead of a materialized body. The transfer path reuses the same
//! selection and retry machinery as unary requests, with one addition: a
//! cursor tracks how many bytes already reached the consumer, and every
//! retry asks only for what is still owed. The consumer therefore sees each
//! byte exactly once, in order, across any number of attempts.

mod cursor;

use futures::StreamExt;

use crate::error::ClientError;
use crate::executor::{AttemptDriver, RequestContext, RequestExecutor};
use crate::retry::{RetryAction, RetryVerdict};
use crate::transport::TransportError;

use cursor::StreamCursor;

/// Receiver for a streaming transfer. Exactly one of [`on_complete`] or
/// [`on_error`] is called, after the last [`on_read`]; no callback follows
/// either terminal one.
///
/// [`on_read`]: StreamConsumer::on_read
/// [`on_complete`]: StreamConsumer::on_complete
/// [`on_error`]: StreamConsumer::on_error
pub trait StreamConsumer: Send {
    /// One in-order chunk of the transfer. Never empty.
    fn on_read(&mut self, chunk: bytes::Bytes);

    /// The transfer finished; every requested byte was delivered.
    fn on_complete(&mut self);

    /// The transfer failed after exhausting its retry policy. Bytes already
    /// delivered through [`StreamConsumer::on_read`] remain valid.
    fn on_error(&mut self, error: ClientError);
}

impl RequestExecutor {
    /// Runs a streaming transfer for `context`, delivering the body to
    /// `consumer`. The returned future resolves once the terminal callback
    /// has run; dropping it cancels the transfer without a terminal
    /// callback.
    pub async fn execute_stream(&self, context: &RequestContext, consumer: &mut dyn StreamConsumer) {
        match self.run_stream(context, consumer).await {
            Ok(()) => consumer.on_complete(),
            Err(error) => consumer.on_error(error),
        }
    }

    async fn run_stream(
        &self,
        context: &RequestContext,
        consumer: &mut dyn StreamConsumer,
    ) -> Result<(), ClientError> {
        context.request().validate()?;

        let mut cursor = StreamCursor::new(context.request().range().copied());
        let mut driver = AttemptDriver::new(context);
        let mut action: Option<RetryAction> = None;
        loop {
            let instance = driver.next_target(action.as_ref())?;
            let request = context
                .request()
                .clone()
                .with_range_option(cursor.next_range());

            let (status, error) = match self.transport().open_stream(&instance, &request).await {
                // A 200 on a resumed attempt means the server ignored the
                // Range header and restarted the body from byte zero;
                // forwarding it would re-deliver bytes the consumer already
                // saw. Nothing is consumed and the attempt counts as
                // interrupted.
                Ok(response) if response.status == 200 && cursor.bytes_delivered() > 0 => (
                    None,
                    Some(TransportError::Interrupted(
                        "server ignored the resume range and restarted the body".to_string(),
                    )),
                ),
                Ok(response) if (200..300).contains(&response.status) => {
                    match forward(response.chunks, &mut cursor, consumer).await {
                        None => return Ok(()),
                        Some(error) => (None, Some(error)),
                    }
                }
                Ok(response) => (Some(response.status), None),
                Err(error) => (None, Some(error)),
            };

            match driver.decide(instance, status, error) {
                RetryVerdict::Success => return Ok(()),
                RetryVerdict::Fail(kind) => return Err(driver.fail(kind)),
                RetryVerdict::Retry(next) => {
                    tracing::debug!(
                        request = %context.request().describe(),
                        resume_from = ?cursor.next_range(),
                        "retrying transfer"
                    );
                    driver.wait(&next).await;
                    action = Some(next);
                }
            }
        }
    }
}

/// Forwards chunks until the stream ends or fails. Returns the transport
/// error to retry on, or `None` when the transfer is complete. A stream that
/// ends cleanly while a closed range still owes bytes counts as interrupted;
/// servers that drop a connection often surface it as a plain end of stream.
async fn forward(
    mut chunks: futures::stream::BoxStream<'_, Result<bytes::Bytes, TransportError>>,
    cursor: &mut StreamCursor,
    consumer: &mut dyn StreamConsumer,
) -> Option<TransportError> {
    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) if chunk.is_empty() => {}
            Ok(chunk) => {
                cursor.advance(chunk.len() as u64);
                consumer.on_read(chunk);
            }
            Err(error) => return Some(error),
        }
    }
    match cursor.remaining() {
        Some(owed) if owed > 0 => Some(TransportError::Interrupted(format!(
            "stream ended {owed} byte(s) short of the requested range"
        ))),
        _ => None,
    }
}
