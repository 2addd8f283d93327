//! Scripted transport shared by executor and streaming tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};

use crate::instance::SidecarInstance;
use crate::request::Request;
use crate::transport::{HttpResponse, HttpTransport, StreamingResponse, TransportError};

/// One scripted transport outcome, consumed in order.
pub(crate) enum ScriptedAttempt {
    Respond {
        status: u16,
        body: Bytes,
    },
    Error(TransportError),
    /// Streaming response whose chunk sequence may end in an error.
    Stream {
        status: u16,
        chunks: Vec<Result<Bytes, TransportError>>,
    },
}

impl ScriptedAttempt {
    pub(crate) fn respond(status: u16, body: &str) -> Self {
        ScriptedAttempt::Respond {
            status,
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    pub(crate) fn fail_connect() -> Self {
        ScriptedAttempt::Error(TransportError::Connect("connection refused".to_string()))
    }

    pub(crate) fn stream(status: u16, chunks: Vec<Result<Bytes, TransportError>>) -> Self {
        ScriptedAttempt::Stream { status, chunks }
    }

    pub(crate) fn interrupted() -> Result<Bytes, TransportError> {
        Err(TransportError::Interrupted("connection reset".to_string()))
    }
}

/// Transport that replays a fixed script and records every attempt it saw:
/// the target instance and the effective `Range` header, so tests can assert
/// on host selection and resume offsets.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedAttempt>>,
    log: Mutex<Vec<(SidecarInstance, Option<String>)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<ScriptedAttempt>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn attempts(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub(crate) fn targets(&self) -> Vec<SidecarInstance> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(instance, _)| instance.clone())
            .collect()
    }

    pub(crate) fn ranges(&self) -> Vec<Option<String>> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, range)| range.clone())
            .collect()
    }

    fn record(&self, instance: &SidecarInstance, request: &Request) -> Option<ScriptedAttempt> {
        self.log.lock().unwrap().push((
            instance.clone(),
            request.range().map(|r| r.header_value()),
        ));
        self.script.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<HttpResponse, TransportError> {
        match self.record(instance, request) {
            Some(ScriptedAttempt::Respond { status, body }) => Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            }),
            Some(ScriptedAttempt::Error(error)) => Err(error),
            Some(ScriptedAttempt::Stream { status, chunks }) => {
                let mut body = Vec::new();
                for chunk in chunks {
                    body.extend_from_slice(&chunk?);
                }
                Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.into(),
                })
            }
            None => Err(TransportError::Other("script exhausted".to_string())),
        }
    }

    async fn open_stream(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<StreamingResponse, TransportError> {
        match self.record(instance, request) {
            Some(ScriptedAttempt::Respond { status, body }) => Ok(StreamingResponse {
                status,
                headers: Vec::new(),
                chunks: stream::iter(vec![Ok(body)]).boxed(),
            }),
            Some(ScriptedAttempt::Error(error)) => Err(error),
            Some(ScriptedAttempt::Stream { status, chunks }) => Ok(StreamingResponse {
                status,
                headers: Vec::new(),
                chunks: stream::iter(chunks).boxed(),
            }),
            None => Err(TransportError::Other("script exhausted".to_string())),
        }
    }
}
