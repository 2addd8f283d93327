//! Transport contract: one request to one resolved instance.
//!
//! The executor treats the transport as a black box that either yields a
//! response or a classified [`TransportError`]. Classification matters
//! because the retry policies key off it; a raw transport error never
//! reaches the caller.

mod reqwest;

pub use self::reqwest::ReqwestTransport;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::instance::SidecarInstance;
use crate::request::Request;

/// Failure of a single transport attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    /// The connection dropped mid-transfer, after the response started.
    #[error("transfer interrupted: {0}")]
    Interrupted(String),

    /// The response body could not be decoded into the expected type.
    #[error("response decoding failed: {0}")]
    Decode(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// A fully materialized response from one attempt.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response whose body arrives as an ordered chunk stream.
pub struct StreamingResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub chunks: BoxStream<'static, Result<Bytes, TransportError>>,
}

/// Async HTTP implementation consumed by the executor. `send` materializes
/// the body; `open_stream` hands back chunks for large-object downloads.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<HttpResponse, TransportError>;

    async fn open_stream(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<StreamingResponse, TransportError>;
}
