//! Default transport over `reqwest`.

use async_trait::async_trait;
use futures::TryStreamExt;

use super::{HttpResponse, HttpTransport, StreamingResponse, TransportError};
use crate::config::SidecarConfig;
use crate::error::ClientError;
use crate::instance::SidecarInstance;
use crate::request::{HttpMethod, Request, RequestBody};

/// Transport backed by a shared `reqwest::Client`. Per-attempt timeout and
/// user agent come from [`SidecarConfig`]; retries and instance selection
/// stay with the executor.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &SidecarConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Validation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn build(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = format!(
            "http://{}:{}{}",
            instance.hostname(),
            instance.port(),
            request.path()
        );
        let method = match request.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, url);
        if let Some(range) = request.range() {
            builder = builder.header("Range", range.header_value());
        }
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match request.body() {
            Some(RequestBody::Json(value)) => builder = builder.json(value),
            Some(RequestBody::File(path)) => {
                let contents = tokio::fs::read(path).await?;
                builder = builder.body(contents);
            }
            None => {}
        }
        Ok(builder)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<HttpResponse, TransportError> {
        let builder = self.build(instance, request).await?;
        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(classify_body)?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn open_stream(
        &self,
        instance: &SidecarInstance,
        request: &Request,
    ) -> Result<StreamingResponse, TransportError> {
        let builder = self.build(instance, request).await?;
        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let chunks = Box::pin(response.bytes_stream().map_err(classify_body));
        Ok(StreamingResponse {
            status,
            headers,
            chunks,
        })
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Maps a request-phase error into the transport taxonomy.
fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

/// Maps a body-phase error: once the response has started, failures are
/// interruptions and qualify for resumption.
fn classify_body(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Interrupted(error.to_string())
    }
}
