//! Immutable request descriptors.
//!
//! A [`Request`] describes one logical operation: method, path, optional byte
//! range, optional body, extra headers. Descriptors are built once per call
//! site by the endpoint constructors in [`endpoints`] and consumed by the
//! executor; they never change after construction.

pub mod endpoints;
mod range;

pub use range::HttpRange;

use std::path::PathBuf;

use crate::error::ClientError;

/// HTTP method for a request descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Body attached to a request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON document sent as `application/json`.
    Json(serde_json::Value),
    /// Contents of a local file (SSTable component upload).
    File(PathBuf),
}

/// One logical operation against a sidecar instance.
#[derive(Debug, Clone)]
pub struct Request {
    method: HttpMethod,
    path: String,
    range: Option<HttpRange>,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
}

impl Request {
    pub(crate) fn new(method: HttpMethod, path: String) -> Self {
        Self {
            method,
            path,
            range: None,
            body: None,
            headers: Vec::new(),
        }
    }

    pub(crate) fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn with_header(mut self, name: &str, value: String) -> Self {
        self.headers.push((name.to_string(), value));
        self
    }

    pub(crate) fn with_range_option(mut self, range: Option<HttpRange>) -> Self {
        self.range = range;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn range(&self) -> Option<&HttpRange> {
        self.range.as_ref()
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Short human-readable description, used in terminal errors and logs.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }

    /// Local argument validation. Runs before any transport call; a failure
    /// here fails the execution without an attempt being made.
    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(RequestBody::File(path)) = &self.body {
            if !path.is_file() {
                return Err(ClientError::Validation(format!(
                    "upload file {} does not exist",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}
