//! Fleet member descriptors and the read-only instance pool.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::ClientError;

/// One addressable sidecar instance (host + port). Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SidecarInstance {
    hostname: String,
    port: u16,
}

impl SidecarInstance {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// Parses `host:port` or a full `http://host:port` URL.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{input}")
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| ClientError::Validation(format!("invalid instance address {input:?}: {e}")))?;
        let hostname = url
            .host_str()
            .ok_or_else(|| ClientError::Validation(format!("instance address {input:?} has no host")))?
            .to_string();
        let port = url
            .port()
            .ok_or_else(|| ClientError::Validation(format!("instance address {input:?} has no port")))?;
        Ok(Self { hostname, port })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for SidecarInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// Source of the configured instance pool. Implementations must be safe for
/// concurrent reads; executions never mutate the pool.
pub trait InstancesProvider: Send + Sync {
    fn instances(&self) -> Vec<SidecarInstance>;
}

/// Provider over a fixed list captured at construction time.
#[derive(Debug, Clone)]
pub struct SimpleInstancesProvider {
    instances: Arc<Vec<SidecarInstance>>,
}

impl SimpleInstancesProvider {
    pub fn new(instances: Vec<SidecarInstance>) -> Self {
        Self {
            instances: Arc::new(instances),
        }
    }
}

impl InstancesProvider for SimpleInstancesProvider {
    fn instances(&self) -> Vec<SidecarInstance> {
        self.instances.as_ref().clone()
    }
}
