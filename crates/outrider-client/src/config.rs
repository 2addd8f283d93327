//! Client configuration.
//!
//! Plain values handed in by the embedding application; this crate does not
//! read configuration files.

use std::time::Duration;

/// Tunables shared by every execution started from one [`crate::SidecarClient`].
#[derive(Debug, Clone)]
pub struct SidecarConfig {
    /// Retries allowed beyond the first attempt under the default policy.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_delay: Duration,
    /// Upper bound on the backoff delay.
    pub max_retry_delay: Duration,
    /// Per-attempt transport timeout. The executor itself imposes no
    /// wall-clock deadline beyond what `max_retries` implies.
    pub request_timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            user_agent: concat!("outrider-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
