//! Client library for a fleet of Outrider sidecar instances.
//!
//! The heart of the crate is the request execution engine: an instance
//! selection policy picks a target, the transport performs one attempt, and a
//! retry policy decides whether the operation is done or must continue on the
//! same or a different host. Large downloads go through the streaming
//! transfer path, which tracks delivered bytes so an interrupted transfer
//! resumes from the last offset instead of restarting.
//!
//! [`SidecarClient`] is the high-level entry point; the lower layers
//! (executor, policies, transport) are public so tools can compose their own
//! behavior.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod instance;
pub mod request;
pub mod retry;
pub mod selection;
pub mod streaming;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::SidecarClient;
pub use config::SidecarConfig;
pub use error::ClientError;
pub use executor::{RequestContext, RequestContextBuilder, RequestExecutor};
pub use instance::{InstancesProvider, SidecarInstance, SimpleInstancesProvider};
pub use request::{HttpRange, Request};
pub use streaming::StreamConsumer;
