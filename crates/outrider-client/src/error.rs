//! Terminal error type crossing the caller boundary.
//!
//! Everything below the executor (selection, retry decisions, transport
//! outcomes) is resolved internally; exactly one of these ever reaches the
//! caller per execution. Transport failures only appear as the `source` of a
//! terminal error, never raw.

use crate::transport::TransportError;

/// Failure of one logical operation against the fleet.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A caller-supplied argument was invalid. No attempt was made.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The selection policy could not produce any instance to contact.
    #[error("{operation}: no sidecar instance available")]
    NoInstanceAvailable { operation: String },

    /// The retry policy gave up. Carries the operation description and the
    /// total attempts made so "never reached an instance" and "all instances
    /// failed" stay distinguishable.
    #[error("{operation} failed after {attempts} attempt(s); retries exhausted")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: Option<TransportError>,
        last_status: Option<u16>,
    },

    /// A response status the active retry policy refuses to retry (e.g. a
    /// genuine 409 conflict, or any 4xx under the default policy).
    #[error("{operation} returned unexpected status {status} after {attempts} attempt(s)")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        attempts: u32,
    },
}

impl ClientError {
    /// Total attempts made before this terminal failure, when applicable.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ClientError::RetriesExhausted { attempts, .. }
            | ClientError::UnexpectedStatus { attempts, .. } => Some(*attempts),
            ClientError::Validation(_) | ClientError::NoInstanceAvailable { .. } => None,
        }
    }
}
