//! Instance selection policies.
//!
//! A selection policy picks the target for one attempt, given the instances
//! this execution already tried. Policies are read-only and shared across
//! concurrent executions.

mod random;
mod single;

pub use random::RandomInstanceSelectionPolicy;
pub use single::SingleInstanceSelectionPolicy;

use std::collections::HashSet;

use crate::instance::SidecarInstance;

/// No instance remained to serve an attempt.
#[derive(Debug, thiserror::Error)]
#[error("no instance available")]
pub struct NoInstanceAvailable;

/// Chooses which instance an attempt should target.
pub trait InstanceSelectionPolicy: Send + Sync {
    /// Picks an instance not in `excluded`, or fails when none remains.
    fn select(
        &self,
        excluded: &HashSet<SidecarInstance>,
    ) -> Result<SidecarInstance, NoInstanceAvailable>;

    /// Whether an instance outside `excluded` exists. Feeds the retry
    /// policy's `can_try_other_instance` signal.
    fn has_untried(&self, excluded: &HashSet<SidecarInstance>) -> bool;
}
