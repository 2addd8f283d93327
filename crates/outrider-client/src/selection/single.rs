//! Selection pinned to one caller-chosen instance.

use std::collections::HashSet;

use super::{InstanceSelectionPolicy, NoInstanceAvailable};
use crate::instance::SidecarInstance;

/// Always returns the one configured instance, ignoring the excluded set.
/// Used when the caller already pinned a target, e.g. operations scoped to a
/// specific node. Retries land on the same instance no matter what action
/// the retry policy signals.
#[derive(Debug, Clone)]
pub struct SingleInstanceSelectionPolicy {
    instance: SidecarInstance,
}

impl SingleInstanceSelectionPolicy {
    pub fn new(instance: SidecarInstance) -> Self {
        Self { instance }
    }
}

impl InstanceSelectionPolicy for SingleInstanceSelectionPolicy {
    fn select(
        &self,
        _excluded: &HashSet<SidecarInstance>,
    ) -> Result<SidecarInstance, NoInstanceAvailable> {
        Ok(self.instance.clone())
    }

    fn has_untried(&self, excluded: &HashSet<SidecarInstance>) -> bool {
        !excluded.contains(&self.instance)
    }
}
