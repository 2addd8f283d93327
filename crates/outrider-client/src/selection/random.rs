//! Uniform random selection over the configured pool.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;

use super::{InstanceSelectionPolicy, NoInstanceAvailable};
use crate::instance::{InstancesProvider, SidecarInstance};

/// Picks uniformly among the provider's instances minus the excluded set.
/// Also covers the "fixed list" variant: wrap the subset in a
/// `SimpleInstancesProvider` (e.g. time-skew queries against a replica set).
#[derive(Clone)]
pub struct RandomInstanceSelectionPolicy {
    provider: Arc<dyn InstancesProvider>,
}

impl RandomInstanceSelectionPolicy {
    pub fn new(provider: Arc<dyn InstancesProvider>) -> Self {
        Self { provider }
    }
}

impl InstanceSelectionPolicy for RandomInstanceSelectionPolicy {
    fn select(
        &self,
        excluded: &HashSet<SidecarInstance>,
    ) -> Result<SidecarInstance, NoInstanceAvailable> {
        let candidates: Vec<SidecarInstance> = self
            .provider
            .instances()
            .into_iter()
            .filter(|instance| !excluded.contains(instance))
            .collect();
        candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(NoInstanceAvailable)
    }

    fn has_untried(&self, excluded: &HashSet<SidecarInstance>) -> bool {
        self.provider
            .instances()
            .iter()
            .any(|instance| !excluded.contains(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::SimpleInstancesProvider;

    fn pool() -> Vec<SidecarInstance> {
        (1..=4)
            .map(|i| SidecarInstance::new(format!("db-{i:02}"), 9043))
            .collect()
    }

    fn policy() -> RandomInstanceSelectionPolicy {
        RandomInstanceSelectionPolicy::new(Arc::new(SimpleInstancesProvider::new(pool())))
    }

    #[test]
    fn never_picks_excluded_instance() {
        let policy = policy();
        let mut excluded = HashSet::new();
        for _ in 0..4 {
            let picked = policy.select(&excluded).unwrap();
            assert!(!excluded.contains(&picked));
            excluded.insert(picked);
        }
        assert_eq!(excluded.len(), 4);
    }

    #[test]
    fn exhausted_pool_yields_no_instance() {
        let policy = policy();
        let excluded: HashSet<_> = pool().into_iter().collect();
        assert!(policy.select(&excluded).is_err());
        assert!(!policy.has_untried(&excluded));
    }

    #[test]
    fn has_untried_tracks_remaining() {
        let policy = policy();
        let mut excluded = HashSet::new();
        assert!(policy.has_untried(&excluded));
        excluded.insert(SidecarInstance::new("db-01", 9043));
        assert!(policy.has_untried(&excluded));
    }
}
