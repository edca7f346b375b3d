//! Write boundary trait and the in-memory store.
//!
//! `EntityStore` is the surface seed/clear are coded against; swapping in a
//! real backend means implementing these batched operations, nothing else.
//! `InMemoryStore` keeps the four collections in `BTreeMap`s and bumps a
//! version counter on every mutation; the pipeline's explicit metrics cache
//! keys on that counter.

use std::collections::BTreeMap;

use cv_core::entities::{EnhancedVoter, Household, Influencer, Mohalla, Snapshot};
use cv_core::ids::{HouseholdId, InfluencerId, MohallaId, VoterId};

use crate::StoreResult;

/// Batched write/read boundary over the four collections.
pub trait EntityStore {
    fn upsert_mohallas(&mut self, batch: &[Mohalla]) -> StoreResult<()>;
    fn upsert_households(&mut self, batch: &[Household]) -> StoreResult<()>;
    fn upsert_voters(&mut self, batch: &[EnhancedVoter]) -> StoreResult<()>;
    fn upsert_influencers(&mut self, batch: &[Influencer]) -> StoreResult<()>;

    /// Deletions tolerate ids that are already absent.
    fn delete_mohallas(&mut self, ids: &[MohallaId]) -> StoreResult<()>;
    fn delete_households(&mut self, ids: &[HouseholdId]) -> StoreResult<()>;
    fn delete_voters(&mut self, ids: &[VoterId]) -> StoreResult<()>;
    fn delete_influencers(&mut self, ids: &[InfluencerId]) -> StoreResult<()>;

    fn mohalla_ids(&self) -> Vec<MohallaId>;
    fn household_ids(&self) -> Vec<HouseholdId>;
    fn voter_ids(&self) -> Vec<VoterId>;
    fn influencer_ids(&self) -> Vec<InfluencerId>;
}

/// In-memory store over the four collections.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    mohallas: BTreeMap<MohallaId, Mohalla>,
    households: BTreeMap<HouseholdId, Household>,
    voters: BTreeMap<VoterId, EnhancedVoter>,
    influencers: BTreeMap<InfluencerId, Influencer>,
    version: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snap: Snapshot) -> Self {
        Self {
            mohallas: snap.mohallas,
            households: snap.households,
            voters: snap.voters,
            influencers: snap.influencers,
            version: 0,
        }
    }

    /// Read-only view handed to the analytics engine.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mohallas: self.mohallas.clone(),
            households: self.households.clone(),
            voters: self.voters.clone(),
            influencers: self.influencers.clone(),
        }
    }

    /// Monotonic mutation counter; unchanged data keeps its version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record counts per collection (mohallas, households, voters, influencers).
    pub fn record_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.mohallas.len(),
            self.households.len(),
            self.voters.len(),
            self.influencers.len(),
        )
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

impl EntityStore for InMemoryStore {
    fn upsert_mohallas(&mut self, batch: &[Mohalla]) -> StoreResult<()> {
        for m in batch {
            self.mohallas.insert(m.id.clone(), m.clone());
        }
        self.bump();
        Ok(())
    }

    fn upsert_households(&mut self, batch: &[Household]) -> StoreResult<()> {
        for h in batch {
            self.households.insert(h.id.clone(), h.clone());
        }
        self.bump();
        Ok(())
    }

    fn upsert_voters(&mut self, batch: &[EnhancedVoter]) -> StoreResult<()> {
        for v in batch {
            self.voters.insert(v.id.clone(), v.clone());
        }
        self.bump();
        Ok(())
    }

    fn upsert_influencers(&mut self, batch: &[Influencer]) -> StoreResult<()> {
        for i in batch {
            self.influencers.insert(i.id.clone(), i.clone());
        }
        self.bump();
        Ok(())
    }

    fn delete_mohallas(&mut self, ids: &[MohallaId]) -> StoreResult<()> {
        for id in ids {
            self.mohallas.remove(id);
        }
        self.bump();
        Ok(())
    }

    fn delete_households(&mut self, ids: &[HouseholdId]) -> StoreResult<()> {
        for id in ids {
            self.households.remove(id);
        }
        self.bump();
        Ok(())
    }

    fn delete_voters(&mut self, ids: &[VoterId]) -> StoreResult<()> {
        for id in ids {
            self.voters.remove(id);
        }
        self.bump();
        Ok(())
    }

    fn delete_influencers(&mut self, ids: &[InfluencerId]) -> StoreResult<()> {
        for id in ids {
            self.influencers.remove(id);
        }
        self.bump();
        Ok(())
    }

    fn mohalla_ids(&self) -> Vec<MohallaId> {
        self.mohallas.keys().cloned().collect()
    }

    fn household_ids(&self) -> Vec<HouseholdId> {
        self.households.keys().cloned().collect()
    }

    fn voter_ids(&self) -> Vec<VoterId> {
        self.voters.keys().cloned().collect()
    }

    fn influencer_ids(&self) -> Vec<InfluencerId> {
        self.influencers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mohalla(id: &str) -> Mohalla {
        Mohalla { id: MohallaId::new(id).unwrap(), name: id.to_string(), ward: None }
    }

    #[test]
    fn upsert_and_delete_round_trip() {
        let mut s = InMemoryStore::new();
        s.upsert_mohallas(&[mohalla("m-1"), mohalla("m-2")]).unwrap();
        assert_eq!(s.record_counts().0, 2);
        s.delete_mohallas(&[MohallaId::new("m-1").unwrap()]).unwrap();
        assert_eq!(s.record_counts().0, 1);
        // Deleting an absent id is a no-op, not an error.
        s.delete_mohallas(&[MohallaId::new("m-ghost").unwrap()]).unwrap();
        assert_eq!(s.record_counts().0, 1);
    }

    #[test]
    fn every_mutation_bumps_the_version() {
        let mut s = InMemoryStore::new();
        let v0 = s.version();
        s.upsert_mohallas(&[mohalla("m-1")]).unwrap();
        let v1 = s.version();
        s.delete_mohallas(&[MohallaId::new("m-1").unwrap()]).unwrap();
        let v2 = s.version();
        assert!(v0 < v1 && v1 < v2);
    }

    #[test]
    fn snapshot_is_an_independent_copy() {
        let mut s = InMemoryStore::new();
        s.upsert_mohallas(&[mohalla("m-1")]).unwrap();
        let snap = s.snapshot();
        s.delete_mohallas(&[MohallaId::new("m-1").unwrap()]).unwrap();
        assert_eq!(snap.mohallas.len(), 1);
        assert_eq!(s.record_counts().0, 0);
    }
}
