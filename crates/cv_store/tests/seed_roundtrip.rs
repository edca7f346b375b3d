//! Seed/clear boundary behavior: idempotency guard, round-trip, batch
//! ceiling, and prefix-scoped deletion.

use cv_core::entities::Mohalla;
use cv_core::ids::MohallaId;
use cv_core::variables::Params;
use cv_store::memory::{EntityStore, InMemoryStore};
use cv_store::seed::{clear, seed_all, DEMO_PREFIX};
use cv_store::StoreResult;

const NOW: u64 = 1_700_000_000;

#[test]
fn seed_on_empty_store_succeeds_once() {
    let mut store = InMemoryStore::new();
    let p = Params::default();

    let first = seed_all(&mut store, &p, NOW);
    assert!(first.success, "first seed should succeed: {}", first.message);
    let counts_after_first = store.record_counts();
    assert!(counts_after_first.0 > 0 && counts_after_first.2 > 0);

    let second = seed_all(&mut store, &p, NOW);
    assert!(!second.success, "second seed must refuse");
    assert!(second.message.contains("already present"));
    // Store state after the refused call equals state after the first.
    assert_eq!(store.record_counts(), counts_after_first);
}

#[test]
fn seed_then_clear_round_trips_to_pre_seed_state() {
    let mut store = InMemoryStore::new();
    let p = Params::default();

    // A pre-existing, operator-entered record must survive the round trip.
    let keeper = Mohalla {
        id: MohallaId::new("m-real-01").unwrap(),
        name: "Gandhi Chowk".into(),
        ward: None,
    };
    store.upsert_mohallas(&[keeper.clone()]).unwrap();
    let before = store.record_counts();

    assert!(seed_all(&mut store, &p, NOW).success);
    assert!(store.record_counts().0 > before.0);

    let cleared = clear(&mut store, &p);
    assert!(cleared.success, "{}", cleared.message);
    assert_eq!(store.record_counts(), before);
    assert!(store.mohalla_ids().contains(&keeper.id));
}

#[test]
fn clear_on_empty_store_is_a_success() {
    let mut store = InMemoryStore::new();
    let out = clear(&mut store, &Params::default());
    assert!(out.success);
    assert!(out.message.contains("0 voters"));
}

#[test]
fn clear_touches_only_demo_prefixed_ids() {
    let mut store = InMemoryStore::new();
    let p = Params::default();
    assert!(seed_all(&mut store, &p, NOW).success);

    // Every id written by seed carries the prefix, so after clear nothing
    // demo-prefixed remains anywhere.
    assert!(clear(&mut store, &p).success);
    assert!(store.mohalla_ids().iter().all(|id| !id.as_str().starts_with(DEMO_PREFIX)));
    assert!(store.household_ids().iter().all(|id| !id.as_str().starts_with(DEMO_PREFIX)));
    assert!(store.voter_ids().iter().all(|id| !id.as_str().starts_with(DEMO_PREFIX)));
    assert!(store.influencer_ids().iter().all(|id| !id.as_str().starts_with(DEMO_PREFIX)));
    assert_eq!(store.record_counts(), (0, 0, 0, 0));
}

// ---------- Batch ceiling ----------

/// Store wrapper that records the size of every batch it receives.
struct RecordingStore {
    inner: InMemoryStore,
    batch_sizes: Vec<usize>,
}

impl RecordingStore {
    fn new() -> Self {
        Self { inner: InMemoryStore::new(), batch_sizes: Vec::new() }
    }
}

impl EntityStore for RecordingStore {
    fn upsert_mohallas(&mut self, batch: &[Mohalla]) -> StoreResult<()> {
        self.batch_sizes.push(batch.len());
        self.inner.upsert_mohallas(batch)
    }
    fn upsert_households(&mut self, batch: &[cv_core::entities::Household]) -> StoreResult<()> {
        self.batch_sizes.push(batch.len());
        self.inner.upsert_households(batch)
    }
    fn upsert_voters(&mut self, batch: &[cv_core::entities::EnhancedVoter]) -> StoreResult<()> {
        self.batch_sizes.push(batch.len());
        self.inner.upsert_voters(batch)
    }
    fn upsert_influencers(&mut self, batch: &[cv_core::entities::Influencer]) -> StoreResult<()> {
        self.batch_sizes.push(batch.len());
        self.inner.upsert_influencers(batch)
    }
    fn delete_mohallas(&mut self, ids: &[MohallaId]) -> StoreResult<()> {
        self.batch_sizes.push(ids.len());
        self.inner.delete_mohallas(ids)
    }
    fn delete_households(&mut self, ids: &[cv_core::ids::HouseholdId]) -> StoreResult<()> {
        self.batch_sizes.push(ids.len());
        self.inner.delete_households(ids)
    }
    fn delete_voters(&mut self, ids: &[cv_core::ids::VoterId]) -> StoreResult<()> {
        self.batch_sizes.push(ids.len());
        self.inner.delete_voters(ids)
    }
    fn delete_influencers(&mut self, ids: &[cv_core::ids::InfluencerId]) -> StoreResult<()> {
        self.batch_sizes.push(ids.len());
        self.inner.delete_influencers(ids)
    }
    fn mohalla_ids(&self) -> Vec<MohallaId> {
        self.inner.mohalla_ids()
    }
    fn household_ids(&self) -> Vec<cv_core::ids::HouseholdId> {
        self.inner.household_ids()
    }
    fn voter_ids(&self) -> Vec<cv_core::ids::VoterId> {
        self.inner.voter_ids()
    }
    fn influencer_ids(&self) -> Vec<cv_core::ids::InfluencerId> {
        self.inner.influencer_ids()
    }
}

#[test]
fn seed_and_clear_respect_the_batch_ceiling() {
    let mut store = RecordingStore::new();
    let mut p = Params::default();
    p.max_batch_size = 25;

    assert!(seed_all(&mut store, &p, NOW).success);
    assert!(!store.batch_sizes.is_empty());
    assert!(store.batch_sizes.iter().all(|&n| n <= 25), "oversized batch: {:?}", store.batch_sizes);
    // 120 demo voters at ceiling 25 must arrive in more than one batch.
    assert!(store.batch_sizes.iter().filter(|&&n| n == 25).count() >= 4);

    store.batch_sizes.clear();
    assert!(clear(&mut store, &p).success);
    assert!(store.batch_sizes.iter().all(|&n| n <= 25));
}
