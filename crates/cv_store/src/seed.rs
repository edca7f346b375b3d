//! Demo seeding and clearing against the store boundary.
//!
//! `seed_all` refuses to run over existing demo data (idempotency guard) and
//! writes in dependency order (Mohallas → Households → Voters → Influencers)
//! so referential checks enforced downstream always see parents first.
//! `clear` deletes only demo-prefixed records, in reverse dependency order,
//! and does not fail when a collection has zero matches. Both paths issue
//! chunked batches through [`write_in_chunks`].

use tracing::info;

use cv_core::variables::Params;

use crate::batch::write_in_chunks;
use crate::demo;
use crate::memory::EntityStore;
use crate::StoreError;

/// Identifier prefix that scopes every demo record.
pub const DEMO_PREFIX: &str = "demo-";

/// Structured outcome of a seed/clear run. Never an exception: collaborator
/// failures and idempotency violations both surface here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeedOutcome {
    pub success: bool,
    pub message: String,
}

impl SeedOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Seed the demo dataset. Refuses (success = false) if any demo record id
/// already exists in the target store.
pub fn seed_all<S: EntityStore>(store: &mut S, p: &Params, now: u64) -> SeedOutcome {
    let existing = count_demo_records(store);
    if existing > 0 {
        return SeedOutcome::failed(format!(
            "refusing to seed: {existing} demo record(s) already present; run clear first"
        ));
    }

    let data = match demo::generate(now) {
        Ok(d) => d,
        Err(e) => return SeedOutcome::failed(format!("demo generation failed: {e}")),
    };

    // Dependency order: parents commit before children. A failed step stops
    // the run before any dependent batch is issued.
    let ceiling = p.max_batch_size;
    if let Err(o) = step(
        "seed",
        "mohallas",
        data.mohallas.len(),
        write_in_chunks(&data.mohallas, ceiling, |b| store.upsert_mohallas(b)),
    ) {
        return o;
    }
    if let Err(o) = step(
        "seed",
        "households",
        data.households.len(),
        write_in_chunks(&data.households, ceiling, |b| store.upsert_households(b)),
    ) {
        return o;
    }
    if let Err(o) = step(
        "seed",
        "voters",
        data.voters.len(),
        write_in_chunks(&data.voters, ceiling, |b| store.upsert_voters(b)),
    ) {
        return o;
    }
    if let Err(o) = step(
        "seed",
        "influencers",
        data.influencers.len(),
        write_in_chunks(&data.influencers, ceiling, |b| store.upsert_influencers(b)),
    ) {
        return o;
    }

    SeedOutcome::ok(format!(
        "seeded {} mohallas, {} households, {} voters, {} influencers",
        data.mohallas.len(),
        data.households.len(),
        data.voters.len(),
        data.influencers.len()
    ))
}

/// Delete every demo-prefixed record, children before parents. An empty
/// collection issues zero batches and is not a failure.
pub fn clear<S: EntityStore>(store: &mut S, p: &Params) -> SeedOutcome {
    let ceiling = p.max_batch_size;

    let voters: Vec<_> =
        store.voter_ids().into_iter().filter(|id| id.as_str().starts_with(DEMO_PREFIX)).collect();
    let households: Vec<_> = store
        .household_ids()
        .into_iter()
        .filter(|id| id.as_str().starts_with(DEMO_PREFIX))
        .collect();
    let mohallas: Vec<_> =
        store.mohalla_ids().into_iter().filter(|id| id.as_str().starts_with(DEMO_PREFIX)).collect();
    let influencers: Vec<_> = store
        .influencer_ids()
        .into_iter()
        .filter(|id| id.as_str().starts_with(DEMO_PREFIX))
        .collect();

    if let Err(o) = step(
        "clear",
        "voters",
        voters.len(),
        write_in_chunks(&voters, ceiling, |b| store.delete_voters(b)),
    ) {
        return o;
    }
    if let Err(o) = step(
        "clear",
        "households",
        households.len(),
        write_in_chunks(&households, ceiling, |b| store.delete_households(b)),
    ) {
        return o;
    }
    if let Err(o) = step(
        "clear",
        "mohallas",
        mohallas.len(),
        write_in_chunks(&mohallas, ceiling, |b| store.delete_mohallas(b)),
    ) {
        return o;
    }
    if let Err(o) = step(
        "clear",
        "influencers",
        influencers.len(),
        write_in_chunks(&influencers, ceiling, |b| store.delete_influencers(b)),
    ) {
        return o;
    }

    SeedOutcome::ok(format!(
        "cleared {} voters, {} households, {} mohallas, {} influencers",
        voters.len(),
        households.len(),
        mohallas.len(),
        influencers.len()
    ))
}

// ---------- Helpers ----------

fn step(
    verb: &'static str,
    collection: &'static str,
    count: usize,
    outcome: Result<usize, StoreError>,
) -> Result<(), SeedOutcome> {
    match outcome {
        Ok(batches) => {
            info!(verb, collection, count, batches, "store batch step complete");
            Ok(())
        }
        Err(e) => Err(SeedOutcome::failed(format!("{verb} {collection} failed: {e}"))),
    }
}

fn count_demo_records<S: EntityStore>(store: &S) -> usize {
    store.mohalla_ids().iter().filter(|id| id.as_str().starts_with(DEMO_PREFIX)).count()
        + store.household_ids().iter().filter(|id| id.as_str().starts_with(DEMO_PREFIX)).count()
        + store.voter_ids().iter().filter(|id| id.as_str().starts_with(DEMO_PREFIX)).count()
        + store.influencer_ids().iter().filter(|id| id.as_str().starts_with(DEMO_PREFIX)).count()
}
