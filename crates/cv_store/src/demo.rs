//! Deterministic demo-data generator.
//!
//! Seeded ChaCha20 only (no OS entropy), so every seeding run produces the
//! same records and the seed/clear round-trip is reproducible in tests.
//! All identifiers carry the demo prefix so `clear` can scope deletions.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use cv_core::entities::{
    EnhancedVoter, Household, HouseholdSentiment, Influencer, InfluencerStance, Mohalla,
    TurnoutPropensity, VoterStance,
};
use cv_core::errors::CoreError;
use cv_core::ids::{HouseholdId, InfluencerId, MohallaId, VoterId};

use crate::seed::DEMO_PREFIX;

const DEMO_SEED: u64 = 7_031_952;

const MOHALLA_COUNT: usize = 5;
const HOUSEHOLD_COUNT: usize = 30;
const VOTER_COUNT: usize = 120;
const INFLUENCER_COUNT: usize = 6;

const MOHALLA_NAMES: [&str; MOHALLA_COUNT] =
    ["Purani Basti", "Shanti Nagar", "Islampura", "Krishna Colony", "Station Road"];

/// Generated demo records, in write dependency order.
#[derive(Clone, Debug, Default)]
pub struct DemoData {
    pub mohallas: Vec<Mohalla>,
    pub households: Vec<Household>,
    pub voters: Vec<EnhancedVoter>,
    pub influencers: Vec<Influencer>,
}

/// Create the demo RNG from the fixed integer seed.
fn demo_rng() -> ChaCha20Rng {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&DEMO_SEED.to_le_bytes());
    ChaCha20Rng::from_seed(bytes)
}

/// Generate the demo dataset. `now` (epoch seconds) anchors survey
/// timestamps so freshness percentages look plausible at seed time.
pub fn generate(now: u64) -> Result<DemoData, CoreError> {
    let mut rng = demo_rng();
    let mut out = DemoData::default();

    for (i, name) in MOHALLA_NAMES.iter().enumerate() {
        out.mohallas.push(Mohalla {
            id: MohallaId::new(format!("{DEMO_PREFIX}m-{i:02}"))?,
            name: (*name).to_string(),
            ward: Some(format!("Ward {}", i / 2 + 1)),
        });
    }

    for i in 0..HOUSEHOLD_COUNT {
        let mohalla = pick(&mut rng, MOHALLA_COUNT as u32) as usize;
        let surveyed = pick(&mut rng, 100) < 60;
        let sentiment = if surveyed {
            weighted(
                &mut rng,
                &[
                    (35, HouseholdSentiment::Favorable),
                    (25, HouseholdSentiment::Dicey),
                    (20, HouseholdSentiment::Unfavorable),
                    (20, HouseholdSentiment::Unknown),
                ],
            )
        } else {
            HouseholdSentiment::Unknown
        };
        let last_surveyed_at =
            surveyed.then(|| now.saturating_sub(u64::from(pick(&mut rng, 30)) * 86_400));
        out.households.push(Household {
            id: HouseholdId::new(format!("{DEMO_PREFIX}h-{i:03}"))?,
            mohalla: out.mohallas[mohalla].id.clone(),
            surveyed,
            sentiment,
            last_surveyed_at,
        });
    }

    for i in 0..VOTER_COUNT {
        let household = pick(&mut rng, HOUSEHOLD_COUNT as u32) as usize;
        let stance = weighted(
            &mut rng,
            &[
                (25, VoterStance::Confirmed),
                (20, VoterStance::Likely),
                (20, VoterStance::Swing),
                (20, VoterStance::Opposition),
                (15, VoterStance::Unknown),
            ],
        );
        let turnout = weighted(
            &mut rng,
            &[
                (30, TurnoutPropensity::High),
                (40, TurnoutPropensity::Medium),
                (30, TurnoutPropensity::Low),
            ],
        );
        let away = pick(&mut rng, 100) < 5;
        let present = !away && pick(&mut rng, 100) < 90;
        out.voters.push(EnhancedVoter {
            id: VoterId::new(format!("{DEMO_PREFIX}v-{i:04}"))?,
            household: out.households[household].id.clone(),
            present,
            stance,
            turnout,
            tagged_by_influencer: pick(&mut rng, 100) < 15,
            transport_needed: pick(&mut rng, 100) < 10,
            away,
        });
    }

    for i in 0..INFLUENCER_COUNT {
        let stance = weighted(
            &mut rng,
            &[
                (25, InfluencerStance::Favorable),
                (35, InfluencerStance::Neutral),
                (20, InfluencerStance::Opposed),
                (20, InfluencerStance::Unknown),
            ],
        );
        out.influencers.push(Influencer {
            id: InfluencerId::new(format!("{DEMO_PREFIX}i-{i:02}"))?,
            stance,
            can_be_influenced: pick(&mut rng, 100) < 50,
        });
    }

    Ok(out)
}

// ---------- RNG helpers ----------

fn pick(rng: &mut ChaCha20Rng, n: u32) -> u32 {
    rng.next_u32() % n.max(1)
}

/// Pick by integer weights; total weight need not be 100.
fn weighted<T: Copy>(rng: &mut ChaCha20Rng, table: &[(u32, T)]) -> T {
    let total: u32 = table.iter().map(|(w, _)| w).sum();
    let mut roll = pick(rng, total.max(1));
    for (w, v) in table {
        if roll < *w {
            return *v;
        }
        roll -= w;
    }
    table[table.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate(1_700_000_000).unwrap();
        let b = generate(1_700_000_000).unwrap();
        assert_eq!(a.mohallas, b.mohallas);
        assert_eq!(a.households, b.households);
        assert_eq!(a.voters, b.voters);
        assert_eq!(a.influencers, b.influencers);
    }

    #[test]
    fn every_id_carries_the_demo_prefix() {
        let d = generate(0).unwrap();
        assert!(d.mohallas.iter().all(|m| m.id.as_str().starts_with(DEMO_PREFIX)));
        assert!(d.households.iter().all(|h| h.id.as_str().starts_with(DEMO_PREFIX)));
        assert!(d.voters.iter().all(|v| v.id.as_str().starts_with(DEMO_PREFIX)));
        assert!(d.influencers.iter().all(|i| i.id.as_str().starts_with(DEMO_PREFIX)));
    }

    #[test]
    fn references_stay_inside_the_demo_set() {
        let d = generate(0).unwrap();
        let mohalla_ids: Vec<_> = d.mohallas.iter().map(|m| &m.id).collect();
        assert!(d.households.iter().all(|h| mohalla_ids.contains(&&h.mohalla)));
        let household_ids: Vec<_> = d.households.iter().map(|h| &h.id).collect();
        assert!(d.voters.iter().all(|v| household_ids.contains(&&v.household)));
    }

    #[test]
    fn expected_record_counts() {
        let d = generate(0).unwrap();
        assert_eq!(d.mohallas.len(), MOHALLA_COUNT);
        assert_eq!(d.households.len(), HOUSEHOLD_COUNT);
        assert_eq!(d.voters.len(), VOTER_COUNT);
        assert_eq!(d.influencers.len(), INFLUENCER_COUNT);
    }
}
