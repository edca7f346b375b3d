//! ROLLUP stage: reduce the raw collections into per-mohalla, per-household,
//! and global sums.
//!
//! Pure integer math, bounded passes, no RNG. Aggregation keys on stable
//! identifiers in `BTreeMap`s, so output is independent of input iteration
//! order. Referential gaps are diagnostics, never failures: a household whose
//! mohalla is missing rolls up globally and per-household but to no mohalla;
//! a voter whose household is missing is excluded from every denominator and
//! surfaces only in the orphan count.

use std::collections::BTreeMap;

use cv_core::entities::{HouseholdSentiment, Snapshot, TurnoutPropensity, VoterStance};
use cv_core::ids::{HouseholdId, MohallaId};
use cv_core::variables::Params;

use crate::classify::{classify_household, classify_voter, is_present};

// ---------- Bucket counters ----------

/// Present-voter counts by stance bucket. The five fields always sum to the
/// present-voter count of the scope they describe.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StanceCounts {
    pub confirmed: u64,
    pub likely: u64,
    pub swing: u64,
    pub opposition: u64,
    pub unknown: u64,
}

impl StanceCounts {
    pub fn bump(&mut self, s: VoterStance) {
        match s {
            VoterStance::Confirmed => self.confirmed += 1,
            VoterStance::Likely => self.likely += 1,
            VoterStance::Swing => self.swing += 1,
            VoterStance::Opposition => self.opposition += 1,
            VoterStance::Unknown => self.unknown += 1,
        }
    }

    /// Committed support: Confirmed + Likely.
    pub fn committed(&self) -> u64 {
        self.confirmed + self.likely
    }

    pub fn total(&self) -> u64 {
        self.confirmed + self.likely + self.swing + self.opposition + self.unknown
    }
}

/// Present-voter counts by turnout propensity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TurnoutCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl TurnoutCounts {
    pub fn bump(&mut self, t: TurnoutPropensity) {
        match t {
            TurnoutPropensity::High => self.high += 1,
            TurnoutPropensity::Medium => self.medium += 1,
            TurnoutPropensity::Low => self.low += 1,
        }
    }
}

/// Household counts by sentiment bucket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SentimentCounts {
    pub favorable: u64,
    pub dicey: u64,
    pub unfavorable: u64,
    pub unknown: u64,
}

impl SentimentCounts {
    pub fn bump(&mut self, s: HouseholdSentiment) {
        match s {
            HouseholdSentiment::Favorable => self.favorable += 1,
            HouseholdSentiment::Dicey => self.dicey += 1,
            HouseholdSentiment::Unfavorable => self.unfavorable += 1,
            HouseholdSentiment::Unknown => self.unknown += 1,
        }
    }
}

// ---------- Rollup rows ----------

/// Per-mohalla sums. Every registered mohalla gets a row, including ones with
/// no households yet.
#[derive(Clone, Debug, Default)]
pub struct MohallaRollup {
    pub name: String,
    pub stances: StanceCounts,
    pub turnout: TurnoutCounts,
    pub sentiments: SentimentCounts,
    pub total_households: u64,
    pub surveyed_households: u64,
    pub fresh_surveys: u64,
    pub tagged_voters: u64,
}

impl MohallaRollup {
    pub fn present_voters(&self) -> u64 {
        self.stances.total()
    }
}

/// Per-household voter composition and the derived strength score.
#[derive(Clone, Debug)]
pub struct HouseholdRollup {
    /// None when the owning mohalla reference dangles.
    pub mohalla: Option<MohallaId>,
    pub sentiment: HouseholdSentiment,
    pub stances: StanceCounts,
    /// Weighted support score; monotonic in more Confirmed/Likely voters and
    /// more Favorable sentiment.
    pub strength: i64,
}

/// Constituency-wide sums.
#[derive(Clone, Debug, Default)]
pub struct GlobalRollup {
    pub total_voters: u64,
    pub present_voters: u64,
    pub absentee_voters: u64,
    pub away_voters: u64,
    pub stances: StanceCounts,
    pub turnout: TurnoutCounts,
    pub sentiments: SentimentCounts,
    pub total_households: u64,
    pub surveyed_households: u64,
    pub fresh_surveys: u64,
    pub tagged_voters: u64,
    pub transport_needed: u64,
}

/// Output of the rollup stage, consumed by projection, risk, and ranking.
#[derive(Clone, Debug, Default)]
pub struct Rollups {
    pub global: GlobalRollup,
    pub per_mohalla: BTreeMap<MohallaId, MohallaRollup>,
    pub per_household: BTreeMap<HouseholdId, HouseholdRollup>,
    /// Households referencing a mohalla absent from the registry.
    pub orphan_households: u64,
    /// Voters referencing a household absent from the registry.
    pub orphan_voters: u64,
}

// ---------- Public entry point ----------

/// Reduce a snapshot into per-mohalla / per-household / global rollups.
///
/// `as_of` is the reference instant (epoch seconds) for survey freshness; the
/// engine never reads a clock. Runs in three bounded passes: households,
/// voters, strength scores.
pub fn aggregate(snap: &Snapshot, p: &Params, as_of: u64) -> Rollups {
    let mut out = Rollups::default();

    // Every registered mohalla gets a row, even before any household lands in it.
    for (id, m) in &snap.mohallas {
        out.per_mohalla.insert(
            id.clone(),
            MohallaRollup {
                name: m.name.clone(),
                ..MohallaRollup::default()
            },
        );
    }

    // Pass 1: households.
    for (hid, h) in &snap.households {
        let sentiment = classify_household(h);
        let fresh = is_fresh(h.surveyed, h.last_surveyed_at, as_of, p.freshness_window_secs);

        out.global.total_households += 1;
        out.global.sentiments.bump(sentiment);
        if h.surveyed {
            out.global.surveyed_households += 1;
        }
        if fresh {
            out.global.fresh_surveys += 1;
        }

        let mohalla = match out.per_mohalla.get_mut(&h.mohalla) {
            Some(row) => {
                row.total_households += 1;
                row.sentiments.bump(sentiment);
                if h.surveyed {
                    row.surveyed_households += 1;
                }
                if fresh {
                    row.fresh_surveys += 1;
                }
                Some(h.mohalla.clone())
            }
            None => {
                out.orphan_households += 1;
                None
            }
        };

        out.per_household.insert(
            hid.clone(),
            HouseholdRollup {
                mohalla,
                sentiment,
                stances: StanceCounts::default(),
                strength: 0,
            },
        );
    }

    // Pass 2: voters.
    for v in snap.voters.values() {
        out.global.total_voters += 1;
        if v.away {
            out.global.away_voters += 1;
        } else if !v.present {
            out.global.absentee_voters += 1;
        }

        let Some(hh) = out.per_household.get_mut(&v.household) else {
            out.orphan_voters += 1;
            continue;
        };

        if !is_present(v) {
            continue;
        }

        let stance = classify_voter(v);
        hh.stances.bump(stance);
        let mohalla = hh.mohalla.clone();

        out.global.present_voters += 1;
        out.global.stances.bump(stance);
        out.global.turnout.bump(v.turnout);
        if v.tagged_by_influencer {
            out.global.tagged_voters += 1;
        }
        if v.transport_needed {
            out.global.transport_needed += 1;
        }

        if let Some(mid) = mohalla {
            // Row exists: pass 1 only records a Some mohalla it found in the registry.
            if let Some(row) = out.per_mohalla.get_mut(&mid) {
                row.stances.bump(stance);
                row.turnout.bump(v.turnout);
                if v.tagged_by_influencer {
                    row.tagged_voters += 1;
                }
            }
        }
    }

    // Pass 3: strength scores, now that compositions are complete.
    for hh in out.per_household.values_mut() {
        hh.strength = strength_score(hh.stances, hh.sentiment, p);
    }

    out
}

// ---------- Helpers (pure, deterministic) ----------

/// A survey is fresh when it happened within the recency window of `as_of`.
/// Unsurveyed households and missing timestamps are never fresh.
fn is_fresh(surveyed: bool, last_surveyed_at: Option<u64>, as_of: u64, window_secs: u64) -> bool {
    if !surveyed {
        return false;
    }
    match last_surveyed_at {
        Some(t) => as_of.saturating_sub(t) <= window_secs,
        None => false,
    }
}

/// Weighted household support score, monotonic in more Confirmed/Likely
/// voters and more Favorable sentiment.
fn strength_score(stances: StanceCounts, sentiment: HouseholdSentiment, p: &Params) -> i64 {
    let support = stances.confirmed as i64 * p.strength_confirmed_weight as i64
        + stances.likely as i64 * p.strength_likely_weight as i64;
    let penalty = stances.opposition as i64 * p.strength_opposition_penalty as i64;
    let bonus = match sentiment {
        HouseholdSentiment::Favorable => p.strength_sentiment_favorable as i64,
        HouseholdSentiment::Dicey => p.strength_sentiment_dicey as i64,
        HouseholdSentiment::Unfavorable | HouseholdSentiment::Unknown => 0,
    };
    support + bonus - penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::entities::{EnhancedVoter, Household, Mohalla};
    use cv_core::ids::VoterId;

    fn mohalla(id: &str, name: &str) -> Mohalla {
        Mohalla {
            id: MohallaId::new(id).unwrap(),
            name: name.into(),
            ward: None,
        }
    }

    fn household(id: &str, mohalla: &str, surveyed: bool) -> Household {
        Household {
            id: HouseholdId::new(id).unwrap(),
            mohalla: MohallaId::new(mohalla).unwrap(),
            surveyed,
            sentiment: HouseholdSentiment::Unknown,
            last_surveyed_at: None,
        }
    }

    fn voter(id: &str, hh: &str, stance: VoterStance) -> EnhancedVoter {
        EnhancedVoter {
            id: VoterId::new(id).unwrap(),
            household: HouseholdId::new(hh).unwrap(),
            present: true,
            stance,
            turnout: TurnoutPropensity::Medium,
            tagged_by_influencer: false,
            transport_needed: false,
            away: false,
        }
    }

    fn snap(
        mohallas: Vec<Mohalla>,
        households: Vec<Household>,
        voters: Vec<EnhancedVoter>,
    ) -> Snapshot {
        Snapshot {
            mohallas: mohallas.into_iter().map(|m| (m.id.clone(), m)).collect(),
            households: households.into_iter().map(|h| (h.id.clone(), h)).collect(),
            voters: voters.into_iter().map(|v| (v.id.clone(), v)).collect(),
            influencers: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_snapshot_rolls_up_to_zero() {
        let r = aggregate(&Snapshot::default(), &Params::default(), 0);
        assert_eq!(r.global.total_voters, 0);
        assert_eq!(r.global.present_voters, 0);
        assert!(r.per_mohalla.is_empty());
        assert_eq!(r.orphan_households, 0);
    }

    #[test]
    fn stance_buckets_sum_to_present_voters() {
        let s = snap(
            vec![mohalla("m-1", "North")],
            vec![household("h-1", "m-1", true)],
            vec![
                voter("v-1", "h-1", VoterStance::Confirmed),
                voter("v-2", "h-1", VoterStance::Swing),
                voter("v-3", "h-1", VoterStance::Opposition),
            ],
        );
        let r = aggregate(&s, &Params::default(), 0);
        assert_eq!(r.global.stances.total(), r.global.present_voters);
        assert_eq!(r.per_mohalla[&MohallaId::new("m-1").unwrap()].present_voters(), 3);
    }

    #[test]
    fn away_and_absentee_excluded_from_present() {
        let mut away = voter("v-1", "h-1", VoterStance::Confirmed);
        away.away = true;
        let mut absentee = voter("v-2", "h-1", VoterStance::Confirmed);
        absentee.present = false;
        let s = snap(
            vec![mohalla("m-1", "North")],
            vec![household("h-1", "m-1", false)],
            vec![away, absentee, voter("v-3", "h-1", VoterStance::Likely)],
        );
        let r = aggregate(&s, &Params::default(), 0);
        assert_eq!(r.global.total_voters, 3);
        assert_eq!(r.global.present_voters, 1);
        assert_eq!(r.global.away_voters, 1);
        assert_eq!(r.global.absentee_voters, 1);
        assert_eq!(r.global.stances.total(), 1);
    }

    #[test]
    fn orphan_household_counts_globally_but_not_per_mohalla() {
        let s = snap(
            vec![mohalla("m-1", "North")],
            vec![household("h-1", "m-ghost", true)],
            vec![voter("v-1", "h-1", VoterStance::Confirmed)],
        );
        let r = aggregate(&s, &Params::default(), 0);
        assert_eq!(r.orphan_households, 1);
        assert_eq!(r.global.present_voters, 1);
        assert_eq!(r.per_mohalla[&MohallaId::new("m-1").unwrap()].present_voters(), 0);
        // The voter still rolls up to its household.
        let hh = &r.per_household[&HouseholdId::new("h-1").unwrap()];
        assert_eq!(hh.stances.confirmed, 1);
        assert!(hh.mohalla.is_none());
    }

    #[test]
    fn orphan_voter_excluded_from_all_denominators() {
        let s = snap(
            vec![mohalla("m-1", "North")],
            vec![household("h-1", "m-1", false)],
            vec![voter("v-1", "h-ghost", VoterStance::Confirmed)],
        );
        let r = aggregate(&s, &Params::default(), 0);
        assert_eq!(r.orphan_voters, 1);
        assert_eq!(r.global.total_voters, 1);
        assert_eq!(r.global.present_voters, 0);
        assert_eq!(r.global.stances.total(), 0);
    }

    #[test]
    fn freshness_respects_window_and_survey_flag() {
        let window = Params::default().freshness_window_secs;
        let now = 1_700_000_000u64;
        let mut fresh = household("h-1", "m-1", true);
        fresh.last_surveyed_at = Some(now - window / 2);
        let mut stale = household("h-2", "m-1", true);
        stale.last_surveyed_at = Some(now - window - 1);
        let mut unsurveyed = household("h-3", "m-1", false);
        unsurveyed.last_surveyed_at = Some(now);
        let s = snap(vec![mohalla("m-1", "North")], vec![fresh, stale, unsurveyed], vec![]);
        let r = aggregate(&s, &Params::default(), now);
        assert_eq!(r.global.fresh_surveys, 1);
        assert_eq!(r.global.surveyed_households, 2);
    }

    #[test]
    fn strength_monotonic_in_committed_voters_and_sentiment() {
        let p = Params::default();
        let weak = strength_score(
            StanceCounts { confirmed: 1, ..Default::default() },
            HouseholdSentiment::Unknown,
            &p,
        );
        let more_committed = strength_score(
            StanceCounts { confirmed: 2, ..Default::default() },
            HouseholdSentiment::Unknown,
            &p,
        );
        let better_sentiment = strength_score(
            StanceCounts { confirmed: 1, ..Default::default() },
            HouseholdSentiment::Favorable,
            &p,
        );
        assert!(more_committed > weak);
        assert!(better_sentiment > weak);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        // BTreeMap keying makes this structural; assert it anyway on the output.
        let a = snap(
            vec![mohalla("m-1", "North"), mohalla("m-2", "South")],
            vec![household("h-1", "m-1", true), household("h-2", "m-2", false)],
            vec![
                voter("v-1", "h-1", VoterStance::Confirmed),
                voter("v-2", "h-2", VoterStance::Swing),
            ],
        );
        let b = snap(
            vec![mohalla("m-2", "South"), mohalla("m-1", "North")],
            vec![household("h-2", "m-2", false), household("h-1", "m-1", true)],
            vec![
                voter("v-2", "h-2", VoterStance::Swing),
                voter("v-1", "h-1", VoterStance::Confirmed),
            ],
        );
        let ra = aggregate(&a, &Params::default(), 0);
        let rb = aggregate(&b, &Params::default(), 0);
        assert_eq!(ra.global.stances, rb.global.stances);
        assert_eq!(
            ra.per_mohalla.keys().collect::<Vec<_>>(),
            rb.per_mohalla.keys().collect::<Vec<_>>()
        );
    }
}
