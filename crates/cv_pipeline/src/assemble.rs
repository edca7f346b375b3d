//! ASSEMBLE stage: compose the dashboard record from the pure stages.
//!
//! Deterministic assembly only: no I/O, no clock, no RNG. Invokes rollup →
//! projection/risk → ranking in dependency order and folds their outputs,
//! plus the simple counts that need no rollup, into one fixed-shape record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cv_core::entities::{HouseholdSentiment, Snapshot};
use cv_core::ids::{HouseholdId, MohallaId};
use cv_core::rounding::pct_round_half_up;
use cv_core::variables::Params;

use cv_algo::classify::is_unconverted;
use cv_algo::projection::{project, WinBand};
use cv_algo::rank::{rank_strongest_families, rank_swing_mohallas, swing_families};
use cv_algo::risk::detect_risks;
use cv_algo::rollup::{aggregate, HouseholdRollup, MohallaRollup};

// ---------- Output records (fixed-shape, exhaustively enumerated) ----------

/// Per-mohalla derived rollup. Ordering of the containing map is by id and
/// carries no ranking meaning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MohallaMetrics {
    pub name: String,
    pub present_voters: u64,
    pub confirmed_voters: u64,
    pub likely_voters: u64,
    pub swing_voters: u64,
    pub opposition_voters: u64,
    pub unknown_voters: u64,
    pub high_turnout_voters: u64,
    pub medium_turnout_voters: u64,
    pub low_turnout_voters: u64,
    pub total_households: u64,
    pub surveyed_households: u64,
    pub coverage_pct: u8,
    pub fresh_surveys: u64,
    pub tagged_voters: u64,
    pub vote_share_pct: u8,
    pub opposition_share_pct: u8,
}

/// Per-household derived rollup used by the family rankings and lists.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FamilyMetrics {
    pub household: HouseholdId,
    /// Absent when the owning mohalla reference dangles.
    pub mohalla: Option<MohallaId>,
    pub sentiment: HouseholdSentiment,
    pub present_voters: u64,
    pub confirmed_voters: u64,
    pub likely_voters: u64,
    pub swing_voters: u64,
    pub opposition_voters: u64,
    pub unknown_voters: u64,
    pub strength: i64,
}

/// One row of the swing-mohalla ranking (ordered, highest opportunity first).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwingMohalla {
    pub mohalla: MohallaId,
    pub name: String,
    pub opportunity_score: i64,
    pub swing_voters: u64,
    pub vote_share_pct: u8,
}

/// One structured risk alert, at most one per (mohalla, kind).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAlertOut {
    pub mohalla: MohallaId,
    /// "danger_pocket" | "weak_pocket" | "under_surveyed"
    pub kind: String,
    /// "critical" | "warning"
    pub severity: String,
    pub observed_pct: u8,
}

/// The one immutable result record consumed by the presentation layer.
/// Recomputed fresh on every invocation; no identity, no partial updates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    // Registry totals
    pub total_mohallas: u64,
    pub total_households: u64,
    pub surveyed_households: u64,
    pub favorable_households: u64,
    pub dicey_households: u64,
    pub unfavorable_households: u64,
    pub unknown_sentiment_households: u64,
    pub coverage_pct: u8,
    pub fresh_surveys: u64,
    pub freshness_pct: u8,
    pub total_voters: u64,
    pub present_voters: u64,
    pub absentee_voters: u64,
    pub away_voters: u64,

    // Support composition (present voters; the five buckets sum to present)
    pub confirmed_voters: u64,
    pub likely_voters: u64,
    pub swing_voters: u64,
    pub opposition_voters: u64,
    pub unknown_voters: u64,

    // Projection
    pub vote_share_pct: u8,
    pub win_probability_pct: u8,
    /// "Strong" | "Leaning" | "Tossup" | "Trailing" | "Weak"
    pub win_probability_band: String,
    pub expected_turnout: u64,
    pub expected_votes_if_today: u64,
    pub high_turnout_voters: u64,
    pub medium_turnout_voters: u64,
    pub low_turnout_voters: u64,

    // Simple counts (no rollup required)
    pub transport_needed_voters: u64,
    pub tagged_voters: u64,
    pub tagged_pct: u8,
    pub unconverted_influencers: u64,

    // Referential-gap diagnostics (reported, never fatal)
    pub orphan_households: u64,
    pub orphan_voters: u64,

    // Risk pockets and alerts (id-ascending)
    pub danger_pockets: Vec<MohallaId>,
    pub weak_pockets: Vec<MohallaId>,
    pub under_surveyed_mohallas: Vec<MohallaId>,
    pub risk_alerts: Vec<RiskAlertOut>,

    // Ranked views (order significant) and filtered lists
    pub swing_mohallas: Vec<SwingMohalla>,
    pub strongest_families: Vec<FamilyMetrics>,
    pub swing_families: Vec<FamilyMetrics>,
    pub swing_family_count: u64,

    // Per-mohalla pass-through for the presentation layer
    pub mohalla_metrics: BTreeMap<MohallaId, MohallaMetrics>,
}

// ---------- Public entry point ----------

/// Compute every derived statistic from one snapshot of the four collections.
///
/// `as_of` is the reference instant (epoch seconds) for survey freshness;
/// `top_n` bounds the ranked views. Pure and total: empty collections produce
/// all-zero metrics, dangling references are reported in the orphan counts,
/// and no arithmetic edge case can raise.
pub fn assemble(snap: &Snapshot, p: &Params, as_of: u64, top_n: usize) -> DashboardMetrics {
    let rollups = aggregate(snap, p, as_of);
    let projection = project(&rollups.global, p);
    let risk = detect_risks(&rollups, p);

    let swing_mohallas = rank_swing_mohallas(&rollups, p, top_n)
        .into_iter()
        .map(|s| SwingMohalla {
            name: rollups
                .per_mohalla
                .get(&s.mohalla)
                .map(|row| row.name.clone())
                .unwrap_or_default(),
            mohalla: s.mohalla,
            opportunity_score: s.opportunity,
            swing_voters: s.swing_voters,
            vote_share_pct: s.vote_share_pct,
        })
        .collect();

    let strongest_families: Vec<FamilyMetrics> = rank_strongest_families(&rollups, top_n)
        .into_iter()
        .map(|(hid, hh)| family_metrics(hid, &hh))
        .collect();

    let swing_family_rows = swing_families(&rollups);
    let swing_family_count = swing_family_rows.len() as u64;
    let swing_families_out: Vec<FamilyMetrics> = swing_family_rows
        .into_iter()
        .map(|(hid, hh)| family_metrics(hid, &hh))
        .collect();

    let g = &rollups.global;
    let unconverted_influencers =
        snap.influencers.values().filter(|i| is_unconverted(i)).count() as u64;

    DashboardMetrics {
        total_mohallas: snap.mohallas.len() as u64,
        total_households: g.total_households,
        surveyed_households: g.surveyed_households,
        favorable_households: g.sentiments.favorable,
        dicey_households: g.sentiments.dicey,
        unfavorable_households: g.sentiments.unfavorable,
        unknown_sentiment_households: g.sentiments.unknown,
        coverage_pct: pct_round_half_up(g.surveyed_households, g.total_households),
        fresh_surveys: g.fresh_surveys,
        freshness_pct: pct_round_half_up(g.fresh_surveys, g.surveyed_households),
        total_voters: g.total_voters,
        present_voters: g.present_voters,
        absentee_voters: g.absentee_voters,
        away_voters: g.away_voters,

        confirmed_voters: g.stances.confirmed,
        likely_voters: g.stances.likely,
        swing_voters: g.stances.swing,
        opposition_voters: g.stances.opposition,
        unknown_voters: g.stances.unknown,

        vote_share_pct: projection.vote_share_pct,
        win_probability_pct: projection.win_probability_pct,
        win_probability_band: band_label(projection.win_probability_band).to_string(),
        expected_turnout: projection.expected_turnout,
        expected_votes_if_today: projection.expected_votes_if_today,
        high_turnout_voters: projection.high_turnout_voters,
        medium_turnout_voters: projection.medium_turnout_voters,
        low_turnout_voters: projection.low_turnout_voters,

        transport_needed_voters: g.transport_needed,
        tagged_voters: g.tagged_voters,
        tagged_pct: pct_round_half_up(g.tagged_voters, g.present_voters),
        unconverted_influencers,

        orphan_households: rollups.orphan_households,
        orphan_voters: rollups.orphan_voters,

        danger_pockets: risk.danger_pockets,
        weak_pockets: risk.weak_pockets,
        under_surveyed_mohallas: risk.under_surveyed,
        risk_alerts: risk
            .alerts
            .into_iter()
            .map(|a| RiskAlertOut {
                mohalla: a.mohalla,
                kind: a.kind.code().to_string(),
                severity: a.severity.code().to_string(),
                observed_pct: a.observed_pct,
            })
            .collect(),

        swing_mohallas,
        strongest_families,
        swing_families: swing_families_out,
        swing_family_count,

        mohalla_metrics: rollups
            .per_mohalla
            .iter()
            .map(|(mid, row)| (mid.clone(), mohalla_metrics(row)))
            .collect(),
    }
}

// ---------- Conversion helpers ----------

fn band_label(b: WinBand) -> &'static str {
    match b {
        WinBand::Strong => "Strong",
        WinBand::Leaning => "Leaning",
        WinBand::Tossup => "Tossup",
        WinBand::Trailing => "Trailing",
        WinBand::Weak => "Weak",
    }
}

fn mohalla_metrics(row: &MohallaRollup) -> MohallaMetrics {
    let present = row.present_voters();
    MohallaMetrics {
        name: row.name.clone(),
        present_voters: present,
        confirmed_voters: row.stances.confirmed,
        likely_voters: row.stances.likely,
        swing_voters: row.stances.swing,
        opposition_voters: row.stances.opposition,
        unknown_voters: row.stances.unknown,
        high_turnout_voters: row.turnout.high,
        medium_turnout_voters: row.turnout.medium,
        low_turnout_voters: row.turnout.low,
        total_households: row.total_households,
        surveyed_households: row.surveyed_households,
        coverage_pct: pct_round_half_up(row.surveyed_households, row.total_households),
        fresh_surveys: row.fresh_surveys,
        tagged_voters: row.tagged_voters,
        vote_share_pct: pct_round_half_up(row.stances.committed(), present),
        opposition_share_pct: pct_round_half_up(row.stances.opposition, present),
    }
}

fn family_metrics(household: HouseholdId, hh: &HouseholdRollup) -> FamilyMetrics {
    FamilyMetrics {
        household,
        mohalla: hh.mohalla.clone(),
        sentiment: hh.sentiment,
        present_voters: hh.stances.total(),
        confirmed_voters: hh.stances.confirmed,
        likely_voters: hh.stances.likely,
        swing_voters: hh.stances.swing,
        opposition_voters: hh.stances.opposition,
        unknown_voters: hh.stances.unknown,
        strength: hh.strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::entities::{EnhancedVoter, Household, Influencer, InfluencerStance, Mohalla, TurnoutPropensity, VoterStance};
    use cv_core::ids::{InfluencerId, VoterId};

    fn snapshot_one_mohalla() -> Snapshot {
        let mut snap = Snapshot::default();
        let mid = MohallaId::new("m-1").unwrap();
        snap.mohallas.insert(
            mid.clone(),
            Mohalla { id: mid.clone(), name: "North".into(), ward: None },
        );
        let hid = HouseholdId::new("h-1").unwrap();
        snap.households.insert(
            hid.clone(),
            Household {
                id: hid.clone(),
                mohalla: mid,
                surveyed: true,
                sentiment: HouseholdSentiment::Favorable,
                last_surveyed_at: Some(90),
            },
        );
        for (i, stance) in [
            VoterStance::Confirmed,
            VoterStance::Confirmed,
            VoterStance::Likely,
            VoterStance::Swing,
            VoterStance::Opposition,
        ]
        .into_iter()
        .enumerate()
        {
            let vid = VoterId::new(format!("v-{i}")).unwrap();
            snap.voters.insert(
                vid.clone(),
                EnhancedVoter {
                    id: vid,
                    household: hid.clone(),
                    present: true,
                    stance,
                    turnout: TurnoutPropensity::High,
                    tagged_by_influencer: i == 0,
                    transport_needed: i == 1,
                    away: false,
                },
            );
        }
        let iid = InfluencerId::new("i-1").unwrap();
        snap.influencers.insert(
            iid.clone(),
            Influencer { id: iid, stance: InfluencerStance::Neutral, can_be_influenced: true },
        );
        snap
    }

    #[test]
    fn empty_snapshot_assembles_to_all_zero() {
        let m = assemble(&Snapshot::default(), &Params::default(), 0, 5);
        assert_eq!(m.total_voters, 0);
        assert_eq!(m.vote_share_pct, 0);
        assert_eq!(m.win_probability_pct, 0);
        assert_eq!(m.expected_turnout, 0);
        assert_eq!(m.win_probability_band, "Weak");
        assert!(m.risk_alerts.is_empty());
        assert!(m.swing_mohallas.is_empty());
        assert!(m.strongest_families.is_empty());
        assert!(m.mohalla_metrics.is_empty());
    }

    #[test]
    fn stance_buckets_sum_to_present_voters() {
        let m = assemble(&snapshot_one_mohalla(), &Params::default(), 100, 5);
        let sum = m.confirmed_voters
            + m.likely_voters
            + m.swing_voters
            + m.opposition_voters
            + m.unknown_voters;
        assert_eq!(sum, m.present_voters);
        assert_eq!(m.present_voters, 5);
    }

    #[test]
    fn simple_counts_need_no_rollup() {
        let m = assemble(&snapshot_one_mohalla(), &Params::default(), 100, 5);
        assert_eq!(m.tagged_voters, 1);
        assert_eq!(m.tagged_pct, 20);
        assert_eq!(m.transport_needed_voters, 1);
        assert_eq!(m.unconverted_influencers, 1);
        assert_eq!(m.coverage_pct, 100);
        assert_eq!(m.freshness_pct, 100);
    }

    #[test]
    fn family_lists_carry_household_composition() {
        let m = assemble(&snapshot_one_mohalla(), &Params::default(), 100, 5);
        assert_eq!(m.strongest_families.len(), 1);
        let fam = &m.strongest_families[0];
        assert_eq!(fam.present_voters, 5);
        assert_eq!(fam.confirmed_voters, 2);
        assert!(fam.strength > 0);
        // Mixed committed/opposition composition makes it a swing family too.
        assert_eq!(m.swing_family_count, 1);
        assert_eq!(m.swing_families.len(), 1);
    }

    #[test]
    fn mohalla_metrics_expose_per_unit_shares() {
        let m = assemble(&snapshot_one_mohalla(), &Params::default(), 100, 5);
        let row = &m.mohalla_metrics[&MohallaId::new("m-1").unwrap()];
        assert_eq!(row.present_voters, 5);
        assert_eq!(row.vote_share_pct, 60);
        assert_eq!(row.opposition_share_pct, 20);
        assert_eq!(row.coverage_pct, 100);
    }
}
