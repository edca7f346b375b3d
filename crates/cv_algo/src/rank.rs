//! RANK stage: deterministic top-N views for operator triage.
//!
//! Sort keys are explicit and every ranking breaks ties by identifier
//! ascending, so re-running on unchanged data reproduces an identical
//! ordered sequence.

use cv_core::determinism::rank_top_n;
use cv_core::ids::{HouseholdId, MohallaId};
use cv_core::rounding::pct_round_half_up;
use cv_core::variables::Params;

use crate::rollup::{HouseholdRollup, Rollups, StanceCounts};

/// One mohalla's position in the swing ranking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwingScore {
    pub mohalla: MohallaId,
    /// Composite of swing-voter count and proximity of vote share to 50%.
    pub opportunity: i64,
    pub swing_voters: u64,
    pub vote_share_pct: u8,
}

/// Top-N swing mohallas by opportunity score descending, ties by id ascending.
/// Mohallas without present voters carry no persuasion target and are skipped.
pub fn rank_swing_mohallas(rollups: &Rollups, p: &Params, n: usize) -> Vec<SwingScore> {
    let mut out: Vec<SwingScore> = Vec::new();
    for (mid, row) in &rollups.per_mohalla {
        let present = row.present_voters();
        if present == 0 {
            continue;
        }
        let vote_share_pct = pct_round_half_up(row.stances.committed(), present);
        out.push(SwingScore {
            mohalla: mid.clone(),
            opportunity: opportunity_score(row.stances.swing, vote_share_pct, p),
            swing_voters: row.stances.swing,
            vote_share_pct,
        });
    }
    rank_top_n(&mut out, n, |s| (s.opportunity, s.mohalla.clone()));
    out
}

/// Top-N households by strength score descending, ties by id ascending.
pub fn rank_strongest_families(rollups: &Rollups, n: usize) -> Vec<(HouseholdId, HouseholdRollup)> {
    let mut out: Vec<(HouseholdId, HouseholdRollup)> = rollups
        .per_household
        .iter()
        .map(|(hid, hh)| (hid.clone(), hh.clone()))
        .collect();
    rank_top_n(&mut out, n, |(hid, hh)| (hh.strength, hid.clone()));
    out
}

/// Households whose voter composition is neither solidly favorable nor
/// solidly opposed: the persuasion targets. Filtered, not ranked; emitted in
/// ascending household-id order for determinism.
pub fn swing_families(rollups: &Rollups) -> Vec<(HouseholdId, HouseholdRollup)> {
    rollups
        .per_household
        .iter()
        .filter(|(_, hh)| is_swing_family(&hh.stances))
        .map(|(hid, hh)| (hid.clone(), hh.clone()))
        .collect()
}

// ---------- Scoring rules (pure) ----------

/// Opportunity = swing count and closeness of the race, blended by the
/// configured weights. Proximity peaks at a 50% vote share.
fn opportunity_score(swing_voters: u64, vote_share_pct: u8, p: &Params) -> i64 {
    let proximity = 50 - (vote_share_pct as i64 - 50).abs();
    p.opportunity_swing_weight as i64 * swing_voters as i64
        + p.opportunity_margin_weight as i64 * proximity
}

/// Mixed or swing-carrying composition. Solidly favorable (all committed),
/// solidly opposed (all opposition), pure-unknown, and voterless households
/// are all excluded.
fn is_swing_family(s: &StanceCounts) -> bool {
    let present = s.total();
    if present == 0 {
        return false;
    }
    if s.committed() == present || s.opposition == present || s.unknown == present {
        return false;
    }
    s.swing > 0 || (s.committed() > 0 && s.opposition > 0)
}
