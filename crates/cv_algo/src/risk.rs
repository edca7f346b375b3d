//! RISK stage: threshold rules over per-mohalla rollups.
//!
//! Evaluates conditions in fixed order per mohalla (danger → weak →
//! under-surveyed), one alert per (mohalla, kind) per computation. Mohallas
//! below the sample floor never trigger danger alerts, so a 3-voter pocket
//! cannot flag on noise.

use cv_core::ids::MohallaId;
use cv_core::rounding::pct_round_half_up;
use cv_core::variables::Params;

use crate::rollup::{MohallaRollup, Rollups};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RiskKind {
    /// Opposition share above the configured high-risk threshold.
    DangerPocket,
    /// Committed support below the configured floor.
    WeakPocket,
    /// Survey coverage below the configured floor.
    UnderSurveyed,
}

impl RiskKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            RiskKind::DangerPocket => "danger_pocket",
            RiskKind::WeakPocket => "weak_pocket",
            RiskKind::UnderSurveyed => "under_surveyed",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn code(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// One triggered condition for one mohalla.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RiskAlert {
    pub mohalla: MohallaId,
    pub kind: RiskKind,
    pub severity: Severity,
    /// The observed metric behind the trigger (opposition share, committed
    /// share, or coverage), as an integer percent.
    pub observed_pct: u8,
}

/// Output of the risk stage. Pocket lists are in ascending mohalla-id order.
#[derive(Clone, Debug, Default)]
pub struct RiskReport {
    pub danger_pockets: Vec<MohallaId>,
    pub weak_pockets: Vec<MohallaId>,
    pub under_surveyed: Vec<MohallaId>,
    pub alerts: Vec<RiskAlert>,
}

/// Apply threshold rules over every per-mohalla rollup.
pub fn detect_risks(rollups: &Rollups, p: &Params) -> RiskReport {
    let mut out = RiskReport::default();

    for (mid, row) in &rollups.per_mohalla {
        // Each condition is checked exactly once per mohalla, so duplicate
        // alerts for the same (mohalla, kind) cannot arise.
        if let Some(alert) = eval_danger(mid, row, p) {
            out.danger_pockets.push(mid.clone());
            out.alerts.push(alert);
        }
        if let Some(alert) = eval_weak(mid, row, p) {
            out.weak_pockets.push(mid.clone());
            out.alerts.push(alert);
        }
        if let Some(alert) = eval_coverage(mid, row, p) {
            out.under_surveyed.push(mid.clone());
            out.alerts.push(alert);
        }
    }

    out
}

// ---------- Per-condition rules (pure) ----------

/// Danger pocket: opposition share above threshold AND sample above the floor.
fn eval_danger(mid: &MohallaId, row: &MohallaRollup, p: &Params) -> Option<RiskAlert> {
    let present = row.present_voters();
    if present <= p.danger_min_present as u64 {
        return None;
    }
    let opposition_pct = pct_round_half_up(row.stances.opposition, present);
    if opposition_pct > p.danger_opposition_pct.as_u8() {
        Some(RiskAlert {
            mohalla: mid.clone(),
            kind: RiskKind::DangerPocket,
            severity: Severity::Critical,
            observed_pct: opposition_pct,
        })
    } else {
        None
    }
}

/// Weak pocket: committed support below the floor. Distinct from danger:
/// low support need not be opposition-dominated. Empty mohallas are skipped.
fn eval_weak(mid: &MohallaId, row: &MohallaRollup, p: &Params) -> Option<RiskAlert> {
    let present = row.present_voters();
    if present == 0 {
        return None;
    }
    let committed_pct = pct_round_half_up(row.stances.committed(), present);
    if committed_pct < p.weak_support_pct.as_u8() {
        Some(RiskAlert {
            mohalla: mid.clone(),
            kind: RiskKind::WeakPocket,
            severity: Severity::Warning,
            observed_pct: committed_pct,
        })
    } else {
        None
    }
}

/// Under-surveyed: coverage below the floor. Mohallas without households are
/// skipped rather than reported at 0% coverage.
fn eval_coverage(mid: &MohallaId, row: &MohallaRollup, p: &Params) -> Option<RiskAlert> {
    if row.total_households == 0 {
        return None;
    }
    let coverage_pct = pct_round_half_up(row.surveyed_households, row.total_households);
    if coverage_pct < p.coverage_floor_pct.as_u8() {
        Some(RiskAlert {
            mohalla: mid.clone(),
            kind: RiskKind::UnderSurveyed,
            severity: Severity::Warning,
            observed_pct: coverage_pct,
        })
    } else {
        None
    }
}
