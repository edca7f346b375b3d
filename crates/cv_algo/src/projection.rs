//! PROJECT stage: vote share, win probability and band, expected turnout.
//!
//! All divisions guard the zero-denominator case by returning 0; no value
//! leaves this module outside [0, 100]. No error path.

use cv_core::rounding::{clamp_pct, pct_round_half_up, round_half_up, share_pct};
use cv_core::variables::Params;

use crate::rollup::GlobalRollup;

/// Ordered win-probability bands, best first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum WinBand {
    Strong,
    Leaning,
    Tossup,
    Trailing,
    Weak,
}

/// Derived campaign-level projection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Projection {
    /// 100 · committed / present, round-half-up, 0 when no present voters.
    pub vote_share_pct: u8,
    /// Committed share plus the damped swing contribution, saturated to [0,100].
    pub win_probability_pct: u8,
    pub win_probability_band: WinBand,
    /// Σ per-voter turnout weights over present voters, round-half-up.
    pub expected_turnout: u64,
    /// vote share · expected turnout / 100, round-half-up.
    pub expected_votes_if_today: u64,
    pub high_turnout_voters: u64,
    pub medium_turnout_voters: u64,
    pub low_turnout_voters: u64,
}

/// Project campaign-level estimates from the global rollup.
pub fn project(g: &GlobalRollup, p: &Params) -> Projection {
    let present = g.present_voters;
    let vote_share_pct = pct_round_half_up(g.stances.committed(), present);

    // Strictly increasing in both committed share and swing share until the
    // clamp saturates; the damping factor keeps a swing voter worth less than
    // a committed one.
    let committed_share = share_pct(g.stances.committed(), present);
    let swing_share = share_pct(g.stances.swing, present);
    let credit = p.swing_credit.as_u8() as f64 / 100.0;
    let win_raw = clamp_pct(committed_share + credit * swing_share);
    let win_probability_pct = round_half_up(win_raw).min(100) as u8;

    let expected_turnout = round_half_up(
        g.turnout.high as f64 * p.turnout_weight_high
            + g.turnout.medium as f64 * p.turnout_weight_medium
            + g.turnout.low as f64 * p.turnout_weight_low,
    );

    let expected_votes_if_today =
        round_half_up(vote_share_pct as f64 * expected_turnout as f64 / 100.0);

    Projection {
        vote_share_pct,
        win_probability_pct,
        win_probability_band: band_for(win_probability_pct, p),
        expected_turnout,
        expected_votes_if_today,
        high_turnout_voters: g.turnout.high,
        medium_turnout_voters: g.turnout.medium,
        low_turnout_voters: g.turnout.low,
    }
}

/// Bucket a probability into the configured, ordered bands.
pub fn band_for(win_probability_pct: u8, p: &Params) -> WinBand {
    let v = win_probability_pct;
    if v >= p.band_strong.as_u8() {
        WinBand::Strong
    } else if v >= p.band_leaning.as_u8() {
        WinBand::Leaning
    } else if v >= p.band_tossup.as_u8() {
        WinBand::Tossup
    } else if v >= p.band_trailing.as_u8() {
        WinBand::Trailing
    } else {
        WinBand::Weak
    }
}
