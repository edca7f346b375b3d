//! Tunable parameters with safe defaults and domain validation.
//!
//! Every cut-point, weight, and window the analytics stages consume lives
//! here as a named field, never as a literal baked into an algorithm:
//! operators retune by supplying a params JSON, not by recompiling logic.

#[cfg(feature = "serde")]
use serde::de::{Error as DeError, Unexpected};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

// ---------- Newtypes with invariants (validated on de/ser) ----------

/// Integer percent in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Pct(u8);

impl Pct {
    pub fn new(v: u8) -> Result<Self, String> {
        if v <= 100 {
            Ok(Self(v))
        } else {
            Err(format!("pct out of range: {v}"))
        }
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Pct {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = u8::deserialize(d)?;
        if v <= 100 {
            Ok(Pct(v))
        } else {
            Err(D::Error::invalid_value(Unexpected::Unsigned(v as u64), &"0..=100"))
        }
    }
}

// ---------- Params ----------

/// Operator-tunable configuration for one engine invocation.
///
/// Defaults describe the demo profile; none of the values is load-bearing in
/// the algorithms, and `validate_domains` must pass before use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Params {
    // Projection: win probability & bands
    /// Fraction of swing share credited as likely-convertible (damped blend).
    pub swing_credit: Pct,
    /// Win-probability band cut-points, strictly descending.
    /// Strong ≥ strong > Leaning ≥ leaning > Tossup ≥ tossup > Trailing ≥ trailing > Weak.
    pub band_strong: Pct,
    pub band_leaning: Pct,
    pub band_tossup: Pct,
    pub band_trailing: Pct,

    // Projection: per-voter turnout contributions, 0 ≤ wL ≤ wM ≤ wH ≤ 1.
    pub turnout_weight_high: f64,
    pub turnout_weight_medium: f64,
    pub turnout_weight_low: f64,

    // Risk thresholds
    /// Opposition share above which a mohalla is a danger pocket…
    pub danger_opposition_pct: Pct,
    /// …provided its present-voter count exceeds this sample floor.
    pub danger_min_present: u32,
    /// Committed-support share below which a mohalla is a weak pocket.
    pub weak_support_pct: Pct,
    /// Survey-coverage share below which a mohalla is under-surveyed.
    pub coverage_floor_pct: Pct,
    /// Recency window for a survey to count as fresh, in seconds.
    pub freshness_window_secs: u64,

    // Household strength score
    pub strength_confirmed_weight: u32,
    pub strength_likely_weight: u32,
    pub strength_opposition_penalty: u32,
    pub strength_sentiment_favorable: u32,
    pub strength_sentiment_dicey: u32,

    // Swing-mohalla opportunity score blend
    pub opportunity_swing_weight: u32,
    pub opportunity_margin_weight: u32,

    // Store boundary
    /// Transactional-batch ceiling for chunked writes/deletes.
    pub max_batch_size: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            swing_credit: Pct(50),
            band_strong: Pct(65),
            band_leaning: Pct(55),
            band_tossup: Pct(45),
            band_trailing: Pct(35),

            turnout_weight_high: 0.9,
            turnout_weight_medium: 0.6,
            turnout_weight_low: 0.2,

            danger_opposition_pct: Pct(40),
            danger_min_present: 10,
            weak_support_pct: Pct(40),
            coverage_floor_pct: Pct(50),
            freshness_window_secs: 14 * 86_400,

            strength_confirmed_weight: 3,
            strength_likely_weight: 2,
            strength_opposition_penalty: 2,
            strength_sentiment_favorable: 4,
            strength_sentiment_dicey: 1,

            opportunity_swing_weight: 2,
            opportunity_margin_weight: 1,

            max_batch_size: 500,
        }
    }
}

// ---------- Validation (domain + cross-field consistency) ----------

#[derive(Debug)]
pub enum VarsError {
    Domain(String),
    Consistency(String),
}

impl core::fmt::Display for VarsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VarsError::Domain(m) => write!(f, "domain: {m}"),
            VarsError::Consistency(m) => write!(f, "consistency: {m}"),
        }
    }
}

impl std::error::Error for VarsError {}

pub type VarsResult<T> = Result<T, VarsError>;

impl Params {
    /// Validate basic numeric domains and cross-field consistency.
    pub fn validate_domains(&self) -> VarsResult<()> {
        // Band cut-points must be strictly descending so bands partition [0,100].
        let bands = [
            self.band_strong.as_u8(),
            self.band_leaning.as_u8(),
            self.band_tossup.as_u8(),
            self.band_trailing.as_u8(),
        ];
        if !bands.windows(2).all(|w| w[0] > w[1]) {
            return Err(VarsError::Domain(format!(
                "win-probability bands must be strictly descending, got {bands:?}"
            )));
        }

        // Turnout weights: finite, in [0,1], ordered wL ≤ wM ≤ wH.
        for (k, v) in [
            ("turnout_weight_high", self.turnout_weight_high),
            ("turnout_weight_medium", self.turnout_weight_medium),
            ("turnout_weight_low", self.turnout_weight_low),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(VarsError::Domain(format!(
                    "{k} must be finite in [0.0,1.0], got {v}"
                )));
            }
        }
        if self.turnout_weight_low > self.turnout_weight_medium
            || self.turnout_weight_medium > self.turnout_weight_high
        {
            return Err(VarsError::Consistency(
                "turnout weights must satisfy wL <= wM <= wH".into(),
            ));
        }

        if self.max_batch_size == 0 {
            return Err(VarsError::Domain("max_batch_size must be >= 1".into()));
        }

        // Opportunity score must depend on at least one component.
        if self.opportunity_swing_weight == 0 && self.opportunity_margin_weight == 0 {
            return Err(VarsError::Consistency(
                "opportunity weights must not both be zero".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(Params::default().validate_domains().is_ok());
    }

    #[test]
    fn pct_rejects_over_100() {
        assert!(Pct::new(100).is_ok());
        assert!(Pct::new(101).is_err());
    }

    #[test]
    fn non_descending_bands_rejected() {
        let mut p = Params::default();
        p.band_leaning = p.band_strong;
        assert!(matches!(p.validate_domains(), Err(VarsError::Domain(_))));
    }

    #[test]
    fn unordered_turnout_weights_rejected() {
        let mut p = Params::default();
        p.turnout_weight_low = 0.95;
        assert!(matches!(p.validate_domains(), Err(VarsError::Consistency(_))));
    }

    #[test]
    fn zero_batch_ceiling_rejected() {
        let mut p = Params::default();
        p.max_batch_size = 0;
        assert!(matches!(p.validate_domains(), Err(VarsError::Domain(_))));
    }
}
