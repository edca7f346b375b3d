//! Entity records and closed classification enums.
//!
//! Every enum carries an explicit wire token and an `Unknown`/default bucket.
//! Deserialization is total: an unmapped or malformed token folds into the
//! default bucket instead of rejecting the record, so classification totality
//! is enforced by the type system, not by convention.

use std::collections::BTreeMap;

use crate::ids::{HouseholdId, InfluencerId, MohallaId, VoterId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------- Stance / sentiment / turnout domains ----------

/// Define an enum with explicit wire tokens and a default bucket that also
/// absorbs every unmapped token on deserialization.
macro_rules! token_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident = $token:expr),+ $(,)? } default $default:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            /// Stable wire token.
            pub fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        #[cfg(feature = "serde")]
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.token())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                Ok(match s.as_str() {
                    $($token => $name::$variant,)+
                    _ => $name::$default,
                })
            }
        }
    };
}

token_enum!(
    /// A voter's support bucket.
    VoterStance {
        Confirmed = "confirmed",
        Likely = "likely",
        Swing = "swing",
        Opposition = "opposition",
        Unknown = "unknown",
    } default Unknown
);

token_enum!(
    /// A household's surveyed sentiment bucket.
    HouseholdSentiment {
        Favorable = "favorable",
        Dicey = "dicey",
        Unfavorable = "unfavorable",
        Unknown = "unknown",
    } default Unknown
);

token_enum!(
    /// Likelihood a voter shows up on polling day. Unset defaults to `Low`.
    TurnoutPropensity {
        High = "high",
        Medium = "medium",
        Low = "low",
    } default Low
);

token_enum!(
    /// A local influencer's declared leaning.
    InfluencerStance {
        Favorable = "favorable",
        Neutral = "neutral",
        Opposed = "opposed",
        Unknown = "unknown",
    } default Unknown
);

// ---------- Entity records ----------

/// Neighborhood/ward subdivision: the unit of geographic rollup.
/// Immutable identity; household membership is by reference, not containment.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mohalla {
    pub id: MohallaId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ward: Option<String>,
}

/// A family unit surveyed at one address, grouping voters.
/// `surveyed` stays false until a human records at least one visit.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Household {
    pub id: HouseholdId,
    pub mohalla: MohallaId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub surveyed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sentiment: HouseholdSentiment,
    /// Epoch seconds of the most recent survey visit, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_surveyed_at: Option<u64>,
}

/// One voter attached to a household.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnhancedVoter {
    pub id: VoterId,
    pub household: HouseholdId,
    /// False for absentee voters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub present: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stance: VoterStance,
    #[cfg_attr(feature = "serde", serde(default))]
    pub turnout: TurnoutPropensity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tagged_by_influencer: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub transport_needed: bool,
    /// Migrated / out-of-constituency.
    #[cfg_attr(feature = "serde", serde(default))]
    pub away: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Influencer {
    pub id: InfluencerId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stance: InfluencerStance,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_be_influenced: bool,
}

// ---------- Input boundary ----------

/// Read-only view of the four raw collections handed to the engine.
///
/// The engine borrows this for the duration of one computation and returns
/// newly-allocated output values with no back-references. Empty collections
/// and dangling references are tolerated (reported, not rejected).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    #[cfg_attr(feature = "serde", serde(default))]
    pub mohallas: BTreeMap<MohallaId, Mohalla>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub households: BTreeMap<HouseholdId, Household>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub voters: BTreeMap<VoterId, EnhancedVoter>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub influencers: BTreeMap<InfluencerId, Influencer>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.mohallas.is_empty()
            && self.households.is_empty()
            && self.voters.is_empty()
            && self.influencers.is_empty()
    }
}
