//! CLASSIFY stage: bucket assignment for voters, households, and influencers.
//!
//! Total, stateless, O(1) lookups, never a validator. Unmapped or malformed
//! enum tokens were already folded into the `Unknown`/default buckets at the
//! deserialization boundary, so these functions cannot fail and cannot reject
//! a record. They exist as the single seam where classification policy would
//! change.

use cv_core::entities::{EnhancedVoter, Household, HouseholdSentiment, Influencer, InfluencerStance, VoterStance};

/// Stance bucket for one voter.
#[inline]
pub fn classify_voter(v: &EnhancedVoter) -> VoterStance {
    v.stance
}

/// Sentiment bucket for one household.
#[inline]
pub fn classify_household(h: &Household) -> HouseholdSentiment {
    h.sentiment
}

/// A voter counts toward present-voter denominators iff recorded present and
/// not migrated out of the constituency.
#[inline]
pub fn is_present(v: &EnhancedVoter) -> bool {
    v.present && !v.away
}

/// Committed support: Confirmed or Likely.
#[inline]
pub fn is_committed(s: VoterStance) -> bool {
    matches!(s, VoterStance::Confirmed | VoterStance::Likely)
}

/// An influencer still worth courting: open to influence and not yet leaning
/// either way.
#[inline]
pub fn is_unconverted(i: &Influencer) -> bool {
    i.can_be_influenced && matches!(i.stance, InfluencerStance::Neutral | InfluencerStance::Unknown)
}
