//! cv_core — Core types, entity records, tunable parameters, and rounding.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`cv_algo`, `cv_pipeline`, `cv_store`, `cv_cli`).
//!
//! - Registry tokens: `MohallaId`, `HouseholdId`, `VoterId`, `InfluencerId`
//! - Entity records and closed stance/sentiment/turnout enums
//! - `Params`: every operator-tunable threshold, weight, and window
//! - Integer-first percent helpers with guarded denominators
//! - Deterministic ordering helpers for ranked output
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod determinism;
pub mod entities;
pub mod errors;
pub mod ids;
pub mod rounding;
pub mod variables;

pub use entities::{
    EnhancedVoter, Household, HouseholdSentiment, Influencer, InfluencerStance, Mohalla, Snapshot,
    TurnoutPropensity, VoterStance,
};
pub use errors::CoreError;
pub use ids::{HouseholdId, InfluencerId, MohallaId, VoterId};
pub use variables::{Params, Pct, VarsError};
