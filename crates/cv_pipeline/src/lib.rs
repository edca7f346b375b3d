//! cv_pipeline — metrics assembly (rollup → project/risk → rank → fold).
//!
//! This crate stays I/O-free and delegates math to `cv_algo`. The single
//! public entry point is [`assemble`]; collaborators never call the stages
//! directly. Output is one immutable [`DashboardMetrics`] value, recomputed
//! fresh on every invocation, with no back-references into the source
//! collections and no hidden cache ([`MetricsCache`] is the explicit one).

#![forbid(unsafe_code)]

pub mod assemble;
pub mod cache;

pub use assemble::{
    assemble, DashboardMetrics, FamilyMetrics, MohallaMetrics, RiskAlertOut, SwingMohalla,
};
pub use cache::MetricsCache;
