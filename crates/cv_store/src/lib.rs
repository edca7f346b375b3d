//! cv_store — the entity-store collaborator behind the write boundary.
//!
//! The analytics engine has no dependency on this crate and cannot fail
//! through it; everything stateful (seeding, clearing, snapshot files) lives
//! here. User-visible failures are structured results, never panics.
//!
//! - Shared error type (`StoreError`) with `From` conversions used across modules.
//! - `EntityStore`: the write boundary seed/clear are coded against.
//! - `write_in_chunks`: bounded-batch writer shared by seed and clear.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for cv_store (used by memory/batch/seed/snapshot).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// A chunked write/delete failed mid-way.
    #[error("batch error: {0}")]
    Batch(String),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; default to root. Callers may
        // enrich this at higher layers.
        StoreError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

/* ---------------- Public modules (single source of truth) ---------------- */

pub mod batch;
pub mod demo;
pub mod memory;
pub mod seed;
pub mod snapshot;

pub use batch::write_in_chunks;
pub use memory::{EntityStore, InMemoryStore};
pub use seed::{clear, seed_all, SeedOutcome, DEMO_PREFIX};
