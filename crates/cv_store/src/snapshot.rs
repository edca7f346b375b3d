//! Snapshot file I/O with content digests.
//!
//! Snapshots are plain JSON documents of the four collections. The SHA-256
//! digest of the raw bytes is computed on both load and save and echoed
//! downstream (the CLI reports it), so two operators can cheaply confirm
//! they are looking at the same input data.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use cv_core::entities::Snapshot;

use crate::{StoreError, StoreResult};

/// SHA-256 of `bytes`, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Read a snapshot file. Returns the parsed collections and the digest of
/// the file bytes.
pub fn load_snapshot(path: &Path) -> StoreResult<(Snapshot, String)> {
    let bytes = fs::read(path)
        .map_err(|e| StoreError::Path(format!("{}: {e}", path.display())))?;
    let digest = sha256_hex(&bytes);
    let snap: Snapshot = serde_json::from_slice(&bytes)?;
    Ok((snap, digest))
}

/// Write a snapshot file (pretty JSON, trailing newline). Returns the digest
/// of the written bytes.
pub fn save_snapshot(path: &Path, snap: &Snapshot) -> StoreResult<String> {
    let mut bytes = serde_json::to_vec_pretty(snap)?;
    bytes.push(b'\n');
    fs::write(path, &bytes)
        .map_err(|e| StoreError::Path(format!("{}: {e}", path.display())))?;
    Ok(sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_hex() {
        let d = sha256_hex(b"canvass");
        assert_eq!(d.len(), 64);
        assert_eq!(d, sha256_hex(b"canvass"));
        assert_ne!(d, sha256_hex(b"canvas"));
        assert!(d.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join("cv_store_snapshot_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snap.json");

        let snap = Snapshot::default();
        let saved_digest = save_snapshot(&path, &snap).unwrap();
        let (loaded, loaded_digest) = load_snapshot(&path).unwrap();
        assert_eq!(loaded, snap);
        assert_eq!(saved_digest, loaded_digest);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_path_error() {
        let out = load_snapshot(Path::new("/nonexistent/cv-snap.json"));
        assert!(matches!(out, Err(StoreError::Path(_))));
    }
}
