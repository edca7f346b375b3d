//! Stable ordering helpers for ranked output.
//!
//! Rankings sort by score descending with ties broken by identifier
//! ascending, so re-running on unchanged data reproduces an identical
//! ordered sequence.

use core::cmp::Ordering;

/// Compare `(score, id)` pairs: score descending, then id ascending.
pub fn cmp_score_desc_then_id<K: Ord>(a: (i64, &K), b: (i64, &K)) -> Ordering {
    match b.0.cmp(&a.0) {
        Ordering::Equal => a.1.cmp(b.1),
        o => o,
    }
}

/// Sort a ranked slice in place by `(score desc, id asc)` and truncate to `n`.
pub fn rank_top_n<T, K: Ord>(items: &mut Vec<T>, n: usize, key: impl Fn(&T) -> (i64, K)) {
    items.sort_by(|a, b| {
        let (sa, ka) = key(a);
        let (sb, kb) = key(b);
        cmp_score_desc_then_id((sa, &ka), (sb, &kb))
    });
    items.truncate(n);
}
