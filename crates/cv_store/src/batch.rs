//! Bounded-batch writer.
//!
//! Chunked writes against an external store must respect the store's
//! transactional-batch ceiling and be issued in order. Seed and clear use
//! this one helper identically, decoupled from any particular store API.

/// Issue `records` to `sink` in order, in chunks no larger than
/// `max_batch_size`. Returns the number of batches issued. A ceiling of 0 is
/// treated as 1 so the writer always makes progress.
pub fn write_in_chunks<T, E>(
    records: &[T],
    max_batch_size: usize,
    mut sink: impl FnMut(&[T]) -> Result<(), E>,
) -> Result<usize, E> {
    let ceiling = max_batch_size.max(1);
    let mut batches = 0usize;
    for chunk in records.chunks(ceiling) {
        sink(chunk)?;
        batches += 1;
    }
    Ok(batches)
}
