//! Batch partition arithmetic.
//!
//! A run of `total` jobs with concurrency `batch_size` is split into
//! `ceil(total / batch_size)` consecutive groups; group `k` covers indices
//! `[k * batch_size, min((k + 1) * batch_size, total))`. The last group may be
//! smaller than `batch_size`.

/// Number of batches needed for `total` items at `batch_size` items per batch.
/// `batch_size` must be at least 1; zero items means zero batches.
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    debug_assert!(batch_size >= 1, "batch_size must be positive");
    total.div_ceil(batch_size)
}

/// Half-open index range `[start, end)` covered by batch `k` (0-indexed).
/// For `k >= batch_count(total, batch_size)` the range is empty.
pub fn batch_range(k: usize, batch_size: usize, total: usize) -> (usize, usize) {
    debug_assert!(batch_size >= 1, "batch_size must be positive");
    let start = k.saturating_mul(batch_size).min(total);
    let end = start.saturating_add(batch_size).min(total);
    (start, end)
}
