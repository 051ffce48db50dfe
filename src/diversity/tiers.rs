//! Diversity-level step functions.
//!
//! The thresholds are tuned by hand and must stay exactly as they are; clients depend
//! on the resulting behavior.

use std::ops::Range;

/// Size of the posterior candidate pool drawn before filtering.
pub const CANDIDATE_POOL_SIZE: usize = 200;

/// Head of the pool sampled when the level window comes out empty.
pub const FALLBACK_WINDOW: usize = 50;

/// How many nearest neighbours of the seed are removed from the pool.
pub fn similarity_limit(level: u32) -> usize {
    match level {
        0..=4 => 5,
        5..=6 => 3,
        _ => 2,
    }
}

/// Unclamped `[start, end)` bounds of the sampling window.
pub fn window_bounds(level: u32) -> (usize, usize) {
    match level {
        0..=2 => (10, 45),
        3..=4 => (20, 65),
        _ => (30, 90),
    }
}

/// Sampling window over a filtered pool of `pool_len` items.
///
/// Bounds are clamped to the pool (`start = min(lo, len - 1)`, `end = min(hi, len)`).
/// An empty window falls back to the first `min(50, len)` entries.
pub fn sampling_window(level: u32, pool_len: usize) -> Range<usize> {
    let (lo, hi) = window_bounds(level);
    let start = lo.min(pool_len.saturating_sub(1));
    let end = hi.min(pool_len);

    if end > start {
        start..end
    } else {
        0..FALLBACK_WINDOW.min(pool_len)
    }
}
