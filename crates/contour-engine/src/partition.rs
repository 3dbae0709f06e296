//! Static row partitioning across workers.
//!
//! Every phase splits its row range with the same formula, so worker `t`
//! always owns the `t`-th contiguous slice of whatever it is processing.

use std::ops::Range;

/// Rows owned by `worker` out of `workers` when splitting `total` rows.
///
/// `start = floor(t * R / N)`, `end = min(floor((t + 1) * R / N), R)`.
/// The ranges for `t in 0..N` tile `0..R` with no gaps or overlaps; when
/// `R < N` some workers receive an empty range.
#[inline]
pub fn partition(worker: usize, workers: usize, total: usize) -> Range<usize> {
    debug_assert!(workers > 0 && worker < workers);
    let start = worker * total / workers;
    let end = ((worker + 1) * total / workers).min(total);
    start..end
}

/// All partitions of `total` rows, in worker order.
pub fn partitions(workers: usize, total: usize) -> impl Iterator<Item = Range<usize>> {
    (0..workers).map(move |t| partition(t, workers, total))
}
