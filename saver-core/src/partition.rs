use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PartitionError {
    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

/// Split the index space `0..n` into `workers` contiguous, disjoint ranges
/// that together cover every index exactly once.
///
/// The remainder `n % workers` is spread over the leading ranges, one extra
/// index each, so range lengths differ by at most one. Ranges may be empty
/// when `n < workers`.
pub fn partition(n: usize, workers: usize) -> Result<Vec<Range<usize>>, PartitionError> {
    if workers == 0 {
        return Err(PartitionError::ZeroWorkers);
    }

    let base = n / workers;
    let extra = n % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = base + usize::from(i < extra);
        ranges.push(start..start + len);
        start += len;
    }
    Ok(ranges)
}
