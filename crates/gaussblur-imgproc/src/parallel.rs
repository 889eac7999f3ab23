use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0")]
    InvalidRowStride(usize),

    /// The row ranges do not tile the buffer.
    #[error("row ranges must be contiguous from row 0 and fit the buffer of {0} rows")]
    InvalidRowRanges(usize),
}

/// A half-open interval `[start, end)` of image rows assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowRange {
    /// First row of the range.
    pub start: usize,
    /// One past the last row of the range.
    pub end: usize,
}

impl RowRange {
    /// Create a new row range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the row `y` belongs to the range.
    pub fn contains(&self, y: usize) -> bool {
        self.start <= y && y < self.end
    }
}

impl std::fmt::Display for RowRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Divide the rows of an image into contiguous ranges, one per worker.
///
/// Every worker gets `height / num_threads` rows and the last worker also takes the
/// remainder, so the split is not balanced when `height` is not a multiple of
/// `num_threads`. With more workers than rows all but the last range are empty.
///
/// # Arguments
///
/// * `height` - The number of rows of the image.
/// * `num_threads` - The number of workers.
///
/// # Errors
///
/// Returns [`ParallelError::InvalidThreadCount`] if `num_threads` is zero.
///
/// # Examples
///
/// ```
/// use gaussblur_imgproc::parallel::{partition_rows, RowRange};
///
/// let ranges = partition_rows(10, 3).unwrap();
/// assert_eq!(
///     ranges,
///     vec![RowRange::new(0, 3), RowRange::new(3, 6), RowRange::new(6, 10)]
/// );
/// ```
pub fn partition_rows(height: usize, num_threads: usize) -> Result<Vec<RowRange>, ParallelError> {
    if num_threads == 0 {
        return Err(ParallelError::InvalidThreadCount(num_threads));
    }

    let rows_per_thread = height / num_threads;

    let ranges = (0..num_threads)
        .map(|t| {
            let start = t * rows_per_thread;
            let end = if t == num_threads - 1 {
                height
            } else {
                start + rows_per_thread
            };
            RowRange::new(start, end)
        })
        .collect();

    Ok(ranges)
}

/// Split a row-major buffer into the disjoint mutable row slices given by `ranges`.
///
/// Each returned slice is exclusively owned by one worker, which is what lets the workers of
/// a phase write the shared buffer without locking.
///
/// # Arguments
///
/// * `buf` - The buffer to split.
/// * `row_stride` - The number of values in one row.
/// * `ranges` - Contiguous ranges starting at row 0, as produced by [`partition_rows`].
///
/// # Errors
///
/// Returns an error if the stride is zero or the ranges are not contiguous from row 0 or do
/// not fit inside the buffer.
pub fn split_rows_mut<'a, T>(
    buf: &'a mut [T],
    row_stride: usize,
    ranges: &[RowRange],
) -> Result<Vec<&'a mut [T]>, ParallelError> {
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    let num_rows = buf.len() / row_stride;
    let mut slices = Vec::with_capacity(ranges.len());
    let mut rest = buf;
    let mut next_row = 0;

    for range in ranges {
        if range.start != next_row || range.end < range.start || range.end > num_rows {
            return Err(ParallelError::InvalidRowRanges(num_rows));
        }
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * row_stride);
        slices.push(head);
        rest = tail;
        next_row = range.end;
    }

    Ok(slices)
}

/// Build a local thread pool with exactly `num_threads` threads.
///
/// # Errors
///
/// Returns an error if `num_threads` is zero or the pool cannot be spawned.
pub fn fixed_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool, ParallelError> {
    if num_threads == 0 {
        return Err(ParallelError::InvalidThreadCount(num_threads));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("gaussblur-worker-{i}"))
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))
}
