use gaussblur_image::{ImageError, ImageSize};

use crate::{filter::FilterError, parallel::ParallelError};

/// An error type for the blur operations.
///
/// The input validation errors are raised before any worker is spawned.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BlurError {
    /// The sigma is not a positive finite number.
    #[error("Sigma must be a positive finite number, got {0}")]
    InvalidSigma(f32),

    /// The number of worker threads is zero.
    #[error("Thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The image has no pixels.
    #[error("Cannot blur an empty image: {0}")]
    EmptyImage(ImageSize),

    /// Error while building the kernel.
    #[error("Filter error. {0}")]
    Filter(#[from] FilterError),

    /// Error while partitioning the work or creating the worker pool.
    #[error("Parallel execution error. {0}")]
    Parallel(#[from] ParallelError),

    /// Error with the image buffers.
    #[error("Image error. {0}")]
    Image(#[from] ImageError),

    /// The background blur task ended without delivering a result.
    #[error("The blur task ended without delivering a result")]
    TaskDisconnected,
}
