#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// gaussian blur orchestration module.
pub mod blur;

/// Error types for the blur operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallelization utilities.
pub mod parallel;

/// background execution of blur requests.
pub mod task;

pub use crate::blur::{
    gaussian_blur, gaussian_blur_rgba, BlurConfig, BlurOutput, TimingRecord, WorkerTiming,
};
pub use crate::error::BlurError;
