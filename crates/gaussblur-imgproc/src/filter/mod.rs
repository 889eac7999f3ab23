//! Filter operations
//!
//! This module provides the building blocks of the separable gaussian filter.

/// Boundary handling
pub mod border;

/// Filter kernels
pub mod kernels;

/// Separable filter passes
mod separable_filter;
pub use separable_filter::*;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The sigma of the gaussian kernel is not a positive finite number.
    #[error("Sigma must be a positive finite number, got {0}")]
    InvalidSigma(f32),

    /// The kernel must have an odd, non-zero number of taps.
    #[error("Kernel size must be odd and non-zero, got {0}")]
    InvalidKernelSize(usize),
}
