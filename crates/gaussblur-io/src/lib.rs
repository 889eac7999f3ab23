#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image reading and writing functions.
///
/// Images are always exchanged as 8-bit RGBA, see [`functional::read_image_rgba8`].
pub mod functional;

pub use crate::error::IoError;
