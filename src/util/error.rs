//! Error types for alphagamma.

use thiserror::Error;

/// Result alias for alphagamma operations.
pub type AlphaGammaResult<T> = std::result::Result<T, AlphaGammaError>;

/// Errors that can occur when computing descriptor distances.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AlphaGammaError {
    /// The circle/ray configuration does not describe a valid descriptor.
    #[error("invalid descriptor layout: num_circles={num_circles}, num_rays={num_rays}")]
    InvalidLayout { num_circles: i64, num_rays: i64 },
    /// A descriptor row count matches neither the base nor the extended size.
    #[error("invalid descriptor size {got}: expected {base} (base) or {extended} (extended)")]
    DescriptorSizeMismatch {
        got: usize,
        base: usize,
        extended: usize,
    },
    /// Two descriptors or collections that must agree in length do not.
    #[error("descriptor length mismatch: {left} vs {right}")]
    DescriptorLengthMismatch { left: usize, right: usize },
    /// Backing buffer is shorter than the requested shape.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A shape is degenerate or overflows.
    #[error("invalid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    /// A bit range extends past the end of the descriptor buffer.
    #[error("bit range [{offset}, {offset}+{len}) exceeds {available} available bits")]
    BitRangeOutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },
    /// Field weights are negative or not finite.
    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: &'static str },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The requested mode is not available in this build.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}
