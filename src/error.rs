//! Errors raised when input is rejected before the sweep starts.

use ordered_float::FloatIsNan;
use thiserror::Error;

/// Reasons a set of sites cannot be swept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// A coordinate was NaN.
    #[error("site coordinate is NaN")]
    NotANumber(#[from] FloatIsNan),

    /// A coordinate was positive or negative infinity.
    #[error("site coordinate is not finite: ({x}, {y})")]
    Infinite {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },

    /// The sites were not sorted by `y`, then `x`.
    #[error("sites are not in sweep order at index {index}")]
    UnsortedSites {
        /// Position of the first site that sorts before its predecessor.
        index: usize,
    },
}
