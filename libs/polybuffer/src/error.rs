//! # Error Types
//!
//! Error types for buffer operations. All errors are explicit and provide
//! clear debugging information.
//!
//! ## Error Policy
//!
//! - Robustness failures are attempt-local and may be retried at coarser
//!   precision by the orchestrator; they never escape to the caller directly
//! - Every other failure is terminal and propagates immediately
//! - No partial or degenerate geometry is ever returned in place of an error

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during buffer computation.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{buffer, BufferError, Geometry, Vec2};
///
/// let point = Geometry::point(Vec2::new(0.0, 0.0));
/// match buffer(&point, f64::NAN) {
///     Ok(result) => println!("buffered: {} shells", result.polygon_count()),
///     Err(BufferError::InvalidArgument { message }) => eprintln!("bad input: {message}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum BufferError {
    /// The noded arrangement at the attempted precision was topologically
    /// inconsistent.
    ///
    /// This is the only failure kind the buffer orchestrator catches and
    /// retries at coarser precision.
    #[error("robustness failure: {message}")]
    Robustness {
        /// Description of the inconsistency
        message: String,
    },

    /// Every precision level was exhausted without producing a result.
    ///
    /// Carries the last robustness failure as its cause.
    #[error("buffer computation failed after exhausting all precision levels")]
    ComputationFailed {
        /// The robustness failure recorded at the coarsest attempted level
        #[source]
        source: Box<BufferError>,
    },

    /// Malformed geometry, non-finite distance, or invalid parameters.
    ///
    /// Never retried; propagates immediately from whichever component
    /// detects it.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the offending input
        message: String,
    },
}

impl BufferError {
    /// Creates a robustness failure.
    pub fn robustness(message: impl Into<String>) -> Self {
        Self::Robustness {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wraps the last robustness failure once the retry ladder is exhausted.
    pub fn computation_failed(last_failure: BufferError) -> Self {
        Self::ComputationFailed {
            source: Box::new(last_failure),
        }
    }

    /// Returns true if this failure may be retried at coarser precision.
    #[must_use]
    pub fn is_robustness(&self) -> bool {
        matches!(self, Self::Robustness { .. })
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for buffer operations.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{BufferResult, Geometry};
///
/// fn empty_result() -> BufferResult<Geometry> {
///     Ok(Geometry::empty_polygon())
/// }
/// ```
pub type BufferResult<T> = Result<T, BufferError>;

// =============================================================================
// TESTS
// =============================================================================
