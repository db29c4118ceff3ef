//! # Precision Model
//!
//! Maps real coordinates onto a representable grid.
//!
//! A floating model imposes no snapping; a fixed model snaps every
//! coordinate to multiples of `1 / scale`. The scale factor is the
//! reciprocal of the smallest representable grid unit, so larger scales
//! preserve more significant digits.

#[cfg(test)]
mod tests;

use crate::error::{BufferError, BufferResult};
use crate::geom::Vec2;

/// Rule mapping real coordinates onto a representable grid.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{PrecisionModel, Vec2};
///
/// let grid = PrecisionModel::fixed(10.0).unwrap();
/// let snapped = grid.make_precise(Vec2::new(0.123, 0.456));
/// assert_eq!(snapped, Vec2::new(0.1, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full floating-point precision; coordinates are not snapped.
    #[default]
    Floating,
    /// Fixed grid with the given scale factor.
    Fixed {
        /// Reciprocal of the grid cell size; always positive and finite.
        scale: f64,
    },
}

impl PrecisionModel {
    /// The floating (unsnapped) model.
    #[must_use]
    pub fn floating() -> Self {
        Self::Floating
    }

    /// A fixed-grid model snapping to multiples of `1 / scale`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `scale` is positive and finite.
    pub fn fixed(scale: f64) -> BufferResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(BufferError::invalid_argument(format!(
                "precision scale must be positive and finite: {scale}"
            )));
        }
        Ok(Self::Fixed { scale })
    }

    /// Returns true for the floating model.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    /// Scale factor of a fixed model; `None` when floating.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self {
            Self::Floating => None,
            Self::Fixed { scale } => Some(*scale),
        }
    }

    /// Grid cell size of a fixed model; `None` when floating.
    #[must_use]
    pub fn grid_size(&self) -> Option<f64> {
        self.scale().map(|s| 1.0 / s)
    }

    /// Snaps a coordinate onto the grid. Identity for the floating model.
    #[must_use]
    pub fn make_precise(&self, p: Vec2) -> Vec2 {
        match self {
            Self::Floating => p,
            Self::Fixed { scale } => Vec2::new(
                (p.x * scale).round() / scale,
                (p.y * scale).round() / scale,
            ),
        }
    }
}
