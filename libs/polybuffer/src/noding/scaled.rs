//! Scale-adapting wrapper around a unit-grid noder.
//!
//! Coordinates are multiplied by the scale factor before delegating to the
//! inner noder and divided back afterwards. Pairing this wrapper with a
//! unit-grid snap-rounding noder yields snap rounding at an arbitrary grid
//! resolution while the inner noder only ever sees integer-sized cells.

use super::{Noder, SegmentString};
use crate::error::{BufferError, BufferResult};
use crate::geom::Vec2;

/// Noder wrapper rescaling coordinates around an inner noder.
///
/// ## Example
///
/// ```rust
/// use polybuffer::noding::{Noder, ScaledNoder, SegmentString, SnapRoundingNoder};
/// use polybuffer::Vec2;
///
/// let noder = ScaledNoder::new(Box::new(SnapRoundingNoder::unit()), 100.0).unwrap();
/// let input = vec![
///     SegmentString::new(vec![Vec2::new(0.0, 0.0), Vec2::new(0.04, 0.04)]).unwrap(),
///     SegmentString::new(vec![Vec2::new(0.0, 0.04), Vec2::new(0.04, 0.0)]).unwrap(),
/// ];
/// let noded = noder.node(&input).unwrap();
/// assert_eq!(noded.len(), 4);
/// ```
pub struct ScaledNoder {
    inner: Box<dyn Noder>,
    scale: f64,
}

impl ScaledNoder {
    /// Creates a scaled noder with the given scale factor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `scale` is positive and finite.
    pub fn new(inner: Box<dyn Noder>, scale: f64) -> BufferResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(BufferError::invalid_argument(format!(
                "noder scale must be positive and finite: {scale}"
            )));
        }
        Ok(Self { inner, scale })
    }

    fn rescale(&self, input: &[SegmentString], factor: f64) -> Vec<SegmentString> {
        input
            .iter()
            .filter_map(|string| {
                let coords: Vec<Vec2> = string.coords().iter().map(|&p| p * factor).collect();
                SegmentString::new(coords).ok()
            })
            .collect()
    }
}

impl std::fmt::Debug for ScaledNoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaledNoder")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl Noder for ScaledNoder {
    fn node(&self, input: &[SegmentString]) -> BufferResult<Vec<SegmentString>> {
        let scaled_up = self.rescale(input, self.scale);
        let noded = self.inner.node(&scaled_up)?;
        Ok(self.rescale(&noded, 1.0 / self.scale))
    }
}
