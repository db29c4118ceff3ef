//! Snap-rounding noder on a fixed coordinate grid.
//!
//! Every input vertex and every constructed intersection point is snapped
//! onto the grid of the supplied precision model. Splitting and snapping are
//! iterated because snapping a vertex can create a new crossing; on a grid
//! the process settles after a few rounds.

use super::{emit_split_segments, flatten, split_points, Noder, SegmentString};
use crate::error::BufferResult;
use crate::geom::Vec2;
use crate::precision::PrecisionModel;

/// Upper bound on split-and-snap rounds per noding call.
const MAX_SNAP_PASSES: usize = 6;

/// Noder that snaps all vertices onto a fixed grid while splitting.
///
/// ## Example
///
/// ```rust
/// use polybuffer::noding::{Noder, SegmentString, SnapRoundingNoder};
/// use polybuffer::{PrecisionModel, Vec2};
///
/// let noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0).unwrap());
/// let input = vec![
///     SegmentString::new(vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0)]).unwrap(),
///     SegmentString::new(vec![Vec2::new(0.0, 4.0), Vec2::new(4.0, 0.0)]).unwrap(),
/// ];
/// let noded = noder.node(&input).unwrap();
/// assert_eq!(noded.len(), 4);
/// ```
#[derive(Debug)]
pub struct SnapRoundingNoder {
    model: PrecisionModel,
}

impl SnapRoundingNoder {
    /// Creates a snap-rounding noder for the given precision model.
    #[must_use]
    pub fn new(model: PrecisionModel) -> Self {
        Self { model }
    }

    /// Snap-rounding on the unit grid (scale factor 1).
    ///
    /// This is the inner noder the scale-adapting wrapper delegates to.
    #[must_use]
    pub fn unit() -> Self {
        Self {
            model: PrecisionModel::Fixed { scale: 1.0 },
        }
    }

    fn snap_strings(&self, input: &[SegmentString]) -> Vec<SegmentString> {
        let mut snapped = Vec::with_capacity(input.len());
        for string in input {
            let mut coords: Vec<Vec2> = Vec::with_capacity(string.coords().len());
            for &p in string.coords() {
                let q = self.model.make_precise(p);
                if coords.last() != Some(&q) {
                    coords.push(q);
                }
            }
            if coords.len() >= 2 {
                if let Ok(string) = SegmentString::new(coords) {
                    snapped.push(string);
                }
            }
        }
        snapped
    }
}

impl Noder for SnapRoundingNoder {
    fn node(&self, input: &[SegmentString]) -> BufferResult<Vec<SegmentString>> {
        let mut current = self.snap_strings(input);
        for pass in 0..MAX_SNAP_PASSES {
            let segments = flatten(&current);
            let snap = |p: Vec2| self.model.make_precise(p);
            let splits = split_points(&segments, Some(&snap));
            let produced_splits = splits.iter().any(|s| !s.is_empty());
            let emitted = emit_split_segments(&segments, &splits);
            current = self.snap_strings(&emitted);
            if !produced_splits {
                break;
            }
            tracing::trace!(pass, segments = current.len(), "snap-rounding pass produced splits");
        }
        Ok(current)
    }
}
