//! # Noding Module
//!
//! Resolves sets of line segments into consistent, non-crossing arrangements
//! by inserting intersection vertices.
//!
//! ## Structure
//!
//! - [`SegmentString`]: owned polyline used as noder input and output
//! - [`Noder`]: the noding strategy seam
//! - [`SimpleNoder`]: non-snapping pairwise noder for the fast path
//! - `snap_round`: fixed-grid snap-rounding noder
//! - `scaled`: scale-adapting wrapper around a unit-grid noder
//!
//! ## Contract
//!
//! A fully noded output contains no pair of segments crossing in their
//! interiors and no endpoint inside another segment's interior. The simple
//! noder cannot always achieve this in floating point; the buffer builder
//! validates the output and reports a robustness failure when it falls
//! short, which the orchestrator answers by retrying on a snapped grid.

pub mod scaled;
pub mod snap_round;

#[cfg(test)]
mod tests;

pub use scaled::ScaledNoder;
pub use snap_round::SnapRoundingNoder;

use crate::error::{BufferError, BufferResult};
use crate::geom::predicates::{
    intersection_point, point_in_segment_interior, properly_intersect,
};
use crate::geom::Vec2;

// =============================================================================
// SEGMENT STRINGS
// =============================================================================

/// An owned polyline of at least two vertices.
///
/// ## Example
///
/// ```rust
/// use polybuffer::noding::SegmentString;
/// use polybuffer::Vec2;
///
/// let string = SegmentString::new(vec![
///     Vec2::new(0.0, 0.0),
///     Vec2::new(1.0, 0.0),
///     Vec2::new(1.0, 1.0),
/// ]).unwrap();
/// assert_eq!(string.segments().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString {
    coords: Vec<Vec2>,
}

impl SegmentString {
    /// Creates a segment string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for fewer than two vertices.
    pub fn new(coords: Vec<Vec2>) -> BufferResult<Self> {
        if coords.len() < 2 {
            return Err(BufferError::invalid_argument(
                "segment string requires at least 2 vertices",
            ));
        }
        Ok(Self { coords })
    }

    /// The vertices of the polyline.
    #[must_use]
    pub fn coords(&self) -> &[Vec2] {
        &self.coords
    }

    /// Iterates the consecutive segments of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.coords.windows(2).map(|w| (w[0], w[1]))
    }
}

// =============================================================================
// NODER SEAM
// =============================================================================

/// A noding strategy: resolves segment intersections by splitting segments
/// at intersection vertices.
pub trait Noder {
    /// Nodes the input, returning split segment strings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the input is structurally invalid.
    fn node(&self, input: &[SegmentString]) -> BufferResult<Vec<SegmentString>>;
}

// =============================================================================
// SIMPLE NODER
// =============================================================================

/// Non-snapping pairwise noder.
///
/// Splits segments at floating-point intersection constructions without any
/// grid snapping. Fast and exact-precision friendly, but near-degenerate
/// crossings can survive splitting; downstream validation catches those.
#[derive(Debug, Default)]
pub struct SimpleNoder;

impl SimpleNoder {
    /// Creates the simple noder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Noder for SimpleNoder {
    fn node(&self, input: &[SegmentString]) -> BufferResult<Vec<SegmentString>> {
        let segments = flatten(input);
        let splits = split_points(&segments, None);
        Ok(emit_split_segments(&segments, &splits))
    }
}

// =============================================================================
// SHARED SPLITTING MACHINERY
// =============================================================================

/// Flattens segment strings into a list of individual segments.
pub(crate) fn flatten(input: &[SegmentString]) -> Vec<(Vec2, Vec2)> {
    input
        .iter()
        .flat_map(SegmentString::segments)
        .filter(|(a, b)| a != b)
        .collect()
}

/// Computes, per segment, the interior points where it must be split.
///
/// Each pairwise intersection is constructed exactly once and shared by both
/// participating segments so the split vertices coincide bitwise. When a
/// `snap` function is supplied, constructed points are passed through it.
pub(crate) fn split_points(
    segments: &[(Vec2, Vec2)],
    snap: Option<&dyn Fn(Vec2) -> Vec2>,
) -> Vec<Vec<Vec2>> {
    let mut splits: Vec<Vec<Vec2>> = vec![Vec::new(); segments.len()];
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let (a1, a2) = segments[i];
            let (b1, b2) = segments[j];
            if properly_intersect(a1, a2, b1, b2) {
                if let Some(p) = intersection_point(a1, a2, b1, b2) {
                    let p = snap.map_or(p, |f| f(p));
                    splits[i].push(p);
                    splits[j].push(p);
                }
            } else {
                for p in [b1, b2] {
                    if point_in_segment_interior(p, a1, a2) {
                        splits[i].push(p);
                    }
                }
                for p in [a1, a2] {
                    if point_in_segment_interior(p, b1, b2) {
                        splits[j].push(p);
                    }
                }
            }
        }
    }
    splits
}

/// Rebuilds two-point segment strings from segments and their split points.
pub(crate) fn emit_split_segments(
    segments: &[(Vec2, Vec2)],
    splits: &[Vec<Vec2>],
) -> Vec<SegmentString> {
    let mut out = Vec::new();
    for (idx, (a, b)) in segments.iter().enumerate() {
        let mut chain = Vec::with_capacity(splits[idx].len() + 2);
        chain.push(*a);
        chain.extend(ordered_along(*a, *b, &splits[idx]));
        chain.push(*b);
        for w in chain.windows(2) {
            if w[0] != w[1] {
                out.push(SegmentString { coords: vec![w[0], w[1]] });
            }
        }
    }
    out
}

/// Orders split points along the segment from `a` to `b`, removing
/// duplicates.
fn ordered_along(a: Vec2, b: Vec2, points: &[Vec2]) -> Vec<Vec2> {
    let dir = b - a;
    let mut keyed: Vec<(f64, Vec2)> = points.iter().map(|p| (dir.dot(*p - a), *p)).collect();
    keyed.sort_by(|(s, _), (t, _)| s.total_cmp(t));
    let mut ordered: Vec<Vec2> = Vec::with_capacity(keyed.len());
    for (_, p) in keyed {
        if ordered.last() != Some(&p) {
            ordered.push(p);
        }
    }
    ordered
}
