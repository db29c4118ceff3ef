//! Buffer construction for a single precision attempt.
//!
//! Pipeline: raw offset curves → noding → arrangement validation → winding
//! classification → boundary ring stitching → shell/hole assembly. Every
//! topological inconsistency surfaces as a robustness failure so the
//! orchestrator can retry the whole attempt on a coarser grid.

use std::collections::{HashMap, HashSet};

use crate::buffer::curve::OffsetCurveBuilder;
use crate::buffer::params::BufferParameters;
use crate::error::{BufferError, BufferResult};
use crate::geom::predicates::{
    point_in_segment_interior, properly_intersect, winding_number,
};
use crate::geom::{signed_area, Geometry, LinearRing, Polygon, Vec2};
use crate::noding::{Noder, SegmentString, SimpleNoder};
use crate::precision::PrecisionModel;

/// Relative sideways displacement of the winding probe points.
const PROBE_OFFSET_FACTOR: f64 = 1.0e-6;

/// Absolute probe displacement floor, scaled by coordinate magnitude.
const PROBE_OFFSET_FLOOR: f64 = 1.0e-12;

/// Computes the buffer of a geometry at a signed distance for one attempt.
///
/// The builder runs at the input geometry's own precision by default; the
/// orchestrator overrides the working precision model and the noding
/// strategy for fixed-grid attempts.
///
/// ## Example
///
/// ```rust
/// use polybuffer::buffer::BufferBuilder;
/// use polybuffer::{BufferParameters, Geometry, Vec2};
///
/// let builder = BufferBuilder::new(BufferParameters::default());
/// let result = builder.buffer(&Geometry::point(Vec2::ZERO), 1.0).unwrap();
/// assert_eq!(result.polygon_count(), 1);
/// ```
pub struct BufferBuilder {
    params: BufferParameters,
    working_precision: Option<PrecisionModel>,
    noder: Option<Box<dyn Noder>>,
}

impl BufferBuilder {
    /// Creates a builder with default (native-precision) behavior.
    #[must_use]
    pub fn new(params: BufferParameters) -> Self {
        Self {
            params,
            working_precision: None,
            noder: None,
        }
    }

    /// Overrides the precision model curves are generated on.
    pub fn set_working_precision(&mut self, model: PrecisionModel) {
        self.working_precision = Some(model);
    }

    /// Overrides the noding strategy.
    pub fn set_noder(&mut self, noder: Box<dyn Noder>) {
        self.noder = Some(noder);
    }

    /// Computes the polygonal buffer.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for non-finite distances, malformed geometry, or
    ///   invalid parameters
    /// - `Robustness` when the arrangement at the working precision is
    ///   topologically inconsistent
    pub fn buffer(&self, geometry: &Geometry, distance: f64) -> BufferResult<Geometry> {
        if !distance.is_finite() {
            return Err(BufferError::invalid_argument(format!(
                "buffer distance must be finite: {distance}"
            )));
        }
        self.params.validate()?;
        geometry.validate()?;

        let native = *geometry.precision_model();
        let working = self.working_precision.unwrap_or(native);

        let curve_builder = OffsetCurveBuilder::new(&self.params, &working);
        let curves = curve_builder.curves(geometry, distance)?;
        if curves.is_empty() {
            return Ok(Geometry::empty_polygon().with_precision_model(native));
        }

        let strings = closed_strings(&curves)?;
        let default_noder;
        let noder: &dyn Noder = match &self.noder {
            Some(noder) => noder.as_ref(),
            None => {
                default_noder = SimpleNoder::new();
                &default_noder
            }
        };
        let noded = noder.node(&strings)?;
        validate_noding(&noded)?;

        let boundary = classify_boundary(&noded, &curves);
        let rings = stitch_rings(&boundary)?;
        let result = assemble(rings)?;
        Ok(result.with_precision_model(native))
    }
}

impl std::fmt::Debug for BufferBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferBuilder")
            .field("params", &self.params)
            .field("working_precision", &self.working_precision)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// NODING INPUT AND VALIDATION
// =============================================================================

/// Converts rings into explicitly closed segment strings.
fn closed_strings(curves: &[Vec<Vec2>]) -> BufferResult<Vec<SegmentString>> {
    curves
        .iter()
        .map(|curve| {
            let mut coords = curve.clone();
            coords.push(curve[0]);
            SegmentString::new(coords)
        })
        .collect()
}

/// Checks the noded arrangement for residual crossings.
///
/// A noder that could not fully resolve the linework at its precision leaves
/// either an interior crossing or an endpoint inside another segment's
/// interior; both are robustness failures to be answered at a coarser grid.
fn validate_noding(noded: &[SegmentString]) -> BufferResult<()> {
    let segments: Vec<(Vec2, Vec2)> = noded
        .iter()
        .flat_map(SegmentString::segments)
        .collect();
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let (a1, a2) = segments[i];
            let (b1, b2) = segments[j];
            if properly_intersect(a1, a2, b1, b2) {
                return Err(BufferError::robustness(
                    "noding incomplete: segments still cross after noding",
                ));
            }
            let touches_interior = [b1, b2]
                .iter()
                .any(|&p| point_in_segment_interior(p, a1, a2))
                || [a1, a2]
                    .iter()
                    .any(|&p| point_in_segment_interior(p, b1, b2));
            if touches_interior {
                return Err(BufferError::robustness(
                    "noding incomplete: endpoint lies inside another segment",
                ));
            }
        }
    }
    Ok(())
}

// =============================================================================
// WINDING CLASSIFICATION
// =============================================================================

/// A directed boundary edge with the buffer interior on its left.
#[derive(Debug, Clone, Copy)]
struct BoundaryEdge {
    start: Vec2,
    end: Vec2,
}

/// Hashable exact-coordinate key; negative zero is normalized away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct CoordKey(u64, u64);

fn key(p: Vec2) -> CoordKey {
    let x = if p.x == 0.0 { 0.0 } else { p.x };
    let y = if p.y == 0.0 { 0.0 } else { p.y };
    CoordKey(x.to_bits(), y.to_bits())
}

/// Extracts the directed boundary edges of the positive-winding region.
///
/// Each noded edge is probed slightly to each side; edges with positive
/// winding on exactly one side form the region boundary and are oriented
/// with the interior on their left.
fn classify_boundary(noded: &[SegmentString], curves: &[Vec<Vec2>]) -> Vec<BoundaryEdge> {
    let mut seen: HashSet<(CoordKey, CoordKey)> = HashSet::new();
    let mut boundary = Vec::new();
    for string in noded {
        for (a, b) in string.segments() {
            if a == b {
                continue;
            }
            let (ka, kb) = (key(a), key(b));
            let undirected = if ka <= kb { (ka, kb) } else { (kb, ka) };
            if !seen.insert(undirected) {
                continue;
            }

            let dir = b - a;
            let len = dir.length();
            let left = Vec2::new(-dir.y, dir.x) / len;
            let mid = (a + b) * 0.5;
            let delta = f64::max(
                len * PROBE_OFFSET_FACTOR,
                (mid.x.abs() + mid.y.abs() + 1.0) * PROBE_OFFSET_FLOOR,
            );
            let left_inside = winding_number(mid + left * delta, curves) > 0;
            let right_inside = winding_number(mid - left * delta, curves) > 0;
            match (left_inside, right_inside) {
                (true, false) => boundary.push(BoundaryEdge { start: a, end: b }),
                (false, true) => boundary.push(BoundaryEdge { start: b, end: a }),
                _ => {}
            }
        }
    }
    boundary
}

// =============================================================================
// RING STITCHING
// =============================================================================

/// Links boundary edges into closed rings.
///
/// At every node each incoming edge is paired with the outgoing edge of
/// smallest counter-clockwise turn, which hugs the interior kept on the
/// left. The pairing must be a bijection; anything else means the
/// arrangement is inconsistent at this precision.
fn stitch_rings(boundary: &[BoundaryEdge]) -> BufferResult<Vec<Vec<Vec2>>> {
    if boundary.is_empty() {
        return Ok(Vec::new());
    }

    let mut outgoing: HashMap<CoordKey, Vec<usize>> = HashMap::new();
    for (idx, edge) in boundary.iter().enumerate() {
        outgoing.entry(key(edge.start)).or_default().push(idx);
    }

    let mut next: Vec<Option<usize>> = vec![None; boundary.len()];
    let mut claimed: Vec<bool> = vec![false; boundary.len()];
    for (idx, edge) in boundary.iter().enumerate() {
        let candidates = outgoing.get(&key(edge.end)).ok_or_else(|| {
            BufferError::robustness("dangling boundary edge: no continuation at node")
        })?;
        let incoming_dir = edge.end - edge.start;
        let chosen = candidates
            .iter()
            .copied()
            .min_by(|&a, &b| {
                let ta = ccw_turn(incoming_dir, boundary[a].end - boundary[a].start);
                let tb = ccw_turn(incoming_dir, boundary[b].end - boundary[b].start);
                ta.total_cmp(&tb)
            })
            .ok_or_else(|| {
                BufferError::robustness("dangling boundary edge: no continuation at node")
            })?;
        if claimed[chosen] {
            return Err(BufferError::robustness(
                "inconsistent boundary: two edges continue into the same edge",
            ));
        }
        claimed[chosen] = true;
        next[idx] = Some(chosen);
    }

    let mut visited = vec![false; boundary.len()];
    let mut rings = Vec::new();
    for start in 0..boundary.len() {
        if visited[start] {
            continue;
        }
        let mut ring = Vec::new();
        let mut current = start;
        loop {
            if visited[current] {
                return Err(BufferError::robustness(
                    "inconsistent boundary: ring traversal re-entered an edge",
                ));
            }
            visited[current] = true;
            ring.push(boundary[current].start);
            match next[current] {
                Some(n) if n == start => break,
                Some(n) => current = n,
                None => {
                    return Err(BufferError::robustness(
                        "dangling boundary edge: ring did not close",
                    ))
                }
            }
        }
        if ring.len() < 3 {
            return Err(BufferError::robustness(
                "degenerate boundary ring with fewer than 3 vertices",
            ));
        }
        rings.push(ring);
    }
    Ok(rings)
}

/// Counter-clockwise turn angle from one direction to another, in
/// `(0, 2*pi]`.
fn ccw_turn(from: Vec2, to: Vec2) -> f64 {
    let a = from.y.atan2(from.x);
    let b = to.y.atan2(to.x);
    let mut turn = b - a;
    while turn <= 0.0 {
        turn += 2.0 * std::f64::consts::PI;
    }
    while turn > 2.0 * std::f64::consts::PI {
        turn -= 2.0 * std::f64::consts::PI;
    }
    turn
}

// =============================================================================
// POLYGON ASSEMBLY
// =============================================================================

/// Builds the polygonal result from stitched boundary rings.
fn assemble(rings: Vec<Vec<Vec2>>) -> BufferResult<Geometry> {
    let mut shells: Vec<(LinearRing, Vec<Vec2>, f64)> = Vec::new();
    let mut holes: Vec<(LinearRing, Vec2)> = Vec::new();
    for coords in rings {
        let area = signed_area(&coords);
        if area == 0.0 {
            continue;
        }
        let probe = coords[0];
        let ring = LinearRing::new(coords.clone())?;
        if area > 0.0 {
            shells.push((ring, coords, area));
        } else {
            holes.push((ring, probe));
        }
    }

    if shells.is_empty() {
        if holes.is_empty() {
            return Ok(Geometry::empty_polygon());
        }
        return Err(BufferError::robustness(
            "inconsistent result: holes without any shell",
        ));
    }

    let mut shell_holes: Vec<Vec<LinearRing>> = vec![Vec::new(); shells.len()];
    for (hole, probe) in holes {
        let mut owner: Option<usize> = None;
        for (idx, (_, shell_coords, area)) in shells.iter().enumerate() {
            if winding_number(probe, std::slice::from_ref(shell_coords)) != 0 {
                let smaller = owner.map_or(true, |o| *area < shells[o].2);
                if smaller {
                    owner = Some(idx);
                }
            }
        }
        match owner {
            Some(idx) => shell_holes[idx].push(hole),
            None => {
                return Err(BufferError::robustness(
                    "inconsistent result: hole outside every shell",
                ))
            }
        }
    }

    let mut polygons: Vec<Polygon> = Vec::new();
    for ((shell, _, _), ring_holes) in shells.into_iter().zip(shell_holes) {
        polygons.push(Polygon::new(shell, ring_holes));
    }
    if polygons.len() == 1 {
        let polygon = polygons.remove(0);
        Ok(Geometry::polygon(polygon))
    } else {
        Ok(Geometry::multi_polygon(polygons))
    }
}
