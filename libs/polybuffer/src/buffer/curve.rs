//! Raw offset curve construction.
//!
//! Produces the closed curves whose positive-winding region is the buffer of
//! a geometry at a signed distance. The curves may self-intersect; noding
//! and winding classification downstream resolve the crossings rather than
//! requiring each raw curve to be simple.
//!
//! ## Curve orientation
//!
//! Curves are emitted so that a point belongs to the buffer exactly when its
//! winding number over the full curve set is positive:
//!
//! - areal interiors contribute their shell (counter-clockwise) and hole
//!   (clockwise) rings unchanged,
//! - boundary strokes contribute an outward parallel curve (counter-
//!   clockwise) and, unless the ring is fully eroded, an inward parallel
//!   curve (clockwise),
//! - negative distances invert the roles: the shell shrinks, holes grow.

use std::f64::consts::PI;

use crate::buffer::params::{BufferParameters, EndCapStyle, JoinStyle};
use crate::error::BufferResult;
use crate::geom::predicates::intersection_point;
use crate::geom::{Envelope, Geometry, Polygon, Shape, Vec2};
use crate::precision::PrecisionModel;

/// When `cos(angle between consecutive directions) <= this`, a converging
/// corner is closed with a flat cap instead of extending the offset lines
/// to their (divergent) intersection.
const FLAT_CAP_COS: f64 = -0.98;

/// Builds raw offset curves for one buffer attempt.
///
/// All emitted coordinates are snapped through the working precision model
/// so the noder and the winding probes observe identical linework.
#[derive(Debug)]
pub struct OffsetCurveBuilder<'a> {
    params: &'a BufferParameters,
    precision: &'a PrecisionModel,
}

impl<'a> OffsetCurveBuilder<'a> {
    /// Creates a curve builder for the given parameters and working
    /// precision model.
    #[must_use]
    pub fn new(params: &'a BufferParameters, precision: &'a PrecisionModel) -> Self {
        Self { params, precision }
    }

    /// Raw closed offset curves of `geometry` at `distance`.
    ///
    /// An empty result means the buffer is empty (for example a non-areal
    /// input with a non-positive distance).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when curve generation hits structurally
    /// invalid input not caught earlier.
    pub fn curves(&self, geometry: &Geometry, distance: f64) -> BufferResult<Vec<Vec<Vec2>>> {
        let mut out = Vec::new();
        self.shape_curves(geometry.shape(), distance, &mut out)?;
        Ok(out)
    }

    fn shape_curves(
        &self,
        shape: &Shape,
        distance: f64,
        out: &mut Vec<Vec<Vec2>>,
    ) -> BufferResult<()> {
        match shape {
            Shape::Point(p) => {
                if distance > 0.0 {
                    self.push_curve(out, self.circle(*p, distance));
                }
            }
            Shape::MultiPoint(pts) => {
                if distance > 0.0 {
                    for p in pts {
                        self.push_curve(out, self.circle(*p, distance));
                    }
                }
            }
            Shape::LineString(coords) => {
                if distance > 0.0 {
                    self.line_curves(coords, distance, out);
                }
            }
            Shape::MultiLineString(lines) => {
                if distance > 0.0 {
                    for line in lines {
                        self.line_curves(line, distance, out);
                    }
                }
            }
            Shape::Polygon(polygon) => {
                if let Some(polygon) = polygon {
                    self.polygon_curves(polygon, distance, out);
                }
            }
            Shape::MultiPolygon(polygons) => {
                for polygon in polygons {
                    self.polygon_curves(polygon, distance, out);
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // PER-SHAPE CURVES
    // -------------------------------------------------------------------------

    fn line_curves(&self, coords: &[Vec2], distance: f64, out: &mut Vec<Vec<Vec2>>) {
        let path = cleaned(coords);
        match path.len() {
            0 => {}
            1 => self.push_curve(out, self.circle(path[0], distance)),
            _ => {
                if path.len() >= 4 && path[0] == path[path.len() - 1] {
                    // Closed line: stroke its ring without caps.
                    let ring = ccw_ring(&path[..path.len() - 1]);
                    self.ring_stroke_curves(&ring, distance, out);
                } else {
                    self.push_curve(out, self.stroke_outline(&path, distance));
                }
            }
        }
    }

    fn polygon_curves(&self, polygon: &Polygon, distance: f64, out: &mut Vec<Vec<Vec2>>) {
        if distance >= 0.0 {
            // The area itself is part of the buffer.
            self.push_curve(out, polygon.shell().coords().to_vec());
            for hole in polygon.holes() {
                self.push_curve(out, hole.coords().to_vec());
            }
            if distance > 0.0 {
                self.ring_stroke_curves(polygon.shell().coords(), distance, out);
                for hole in polygon.holes() {
                    let hole_ccw: Vec<Vec2> = hole.reversed().coords().to_vec();
                    self.ring_stroke_curves(&hole_ccw, distance, out);
                }
            }
        } else {
            let depth = -distance;
            if !is_eroded(polygon.shell().coords(), depth) {
                let mut inner = self.offset_path_right(
                    &reversed(polygon.shell().coords()),
                    depth,
                    true,
                );
                inner.reverse();
                self.push_curve(out, inner);
            }
            for hole in polygon.holes() {
                let hole_ccw = reversed(hole.coords());
                let mut grown = self.offset_path_right(&hole_ccw, depth, true);
                grown.reverse();
                self.push_curve(out, grown);
            }
        }
    }

    /// Stroke curves of a counter-clockwise ring: outward parallel curve
    /// plus, unless the ring is narrower than the stroke, the inward one.
    fn ring_stroke_curves(&self, ring_ccw: &[Vec2], distance: f64, out: &mut Vec<Vec<Vec2>>) {
        self.push_curve(out, self.offset_path_right(ring_ccw, distance, true));
        if !is_eroded(ring_ccw, distance) {
            self.push_curve(
                out,
                self.offset_path_right(&reversed(ring_ccw), distance, true),
            );
        }
    }

    /// Closed outline around an open path: right side forward, end cap,
    /// right side backward, start cap. Counter-clockwise overall.
    fn stroke_outline(&self, path: &[Vec2], distance: f64) -> Vec<Vec2> {
        let mut curve = self.offset_path_right(path, distance, false);
        let back = reversed(path);
        self.add_cap(&mut curve, path[path.len() - 2], path[path.len() - 1], distance);
        curve.extend(self.offset_path_right(&back, distance, false));
        self.add_cap(&mut curve, path[1], path[0], distance);
        curve
    }

    // -------------------------------------------------------------------------
    // PATH OFFSETTING
    // -------------------------------------------------------------------------

    /// Parallel curve at `distance` on the right-hand side of the path.
    ///
    /// Diverging corners (left turns) receive a join per the configured
    /// style; converging corners extend the adjacent offset edges to their
    /// intersection, falling back to a flat cap at hairpins.
    fn offset_path_right(&self, path: &[Vec2], distance: f64, closed: bool) -> Vec<Vec2> {
        let deduped;
        let path = if closed {
            deduped = cleaned_ring(path);
            &deduped[..]
        } else {
            path
        };
        let n = path.len();
        let mut curve = Vec::with_capacity(n * 2);
        if n < 2 {
            return curve;
        }

        if closed {
            for i in 0..n {
                let prev = path[(i + n - 1) % n];
                let curr = path[i];
                let next = path[(i + 1) % n];
                self.add_vertex_offset(&mut curve, prev, curr, next, distance);
            }
        } else {
            let first_normal = right_normal(path[1] - path[0]);
            curve.push(path[0] + first_normal * distance);
            for i in 1..(n - 1) {
                self.add_vertex_offset(&mut curve, path[i - 1], path[i], path[i + 1], distance);
            }
            let last_normal = right_normal(path[n - 1] - path[n - 2]);
            curve.push(path[n - 1] + last_normal * distance);
        }
        curve
    }

    /// Offset points contributed by one path vertex.
    fn add_vertex_offset(
        &self,
        curve: &mut Vec<Vec2>,
        prev: Vec2,
        curr: Vec2,
        next: Vec2,
        distance: f64,
    ) {
        let e1 = curr - prev;
        let e2 = next - curr;
        let n1 = right_normal(e1);
        let n2 = right_normal(e2);
        let q1 = curr + n1 * distance;
        let q2 = curr + n2 * distance;

        if e1.perp_dot(e2) > 0.0 {
            // Left turn: the right-side offsets diverge around the corner.
            self.add_join(curve, curr, n1, n2, distance, q1, q2);
        } else {
            // Right turn or straight: the offset edges converge. Extending
            // them to their intersection keeps the corner exact; a
            // near-hairpin corner gets a flat cap instead of a divergent
            // extension.
            let u1 = e1 / e1.length();
            let u2 = e2 / e2.length();
            if u1.dot(u2) > FLAT_CAP_COS {
                if let Some(corner) = intersection_point(q1, q1 + u1, q2, q2 + u2) {
                    curve.push(corner);
                    return;
                }
            }
            curve.push(q1);
            if q2 != q1 {
                curve.push(q2);
            }
        }
    }

    fn add_join(
        &self,
        curve: &mut Vec<Vec2>,
        vertex: Vec2,
        n1: Vec2,
        n2: Vec2,
        distance: f64,
        q1: Vec2,
        q2: Vec2,
    ) {
        match self.params.join_style() {
            JoinStyle::Round => {
                curve.push(q1);
                self.add_arc(curve, vertex, distance, n1.y.atan2(n1.x), n2.y.atan2(n2.x));
                curve.push(q2);
            }
            JoinStyle::Mitre => {
                let bisector = n1 + n2;
                let len = bisector.length();
                if len > f64::EPSILON {
                    let bisector = bisector / len;
                    let cos_half = bisector.dot(n1);
                    if cos_half > 0.0 && 1.0 / cos_half <= self.params.mitre_limit() {
                        curve.push(vertex + bisector * (distance / cos_half));
                        return;
                    }
                }
                // Mitre exceeds the limit (or the corner is a hairpin).
                curve.push(q1);
                curve.push(q2);
            }
            JoinStyle::Bevel => {
                curve.push(q1);
                curve.push(q2);
            }
        }
    }

    /// End cap between the forward and backward offset sides.
    ///
    /// `before` and `tip` are the last two path vertices in the direction of
    /// travel; the cap closes around `tip`.
    fn add_cap(&self, curve: &mut Vec<Vec2>, before: Vec2, tip: Vec2, distance: f64) {
        let dir = tip - before;
        let n = right_normal(dir);
        match self.params.end_cap_style() {
            EndCapStyle::Round => {
                let start = n.y.atan2(n.x);
                self.add_arc(curve, tip, distance, start, start + PI);
            }
            EndCapStyle::Flat => {}
            EndCapStyle::Square => {
                let len = dir.length();
                if len > f64::EPSILON {
                    let out = dir / len * distance;
                    curve.push(tip + n * distance + out);
                    curve.push(tip - n * distance + out);
                }
            }
        }
    }

    /// Counter-clockwise arc interior points from `start_angle` to
    /// `end_angle` around `center`; the endpoints themselves are emitted by
    /// the caller.
    fn add_arc(&self, curve: &mut Vec<Vec2>, center: Vec2, radius: f64, start_angle: f64, end_angle: f64) {
        let mut sweep = end_angle - start_angle;
        while sweep <= 0.0 {
            sweep += 2.0 * PI;
        }
        let step = PI / 2.0 / f64::from(self.params.quadrant_segments());
        let mut angle = step;
        while angle < sweep {
            let a = start_angle + angle;
            curve.push(center + Vec2::new(a.cos(), a.sin()) * radius);
            angle += step;
        }
    }

    /// Counter-clockwise circle around `center`.
    fn circle(&self, center: Vec2, radius: f64) -> Vec<Vec2> {
        let n = (4 * self.params.quadrant_segments().max(1)) as usize;
        let mut curve = Vec::with_capacity(n);
        for i in 0..n {
            let a = 2.0 * PI * i as f64 / n as f64;
            curve.push(center + Vec2::new(a.cos(), a.sin()) * radius);
        }
        curve
    }

    // -------------------------------------------------------------------------
    // EMISSION
    // -------------------------------------------------------------------------

    /// Snaps a finished curve onto the working grid and keeps it if it
    /// remains a ring.
    fn push_curve(&self, out: &mut Vec<Vec<Vec2>>, coords: Vec<Vec2>) {
        let mut snapped: Vec<Vec2> = Vec::with_capacity(coords.len());
        for p in coords {
            let q = self.precision.make_precise(p);
            if snapped.last() != Some(&q) {
                snapped.push(q);
            }
        }
        while snapped.len() >= 2 && snapped.first() == snapped.last() {
            snapped.pop();
        }
        if snapped.len() >= 3 {
            out.push(snapped);
        }
    }
}

// =============================================================================
// FREE HELPERS
// =============================================================================

/// Unit normal on the right-hand side of a direction.
fn right_normal(dir: Vec2) -> Vec2 {
    let len = dir.length();
    if len > f64::EPSILON {
        Vec2::new(dir.y, -dir.x) / len
    } else {
        Vec2::ZERO
    }
}

/// Removes consecutive duplicate coordinates of a ring, including the
/// wraparound pair.
fn cleaned_ring(coords: &[Vec2]) -> Vec<Vec2> {
    let mut out = cleaned(coords);
    while out.len() >= 2 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// Removes consecutive duplicate coordinates.
fn cleaned(coords: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(coords.len());
    for &p in coords {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// A reversed copy of a coordinate sequence.
fn reversed(coords: &[Vec2]) -> Vec<Vec2> {
    let mut out = coords.to_vec();
    out.reverse();
    out
}

/// Normalizes a ring to counter-clockwise orientation.
fn ccw_ring(coords: &[Vec2]) -> Vec<Vec2> {
    if crate::geom::signed_area(coords) < 0.0 {
        reversed(coords)
    } else {
        coords.to_vec()
    }
}

/// True when a ring is too narrow to retain an inward parallel curve.
fn is_eroded(ring: &[Vec2], depth: f64) -> bool {
    Envelope::from_points(ring.iter().copied()).min_extent() <= 2.0 * depth
}
