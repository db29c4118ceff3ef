//! Robust geometric predicates used by noding and ring assembly.
//!
//! Orientation tests use Shewchuk's adaptive precision arithmetic via the
//! `robust` crate, so sign decisions are exact even for nearly collinear
//! inputs. Constructed values (intersection points) remain ordinary floating
//! point; consistency of the construction is checked downstream.

use super::Vec2;
use robust::{orient2d, Coord};

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are arranged counter-clockwise (left turn).
    CounterClockwise,
    /// Points are arranged clockwise (right turn).
    Clockwise,
    /// Points are collinear.
    Collinear,
}

fn coord(p: Vec2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Determines the exact orientation of three points.
///
/// ## Example
///
/// ```rust
/// use polybuffer::geom::predicates::{orientation, Orientation};
/// use polybuffer::Vec2;
///
/// let a = Vec2::new(0.0, 0.0);
/// let b = Vec2::new(1.0, 0.0);
/// let c = Vec2::new(0.5, 1.0);
/// assert_eq!(orientation(a, b, c), Orientation::CounterClockwise);
/// ```
#[must_use]
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> Orientation {
    let det = orient2d(coord(a), coord(b), coord(c));
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns true when the segments `a1-a2` and `b1-b2` cross in their
/// interiors.
///
/// Touching at endpoints or collinear overlap is not a proper intersection.
#[must_use]
pub fn properly_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);
    if o1 == Orientation::Collinear
        || o2 == Orientation::Collinear
        || o3 == Orientation::Collinear
        || o4 == Orientation::Collinear
    {
        return false;
    }
    o1 != o2 && o3 != o4
}

/// Returns true when `p` lies strictly inside the segment `a-b`.
#[must_use]
pub fn point_in_segment_interior(p: Vec2, a: Vec2, b: Vec2) -> bool {
    if p == a || p == b {
        return false;
    }
    if orientation(a, b, p) != Orientation::Collinear {
        return false;
    }
    let min = a.min(b);
    let max = a.max(b);
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Intersection point of two properly crossing segments.
///
/// Returns `None` for parallel or collinear segment pairs. The returned
/// point is a floating-point construction; callers needing grid consistency
/// snap it afterwards.
#[must_use]
pub fn intersection_point(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return None;
    }
    let t = (b1 - a1).perp_dot(s) / denom;
    Some(a1 + r * t)
}

/// Winding number of `p` with respect to a set of implicitly closed rings.
///
/// Crossing decisions are made with exact orientation tests, so the result
/// is reliable whenever `p` does not lie exactly on a ring edge.
#[must_use]
pub fn winding_number(p: Vec2, rings: &[Vec<Vec2>]) -> i32 {
    let mut winding = 0;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            if a.y <= p.y {
                if b.y > p.y && orientation(a, b, p) == Orientation::CounterClockwise {
                    winding += 1;
                }
            } else if b.y <= p.y && orientation(a, b, p) == Orientation::Clockwise {
                winding -= 1;
            }
        }
    }
    winding
}
