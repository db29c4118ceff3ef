//! # Geometry Module
//!
//! 2D geometry value types for the buffer kernel.
//!
//! ## Structure
//!
//! - [`Vec2`]: coordinate type (alias for `glam::DVec2`)
//! - [`Envelope`]: axis-aligned bounding box
//! - [`LinearRing`] / [`Polygon`]: areal building blocks
//! - [`Geometry`]: tagged geometry value with an attached precision model
//! - `predicates`: robust orientation and intersection predicates
//!
//! ## Conventions
//!
//! Rings are stored without a duplicate closing vertex; the closing segment
//! is implicit. Shells are counter-clockwise, holes clockwise; constructors
//! normalize orientation.

pub mod predicates;


use crate::error::{BufferError, BufferResult};
use crate::precision::PrecisionModel;

pub use glam::DVec2 as Vec2;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Axis-aligned bounding box of a set of coordinates.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{Envelope, Vec2};
///
/// let env = Envelope::from_points([Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0)]);
/// assert_eq!(env.width(), 2.0);
/// assert_eq!(env.height(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min: Vec2,
    max: Vec2,
}

impl Envelope {
    /// Creates an empty envelope containing no points.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Builds the envelope of an iterator of points.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut env = Self::empty();
        for p in points {
            env.expand_to_include(p);
        }
        env
    }

    /// Grows the envelope to contain the given point.
    pub fn expand_to_include(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Merges another envelope into this one.
    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if !other.is_empty() {
            self.expand_to_include(other.min);
            self.expand_to_include(other.max);
        }
    }

    /// Returns true if the envelope contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Minimum corner. Meaningless for an empty envelope.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner. Meaningless for an empty envelope.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Horizontal extent; zero for an empty envelope.
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    /// Vertical extent; zero for an empty envelope.
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    /// The smaller of width and height.
    #[must_use]
    pub fn min_extent(&self) -> f64 {
        self.width().min(self.height())
    }
}

// =============================================================================
// RINGS AND POLYGONS
// =============================================================================

/// Signed area of a ring given by its vertices (closing segment implicit).
///
/// Positive for counter-clockwise orientation.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{geom::signed_area, Vec2};
///
/// let square = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(1.0, 0.0),
///     Vec2::new(1.0, 1.0),
///     Vec2::new(0.0, 1.0),
/// ];
/// assert_eq!(signed_area(&square), 1.0);
/// ```
#[must_use]
pub fn signed_area(coords: &[Vec2]) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..coords.len() {
        let a = coords[i];
        let b = coords[(i + 1) % coords.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// A closed ring of vertices without a duplicate closing vertex.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{LinearRing, Vec2};
///
/// let ring = LinearRing::new(vec![
///     Vec2::new(0.0, 0.0),
///     Vec2::new(4.0, 0.0),
///     Vec2::new(4.0, 3.0),
/// ]).unwrap();
/// assert_eq!(ring.coords().len(), 3);
/// assert!(ring.is_ccw());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    coords: Vec<Vec2>,
}

impl LinearRing {
    /// Creates a ring from vertices, tolerating an explicit closing vertex.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if fewer than 3 distinct vertices remain
    /// after dropping a duplicate closing vertex, or if any coordinate is
    /// not finite.
    pub fn new(mut coords: Vec<Vec2>) -> BufferResult<Self> {
        if coords.len() >= 2 && coords[0] == coords[coords.len() - 1] {
            coords.pop();
        }
        if coords.len() < 3 {
            return Err(BufferError::invalid_argument(
                "ring requires at least 3 distinct vertices",
            ));
        }
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(BufferError::invalid_argument(
                "ring contains non-finite coordinates",
            ));
        }
        Ok(Self { coords })
    }

    /// Ring vertices, closing segment implicit.
    #[must_use]
    pub fn coords(&self) -> &[Vec2] {
        &self.coords
    }

    /// Signed area of the ring; positive when counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.coords)
    }

    /// Returns true when the ring is counter-clockwise.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// The same ring traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut coords = self.coords.clone();
        coords.reverse();
        Self { coords }
    }

    /// Envelope of the ring vertices.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_points(self.coords.iter().copied())
    }
}

/// A polygon with one shell and zero or more holes.
///
/// The constructor normalizes the shell to counter-clockwise and holes to
/// clockwise orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shell: LinearRing,
    holes: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a polygon, normalizing ring orientations.
    #[must_use]
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        let shell = if shell.is_ccw() { shell } else { shell.reversed() };
        let holes = holes
            .into_iter()
            .map(|h| if h.is_ccw() { h.reversed() } else { h })
            .collect();
        Self { shell, holes }
    }

    /// The outer boundary, counter-clockwise.
    #[must_use]
    pub fn shell(&self) -> &LinearRing {
        &self.shell
    }

    /// Interior holes, clockwise.
    #[must_use]
    pub fn holes(&self) -> &[LinearRing] {
        &self.holes
    }

    /// Area of the polygon (shell minus holes).
    #[must_use]
    pub fn area(&self) -> f64 {
        let mut area = self.shell.signed_area();
        for hole in &self.holes {
            // Holes are clockwise so their signed area is negative.
            area += hole.signed_area();
        }
        area
    }

    /// Envelope of the shell.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.shell.envelope()
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// The structural variants a [`Geometry`] can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single coordinate.
    Point(Vec2),
    /// A collection of coordinates.
    MultiPoint(Vec<Vec2>),
    /// An open polyline of at least 2 vertices.
    LineString(Vec<Vec2>),
    /// A collection of polylines.
    MultiLineString(Vec<Vec<Vec2>>),
    /// A single polygon; no rings means the empty polygon.
    Polygon(Option<Polygon>),
    /// A collection of polygons.
    MultiPolygon(Vec<Polygon>),
}

/// A 2D geometry value paired with its precision model.
///
/// The precision model defaults to floating (no coordinate snapping) and can
/// be replaced with [`Geometry::with_precision_model`].
///
/// ## Example
///
/// ```rust
/// use polybuffer::{Geometry, PrecisionModel, Vec2};
///
/// let point = Geometry::point(Vec2::new(1.5, -0.5));
/// assert!(point.precision_model().is_floating());
/// assert!(!point.is_areal());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: Shape,
    precision: PrecisionModel,
}

impl Geometry {
    fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            precision: PrecisionModel::floating(),
        }
    }

    /// Creates a point geometry.
    #[must_use]
    pub fn point(p: Vec2) -> Self {
        Self::from_shape(Shape::Point(p))
    }

    /// Creates a multi-point geometry.
    #[must_use]
    pub fn multi_point(points: Vec<Vec2>) -> Self {
        Self::from_shape(Shape::MultiPoint(points))
    }

    /// Creates a polyline geometry.
    #[must_use]
    pub fn line_string(coords: Vec<Vec2>) -> Self {
        Self::from_shape(Shape::LineString(coords))
    }

    /// Creates a multi-polyline geometry.
    #[must_use]
    pub fn multi_line_string(lines: Vec<Vec<Vec2>>) -> Self {
        Self::from_shape(Shape::MultiLineString(lines))
    }

    /// Creates a polygon geometry.
    #[must_use]
    pub fn polygon(polygon: Polygon) -> Self {
        Self::from_shape(Shape::Polygon(Some(polygon)))
    }

    /// Creates the empty polygonal geometry.
    #[must_use]
    pub fn empty_polygon() -> Self {
        Self::from_shape(Shape::Polygon(None))
    }

    /// Creates a multi-polygon geometry.
    #[must_use]
    pub fn multi_polygon(polygons: Vec<Polygon>) -> Self {
        Self::from_shape(Shape::MultiPolygon(polygons))
    }

    /// Replaces the associated precision model.
    #[must_use]
    pub fn with_precision_model(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    /// The precision model coordinates of this geometry live on.
    #[must_use]
    pub fn precision_model(&self) -> &PrecisionModel {
        &self.precision
    }

    /// Structural access to the geometry.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Bounding envelope over all coordinates.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        match &self.shape {
            Shape::Point(p) => env.expand_to_include(*p),
            Shape::MultiPoint(pts) => {
                for p in pts {
                    env.expand_to_include(*p);
                }
            }
            Shape::LineString(coords) => {
                for p in coords {
                    env.expand_to_include(*p);
                }
            }
            Shape::MultiLineString(lines) => {
                for line in lines {
                    for p in line {
                        env.expand_to_include(*p);
                    }
                }
            }
            Shape::Polygon(polygon) => {
                if let Some(polygon) = polygon {
                    env.expand_to_include_envelope(&polygon.envelope());
                }
            }
            Shape::MultiPolygon(polygons) => {
                for polygon in polygons {
                    env.expand_to_include_envelope(&polygon.envelope());
                }
            }
        }
        env
    }

    /// Returns true for polygonal geometry (including the empty polygon).
    #[must_use]
    pub fn is_areal(&self) -> bool {
        matches!(self.shape, Shape::Polygon(_) | Shape::MultiPolygon(_))
    }

    /// Returns true when the geometry contains no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.shape {
            Shape::Point(_) => false,
            Shape::MultiPoint(pts) => pts.is_empty(),
            Shape::LineString(coords) => coords.is_empty(),
            Shape::MultiLineString(lines) => lines.iter().all(Vec::is_empty),
            Shape::Polygon(polygon) => polygon.is_none(),
            Shape::MultiPolygon(polygons) => polygons.is_empty(),
        }
    }

    /// Number of polygon parts; zero for non-areal or empty geometry.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        match &self.shape {
            Shape::Polygon(Some(_)) => 1,
            Shape::MultiPolygon(polygons) => polygons.len(),
            _ => 0,
        }
    }

    /// Total area; zero for non-areal geometry.
    #[must_use]
    pub fn area(&self) -> f64 {
        match &self.shape {
            Shape::Polygon(Some(polygon)) => polygon.area(),
            Shape::MultiPolygon(polygons) => polygons.iter().map(Polygon::area).sum(),
            _ => 0.0,
        }
    }

    /// Validates coordinate finiteness and structural requirements.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for non-finite coordinates or polylines
    /// with fewer than 2 vertices.
    pub fn validate(&self) -> BufferResult<()> {
        let check_coords = |coords: &[Vec2]| -> BufferResult<()> {
            if coords.iter().any(|c| !c.is_finite()) {
                return Err(BufferError::invalid_argument(
                    "geometry contains non-finite coordinates",
                ));
            }
            Ok(())
        };
        match &self.shape {
            Shape::Point(p) => check_coords(std::slice::from_ref(p)),
            Shape::MultiPoint(pts) => check_coords(pts),
            Shape::LineString(coords) => {
                if coords.len() < 2 {
                    return Err(BufferError::invalid_argument(
                        "line string requires at least 2 vertices",
                    ));
                }
                check_coords(coords)
            }
            Shape::MultiLineString(lines) => {
                for line in lines {
                    if line.len() < 2 {
                        return Err(BufferError::invalid_argument(
                            "line string requires at least 2 vertices",
                        ));
                    }
                    check_coords(line)?;
                }
                Ok(())
            }
            // Ring constructors already validated their coordinates.
            Shape::Polygon(_) | Shape::MultiPolygon(_) => Ok(()),
        }
    }
}
