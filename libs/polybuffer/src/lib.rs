//! # Polybuffer
//!
//! Precision-adaptive polygonal buffer kernel for 2D geometry.
//!
//! Computes the region within a signed distance of a geometry's boundary,
//! returning a valid polygonal result despite the numerical fragility of the
//! underlying offset and noding constructions.
//!
//! ## Architecture
//!
//! ```text
//! Geometry (+ PrecisionModel)
//!       ↓
//! BufferOp: exact-precision fast path
//!       ↓ robustness failure
//! BufferOp: fixed-grid retry ladder (snap rounding at decreasing scale)
//!       ↓
//! Polygonal Geometry output
//! ```
//!
//! Robustness failures are floating-point artifacts, not invalid input:
//! snapping coordinates onto a sufficiently coarse grid removes the
//! near-degeneracies that break topological consistency, at the cost of
//! precision. The orchestrator pays that cost lazily, one grid at a time.
//!
//! ## Usage
//!
//! ```rust
//! use polybuffer::{buffer, Geometry, Vec2};
//!
//! let square = Geometry::polygon(polybuffer::Polygon::new(
//!     polybuffer::LinearRing::new(vec![
//!         Vec2::new(0.0, 0.0),
//!         Vec2::new(1.0, 0.0),
//!         Vec2::new(1.0, 1.0),
//!         Vec2::new(0.0, 1.0),
//!     ]).unwrap(),
//!     vec![],
//! ));
//! let fattened = buffer(&square, 0.5).unwrap();
//! assert!(fattened.area() > square.area());
//! ```

pub mod buffer;
pub mod error;
pub mod geom;
pub mod noding;
pub mod precision;

pub use buffer::{
    buffer, buffer_with_params, precision_scale_factor, BufferOp, BufferParameters, EndCapStyle,
    JoinStyle,
};
pub use error::{BufferError, BufferResult};
pub use geom::{Envelope, Geometry, LinearRing, Polygon, Shape, Vec2};
pub use precision::PrecisionModel;
