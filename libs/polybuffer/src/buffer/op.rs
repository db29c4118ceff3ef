//! Precision-adaptive buffer orchestration.
//!
//! Buffering is attempted at the geometry's own precision first; that is the
//! common case and costs nothing extra. When the exact-precision
//! construction fails with a robustness failure, the computation is retried
//! on fixed grids of decreasing resolution until one attempt produces a
//! topologically consistent result. Only when every precision level has
//! failed does the operation report an error, carrying the last failure as
//! its cause.
//!
//! Inputs that already live on a fixed grid are treated differently: the
//! caller chose that grid deliberately, so there is exactly one fallback
//! attempt at the same grid paired with a snap-rounding noder, and a failure
//! there is terminal.

use config::constants::MAX_PRECISION_DIGITS;

use crate::buffer::builder::BufferBuilder;
use crate::buffer::params::BufferParameters;
use crate::error::{BufferError, BufferResult};
use crate::geom::Geometry;
use crate::noding::{ScaledNoder, SnapRoundingNoder};
use crate::precision::PrecisionModel;

// =============================================================================
// SCALE FACTOR DERIVATION
// =============================================================================

/// Scale factor preserving `max_precision_digits` significant digits over
/// the region a buffer computation actually touches.
///
/// The region size is the geometry's envelope expanded by the buffer
/// distance on every side, so the derived grid adapts to the problem rather
/// than to raw coordinate magnitudes. The result is always a power of ten:
/// the reciprocal of the smallest representable grid unit.
///
/// Pure and deterministic; never fails for finite inputs.
///
/// ## Example
///
/// ```rust
/// use polybuffer::buffer::precision_scale_factor;
/// use polybuffer::{Geometry, Vec2};
///
/// let line = Geometry::line_string(vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0)]);
/// // Effective size 5.0 has one digit, leaving 11 of the 12 requested.
/// assert_eq!(precision_scale_factor(&line, 1.0, 12), 1.0e11);
/// ```
#[must_use]
pub fn precision_scale_factor(
    geometry: &Geometry,
    distance: f64,
    max_precision_digits: i32,
) -> f64 {
    let env = geometry.envelope();
    let env_size = env.width().max(env.height());
    let expand_by = distance.max(0.0);
    let effective_size = env_size + 2.0 * expand_by;

    let size_digits = if effective_size > 0.0 {
        (effective_size.log10() + 1.0).trunc() as i32
    } else {
        // Degenerate extent (single point, non-positive distance): treat the
        // region as having nominal size 1 so the scale stays finite.
        1
    };
    10.0_f64.powi(max_precision_digits - size_digits)
}

// =============================================================================
// ATTEMPT SEAM
// =============================================================================

/// Precision handling for a single buffer attempt.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PrecisionStrategy {
    /// The geometry's native precision model with default noding.
    Native,
    /// An explicit fixed grid paired with a scale-aware snap-rounding noder.
    FixedGrid(PrecisionModel),
}

/// Runs one buffer attempt at a chosen precision.
///
/// The production implementation drives [`BufferBuilder`]; tests substitute
/// recording stubs to observe the retry schedule.
pub(crate) trait BufferStrategy {
    fn attempt(
        &mut self,
        geometry: &Geometry,
        distance: f64,
        precision: PrecisionStrategy,
    ) -> BufferResult<Geometry>;
}

struct KernelStrategy {
    params: BufferParameters,
}

impl BufferStrategy for KernelStrategy {
    fn attempt(
        &mut self,
        geometry: &Geometry,
        distance: f64,
        precision: PrecisionStrategy,
    ) -> BufferResult<Geometry> {
        let mut builder = BufferBuilder::new(self.params);
        if let PrecisionStrategy::FixedGrid(model) = precision {
            if let Some(scale) = model.scale() {
                let noder = ScaledNoder::new(Box::new(SnapRoundingNoder::unit()), scale)?;
                builder.set_noder(Box::new(noder));
            }
            builder.set_working_precision(model);
        }
        builder.buffer(geometry, distance)
    }
}

// =============================================================================
// BUFFER OPERATION
// =============================================================================

/// Precision-adaptive buffer operation.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{BufferOp, BufferParameters, EndCapStyle, Geometry, Vec2};
///
/// let line = Geometry::line_string(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
/// let op = BufferOp::new(&line)
///     .with_parameters(BufferParameters::default().with_end_cap_style(EndCapStyle::Flat));
/// let result = op.result_geometry(1.0).unwrap();
/// assert!(result.area() > 19.9 && result.area() < 20.1);
/// ```
#[derive(Debug)]
pub struct BufferOp<'a> {
    geometry: &'a Geometry,
    params: BufferParameters,
}

impl<'a> BufferOp<'a> {
    /// Creates a buffer operation with default parameters.
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            params: BufferParameters::default(),
        }
    }

    /// Replaces the buffer parameters.
    #[must_use]
    pub fn with_parameters(mut self, params: BufferParameters) -> Self {
        self.params = params;
        self
    }

    /// Computes the buffer at the given signed distance.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for malformed input; never retried
    /// - `ComputationFailed` when every precision level failed, carrying the
    ///   last robustness failure as its cause
    pub fn result_geometry(&self, distance: f64) -> BufferResult<Geometry> {
        let mut strategy = KernelStrategy {
            params: self.params,
        };
        self.compute_with(distance, &mut strategy)
    }

    /// The retry state machine, parameterized over the attempt runner.
    pub(crate) fn compute_with(
        &self,
        distance: f64,
        strategy: &mut dyn BufferStrategy,
    ) -> BufferResult<Geometry> {
        let fast_failure =
            match strategy.attempt(self.geometry, distance, PrecisionStrategy::Native) {
                Ok(result) => return Ok(result),
                Err(failure) if failure.is_robustness() => failure,
                Err(other) => return Err(other),
            };
        tracing::debug!(
            failure = %fast_failure,
            "exact-precision buffer attempt failed; reducing precision"
        );

        let native = *self.geometry.precision_model();
        if !native.is_floating() {
            // The caller chose this grid deliberately; one snap-rounded
            // attempt on the same grid, then give up.
            tracing::debug!("input has fixed precision; retrying once on its own grid");
            return match strategy.attempt(
                self.geometry,
                distance,
                PrecisionStrategy::FixedGrid(native),
            ) {
                Ok(result) => Ok(result),
                Err(failure) if failure.is_robustness() => {
                    Err(BufferError::computation_failed(failure))
                }
                Err(other) => Err(other),
            };
        }

        let mut last_failure = fast_failure;
        for digits in (0..=MAX_PRECISION_DIGITS).rev() {
            let scale = precision_scale_factor(self.geometry, distance, digits);
            let model = PrecisionModel::fixed(scale)?;
            tracing::debug!(digits, scale, "buffer attempt at reduced precision");
            match strategy.attempt(
                self.geometry,
                distance,
                PrecisionStrategy::FixedGrid(model),
            ) {
                Ok(result) => return Ok(result),
                Err(failure) if failure.is_robustness() => last_failure = failure,
                Err(other) => return Err(other),
            }
        }
        tracing::debug!("all precision levels exhausted");
        Err(BufferError::computation_failed(last_failure))
    }
}

// =============================================================================
// CONVENIENCE ENTRY POINTS
// =============================================================================

/// Buffers a geometry with default parameters.
///
/// ## Example
///
/// ```rust
/// use polybuffer::{buffer, Geometry, Vec2};
///
/// let disk = buffer(&Geometry::point(Vec2::ZERO), 2.0).unwrap();
/// assert!(disk.area() > 12.0);
/// ```
///
/// # Errors
///
/// See [`BufferOp::result_geometry`].
pub fn buffer(geometry: &Geometry, distance: f64) -> BufferResult<Geometry> {
    BufferOp::new(geometry).result_geometry(distance)
}

/// Buffers a geometry with explicit parameters.
///
/// # Errors
///
/// See [`BufferOp::result_geometry`].
pub fn buffer_with_params(
    geometry: &Geometry,
    distance: f64,
    params: BufferParameters,
) -> BufferResult<Geometry> {
    BufferOp::new(geometry)
        .with_parameters(params)
        .result_geometry(distance)
}
