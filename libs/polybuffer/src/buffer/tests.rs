//! Tests for buffer parameters, offset curves, and the retry orchestration.

use super::op::{BufferStrategy, PrecisionStrategy};
use super::*;
use crate::error::BufferError;
use crate::geom::{signed_area, Geometry, LinearRing, Polygon, Vec2};
use crate::precision::PrecisionModel;

fn ring(coords: &[(f64, f64)]) -> LinearRing {
    LinearRing::new(coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect()).unwrap()
}

fn unit_square() -> Geometry {
    Geometry::polygon(Polygon::new(
        ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
        vec![],
    ))
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Test parameter defaults match the documented configuration.
#[test]
fn test_parameter_defaults() {
    let params = BufferParameters::default();
    assert_eq!(params.quadrant_segments(), 8);
    assert_eq!(params.end_cap_style(), EndCapStyle::Round);
    assert_eq!(params.join_style(), JoinStyle::Round);
    assert_eq!(params.mitre_limit(), 5.0);
    assert!(params.validate().is_ok());
}

/// Test parameter validation rejects unusable values.
#[test]
fn test_parameter_validation() {
    assert!(BufferParameters::default()
        .with_quadrant_segments(0)
        .validate()
        .is_err());
    assert!(BufferParameters::default()
        .with_mitre_limit(0.0)
        .validate()
        .is_err());
    assert!(BufferParameters::default()
        .with_mitre_limit(f64::NAN)
        .validate()
        .is_err());
}

// =============================================================================
// OFFSET CURVES
// =============================================================================

/// Test a point buffer produces one full circle of curve points.
#[test]
fn test_curve_point_circle() {
    let params = BufferParameters::default();
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let curves = builder
        .curves(&Geometry::point(Vec2::new(1.0, 1.0)), 2.0)
        .unwrap();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].len(), 32);

    let area = signed_area(&curves[0]);
    let disk = std::f64::consts::PI * 4.0;
    assert!(area > 0.0 && area < disk);
    assert!(area > disk * 0.97);
}

/// Test non-areal inputs with non-positive distance produce no curves.
#[test]
fn test_curve_non_areal_non_positive() {
    let params = BufferParameters::default();
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let line = Geometry::line_string(vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)]);
    assert!(builder.curves(&line, 0.0).unwrap().is_empty());
    assert!(builder.curves(&line, -1.0).unwrap().is_empty());
    assert!(builder
        .curves(&Geometry::point(Vec2::ZERO), -1.0)
        .unwrap()
        .is_empty());
}

/// Test a flat-capped straight line yields an exact rectangle outline.
#[test]
fn test_curve_flat_cap_rectangle() {
    let params = BufferParameters::default().with_end_cap_style(EndCapStyle::Flat);
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let line = Geometry::line_string(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    let curves = builder.curves(&line, 1.0).unwrap();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].len(), 4);
    assert_eq!(signed_area(&curves[0]), 20.0);
}

/// Test square caps extend the outline past both endpoints.
#[test]
fn test_curve_square_cap_extends() {
    let params = BufferParameters::default().with_end_cap_style(EndCapStyle::Square);
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let line = Geometry::line_string(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    let curves = builder.curves(&line, 1.0).unwrap();
    assert_eq!(curves.len(), 1);
    // Rectangle extended by the distance at both ends.
    assert_eq!(signed_area(&curves[0]), 24.0);
    let min_x = curves[0].iter().map(|p| p.x).fold(f64::MAX, f64::min);
    let max_x = curves[0].iter().map(|p| p.x).fold(f64::MIN, f64::max);
    assert_eq!(min_x, -1.0);
    assert_eq!(max_x, 11.0);
}

/// Test mitred joins keep square corners sharp.
#[test]
fn test_curve_mitre_join_square() {
    let params = BufferParameters::default().with_join_style(JoinStyle::Mitre);
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let curves = builder.curves(&unit_square(), 1.0).unwrap();

    // Area ring plus outward curve; the inward curve is fully eroded.
    assert_eq!(curves.len(), 2);
    let outward = &curves[1];
    assert_eq!(outward.len(), 4);
    assert!((signed_area(outward) - 9.0).abs() < 1.0e-12);
    assert!(outward
        .iter()
        .any(|p| (*p - Vec2::new(-1.0, -1.0)).length() < 1.0e-12));
}

/// Test round joins insert arc points at convex corners.
#[test]
fn test_curve_round_join_square() {
    let params = BufferParameters::default();
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let curves = builder.curves(&unit_square(), 1.0).unwrap();
    assert_eq!(curves.len(), 2);

    let outward = &curves[1];
    // Four quarter-circle fillets plus the edge endpoints.
    assert!(outward.len() > 32);
    let area = signed_area(outward);
    let exact = 1.0 + 4.0 + std::f64::consts::PI;
    assert!(area > exact - 0.05 && area < exact);
}

/// Test the inward stroke curve disappears for narrow rings.
#[test]
fn test_curve_erosion_drops_inward_curve() {
    let params = BufferParameters::default();
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);

    // A wide ring keeps its inward parallel curve.
    let wide = Geometry::polygon(Polygon::new(
        ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
        vec![],
    ));
    assert_eq!(builder.curves(&wide, 1.0).unwrap().len(), 3);

    // A narrow ring erodes away entirely.
    assert_eq!(builder.curves(&unit_square(), 1.0).unwrap().len(), 2);
}

/// Test negative buffers shrink the shell without emitting area rings.
#[test]
fn test_curve_negative_polygon() {
    let params = BufferParameters::default();
    let precision = PrecisionModel::floating();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let wide = Geometry::polygon(Polygon::new(
        ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
        vec![],
    ));
    let curves = builder.curves(&wide, -1.0).unwrap();
    assert_eq!(curves.len(), 1);
    // Counter-clockwise inner ring: converging corners extend the offset
    // edges to their exact intersections.
    assert_eq!(curves[0].len(), 4);
    assert_eq!(signed_area(&curves[0]), 64.0);

    // Erosion swallows the whole shell.
    assert!(builder.curves(&unit_square(), -1.0).unwrap().is_empty());
}

/// Test curves are snapped through the working precision model.
#[test]
fn test_curve_snapping() {
    let params = BufferParameters::default();
    let precision = PrecisionModel::fixed(10.0).unwrap();
    let builder = OffsetCurveBuilder::new(&params, &precision);
    let curves = builder
        .curves(&Geometry::point(Vec2::new(0.123, 0.456)), 1.0)
        .unwrap();
    for p in &curves[0] {
        assert_eq!(*p, precision.make_precise(*p));
    }
}

// =============================================================================
// SCALE FACTOR DERIVATION
// =============================================================================

/// Test the scale factor follows the effective problem size.
#[test]
fn test_scale_factor_effective_size() {
    let line = Geometry::line_string(vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0)]);
    // Envelope 3, expanded by 1 on both sides: one digit of size.
    assert_eq!(precision_scale_factor(&line, 1.0, 12), 1.0e11);
    // Negative distances do not expand the envelope.
    assert_eq!(precision_scale_factor(&line, -1.0, 12), 1.0e11);
    // A larger region costs digits.
    assert_eq!(precision_scale_factor(&line, 100.0, 12), 1.0e9);
}

/// Test the scale factor grows monotonically with requested digits.
#[test]
fn test_scale_factor_monotonic() {
    let square = unit_square();
    let mut previous = 0.0;
    for digits in 0..=12 {
        let scale = precision_scale_factor(&square, 0.5, digits);
        assert!(scale > previous, "scale must increase with digits");
        previous = scale;
    }
}

/// Test the scale factor is bit-identical across repeated evaluation.
#[test]
fn test_scale_factor_deterministic() {
    let square = unit_square();
    let a = precision_scale_factor(&square, 0.37, 12);
    let b = precision_scale_factor(&square, 0.37, 12);
    assert_eq!(a.to_bits(), b.to_bits());
}

/// Test the degenerate zero-extent case stays finite.
#[test]
fn test_scale_factor_degenerate_extent() {
    let point = Geometry::point(Vec2::new(5.0, 5.0));
    let scale = precision_scale_factor(&point, 0.0, 12);
    assert!(scale.is_finite());
    assert_eq!(scale, 1.0e11);
    let scale = precision_scale_factor(&point, -2.0, 12);
    assert!(scale.is_finite());
}

// =============================================================================
// RETRY ORCHESTRATION
// =============================================================================

/// Attempt runner recording the precision schedule it was driven through.
struct ScriptedStrategy {
    failures_before_success: usize,
    invalid_at: Option<usize>,
    scales: Vec<Option<f64>>,
}

impl ScriptedStrategy {
    fn failing(failures_before_success: usize) -> Self {
        Self {
            failures_before_success,
            invalid_at: None,
            scales: Vec::new(),
        }
    }
}

impl BufferStrategy for ScriptedStrategy {
    fn attempt(
        &mut self,
        _geometry: &Geometry,
        _distance: f64,
        precision: PrecisionStrategy,
    ) -> crate::error::BufferResult<Geometry> {
        let scale = match precision {
            PrecisionStrategy::Native => None,
            PrecisionStrategy::FixedGrid(model) => model.scale(),
        };
        self.scales.push(scale);
        let call = self.scales.len();
        if Some(call) == self.invalid_at {
            return Err(BufferError::invalid_argument("scripted invalid argument"));
        }
        if call <= self.failures_before_success {
            return Err(BufferError::robustness(format!("scripted failure {call}")));
        }
        Ok(Geometry::empty_polygon())
    }
}

/// Test a fast-path success performs exactly one attempt.
#[test]
fn test_fast_path_success_is_single_attempt() {
    let square = unit_square();
    let mut strategy = ScriptedStrategy::failing(0);
    let result = BufferOp::new(&square).compute_with(0.5, &mut strategy);
    assert!(result.is_ok());
    assert_eq!(strategy.scales, vec![None]);
}

/// Test the ladder stops at the first reduced-precision success.
#[test]
fn test_ladder_stops_on_success() {
    let square = unit_square();
    let mut strategy = ScriptedStrategy::failing(3);
    let result = BufferOp::new(&square).compute_with(0.5, &mut strategy);
    assert!(result.is_ok());
    // Fast path plus ladder attempts at digits 12 and 11; success at 10.
    assert_eq!(strategy.scales.len(), 4);
    assert_eq!(strategy.scales[0], None);
    assert_eq!(
        strategy.scales[1],
        Some(precision_scale_factor(&square, 0.5, 12))
    );
    assert_eq!(
        strategy.scales[3],
        Some(precision_scale_factor(&square, 0.5, 10))
    );
}

/// Test exhausting all 13 ladder levels reports the digit-0 failure.
#[test]
fn test_ladder_exhaustion_reports_last_failure() {
    let square = unit_square();
    let mut strategy = ScriptedStrategy::failing(usize::MAX);
    let result = BufferOp::new(&square).compute_with(0.5, &mut strategy);

    // Fast path + 13 ladder attempts (digits 12 down to 0).
    assert_eq!(strategy.scales.len(), 14);
    assert_eq!(
        strategy.scales[13],
        Some(precision_scale_factor(&square, 0.5, 0))
    );

    match result {
        Err(BufferError::ComputationFailed { source }) => match *source {
            BufferError::Robustness { ref message } => {
                assert_eq!(message, "scripted failure 14");
            }
            ref other => panic!("unexpected cause: {other}"),
        },
        other => panic!("expected exhaustion failure, got {other:?}"),
    }
}

/// Test the ladder scale factors decrease strictly.
#[test]
fn test_ladder_scales_decrease() {
    let square = unit_square();
    let mut strategy = ScriptedStrategy::failing(usize::MAX);
    let _ = BufferOp::new(&square).compute_with(0.5, &mut strategy);
    let ladder: Vec<f64> = strategy.scales[1..].iter().map(|s| s.unwrap()).collect();
    assert!(ladder.windows(2).all(|w| w[1] < w[0]));
}

/// Test fixed-precision inputs get one fallback attempt, then fail.
#[test]
fn test_fixed_precision_single_fallback() {
    let grid = PrecisionModel::fixed(100.0).unwrap();
    let square = unit_square().with_precision_model(grid);
    let mut strategy = ScriptedStrategy::failing(usize::MAX);
    let result = BufferOp::new(&square).compute_with(0.5, &mut strategy);

    // Fast path plus exactly one attempt on the input's own grid.
    assert_eq!(strategy.scales, vec![None, Some(100.0)]);
    assert!(matches!(
        result,
        Err(BufferError::ComputationFailed { .. })
    ));
}

/// Test fixed-precision fallback success returns normally.
#[test]
fn test_fixed_precision_fallback_success() {
    let grid = PrecisionModel::fixed(100.0).unwrap();
    let square = unit_square().with_precision_model(grid);
    let mut strategy = ScriptedStrategy::failing(1);
    let result = BufferOp::new(&square).compute_with(0.5, &mut strategy);
    assert!(result.is_ok());
    assert_eq!(strategy.scales.len(), 2);
}

/// Test non-robustness failures propagate immediately without retries.
#[test]
fn test_invalid_argument_is_not_retried() {
    let square = unit_square();
    let mut strategy = ScriptedStrategy::failing(usize::MAX);
    strategy.invalid_at = Some(2);
    let result = BufferOp::new(&square).compute_with(0.5, &mut strategy);
    assert_eq!(strategy.scales.len(), 2);
    assert!(matches!(
        result,
        Err(BufferError::InvalidArgument { .. })
    ));
}
