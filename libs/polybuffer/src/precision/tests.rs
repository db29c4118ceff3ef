//! Tests for the precision model.

use super::*;

/// Test the floating model never alters coordinates.
#[test]
fn test_floating_is_identity() {
    let model = PrecisionModel::floating();
    let p = Vec2::new(0.123_456_789, -9.876_543_21);
    assert_eq!(model.make_precise(p), p);
    assert!(model.is_floating());
    assert_eq!(model.scale(), None);
}

/// Test fixed models snap to multiples of the grid size.
#[test]
fn test_fixed_snaps_to_grid() {
    let model = PrecisionModel::fixed(100.0).unwrap();
    let snapped = model.make_precise(Vec2::new(1.234_567, -1.234_567));
    assert_eq!(snapped, Vec2::new(1.23, -1.23));
    assert_eq!(model.grid_size(), Some(0.01));
}

/// Test snapping is idempotent.
#[test]
fn test_snapping_idempotent() {
    let model = PrecisionModel::fixed(1.0e6).unwrap();
    let once = model.make_precise(Vec2::new(0.333_333_333_3, 0.666_666_666_6));
    let twice = model.make_precise(once);
    assert_eq!(once, twice);
}

/// Test invalid scales are rejected.
#[test]
fn test_fixed_rejects_invalid_scale() {
    assert!(PrecisionModel::fixed(0.0).is_err());
    assert!(PrecisionModel::fixed(-5.0).is_err());
    assert!(PrecisionModel::fixed(f64::NAN).is_err());
    assert!(PrecisionModel::fixed(f64::INFINITY).is_err());
}
