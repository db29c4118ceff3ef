//! Tests for the noding strategies.

use super::*;
use crate::precision::PrecisionModel;

fn string(coords: &[(f64, f64)]) -> SegmentString {
    SegmentString::new(coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect()).unwrap()
}

/// Test segment strings reject degenerate input.
#[test]
fn test_segment_string_requires_two_vertices() {
    assert!(SegmentString::new(vec![Vec2::new(0.0, 0.0)]).is_err());
}

/// Test the simple noder splits a clean crossing at its intersection.
#[test]
fn test_simple_noder_splits_crossing() {
    let input = vec![
        string(&[(0.0, 0.0), (2.0, 2.0)]),
        string(&[(0.0, 2.0), (2.0, 0.0)]),
    ];
    let noded = SimpleNoder::new().node(&input).unwrap();
    assert_eq!(noded.len(), 4);

    // All four pieces meet at the shared construction point.
    let meeting = Vec2::new(1.0, 1.0);
    let touching = noded
        .iter()
        .filter(|s| s.coords().contains(&meeting))
        .count();
    assert_eq!(touching, 4);
}

/// Test the simple noder splits at an endpoint resting on an interior.
#[test]
fn test_simple_noder_splits_at_touching_endpoint() {
    let input = vec![
        string(&[(0.0, 0.0), (4.0, 0.0)]),
        string(&[(2.0, 0.0), (2.0, 3.0)]),
    ];
    let noded = SimpleNoder::new().node(&input).unwrap();
    assert_eq!(noded.len(), 3);
}

/// Test non-intersecting input passes through unchanged.
#[test]
fn test_simple_noder_passthrough() {
    let input = vec![
        string(&[(0.0, 0.0), (1.0, 0.0)]),
        string(&[(0.0, 1.0), (1.0, 1.0)]),
    ];
    let noded = SimpleNoder::new().node(&input).unwrap();
    assert_eq!(noded.len(), 2);
}

/// Test chains are decomposed into individual segments.
#[test]
fn test_simple_noder_decomposes_chains() {
    let input = vec![string(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])];
    let noded = SimpleNoder::new().node(&input).unwrap();
    assert_eq!(noded.len(), 3);
    assert!(noded.iter().all(|s| s.coords().len() == 2));
}

/// Test snap rounding places every output vertex on the grid.
#[test]
fn test_snap_rounding_outputs_on_grid() {
    let model = PrecisionModel::fixed(10.0).unwrap();
    let noder = SnapRoundingNoder::new(model);
    let input = vec![
        string(&[(0.013, 0.0), (1.987, 2.004)]),
        string(&[(0.0, 2.001), (2.02, 0.0)]),
    ];
    let noded = noder.node(&input).unwrap();
    assert!(!noded.is_empty());
    for s in &noded {
        for p in s.coords() {
            assert_eq!(*p, model.make_precise(*p));
        }
    }
}

/// Test snap rounding drops segments that collapse on the grid.
#[test]
fn test_snap_rounding_drops_collapsed_segments() {
    let noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0).unwrap());
    let input = vec![string(&[(0.1, 0.1), (0.2, 0.2)])];
    let noded = noder.node(&input).unwrap();
    assert!(noded.is_empty());
}

/// Test the scaled noder restores original coordinate magnitudes.
#[test]
fn test_scaled_noder_round_trips_coordinates() {
    let noder = ScaledNoder::new(Box::new(SnapRoundingNoder::unit()), 1000.0).unwrap();
    let input = vec![string(&[(0.001, 0.002), (0.004, 0.002)])];
    let noded = noder.node(&input).unwrap();
    assert_eq!(noded.len(), 1);
    assert_eq!(noded[0].coords()[0], Vec2::new(0.001, 0.002));
    assert_eq!(noded[0].coords()[1], Vec2::new(0.004, 0.002));
}

/// Test the scaled noder resolves crossings below the unit grid.
#[test]
fn test_scaled_noder_resolves_fine_crossings() {
    let noder = ScaledNoder::new(Box::new(SnapRoundingNoder::unit()), 1000.0).unwrap();
    let input = vec![
        string(&[(0.0, 0.0), (0.004, 0.004)]),
        string(&[(0.0, 0.004), (0.004, 0.0)]),
    ];
    let noded = noder.node(&input).unwrap();
    assert_eq!(noded.len(), 4);
}

/// Test the scaled noder rejects invalid scales.
#[test]
fn test_scaled_noder_rejects_invalid_scale() {
    assert!(ScaledNoder::new(Box::new(SimpleNoder::new()), 0.0).is_err());
    assert!(ScaledNoder::new(Box::new(SimpleNoder::new()), f64::NAN).is_err());
}
