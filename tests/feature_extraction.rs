//! Feature Extraction Scenario Tests
//!
//! Synthetic single-ring geometries exercising the classifier end to end:
//! - Flat ground produces surfaces only, bounded per region
//! - A depth jump produces a corner on the near side and masks the far side
//! - A grazing beam produces nothing
//! - Monotone curvature spreads corners across regions
//!
//! Run with: `cargo test --test feature_extraction`

use parikrama_loam::{LidarPoint, RegistrationConfig, ScanRegistration, Sweep};

// ============================================================================
// Fixtures
// ============================================================================

/// Uniformly spaced straight line on the z = -1 plane, one ring.
fn planar_ground_sweep(n: usize) -> Sweep {
    let points = (0..n)
        .map(|i| LidarPoint::new(i as f32 * 0.01 - 2.0, 3.0, -1.0, 0.0))
        .collect();
    Sweep::new(points, 1, 0.1)
}

/// Two half-rings at 2 m and 10 m meeting at index `n / 2`.
fn depth_jump_sweep(n: usize) -> Sweep {
    let points = (0..n)
        .map(|i| {
            let theta = i as f32 * 0.001;
            let r = if i < n / 2 { 2.0 } else { 10.0 };
            LidarPoint::new(r * theta.cos(), r * theta.sin(), 0.0, 0.0)
        })
        .collect();
    Sweep::new(points, 1, 0.1)
}

/// Returns marching away along one ray: every gap grows with depth, so the
/// beam grazes the surface everywhere.
fn grazing_beam_sweep(n: usize) -> Sweep {
    let mut depth = 2.0f32;
    let points = (0..n)
        .map(|_| {
            let p = LidarPoint::new(depth, 0.0, 0.0, 0.0);
            depth *= 1.02;
            p
        })
        .collect();
    Sweep::new(points, 1, 0.1)
}

fn process(sweep: &Sweep, config: RegistrationConfig) -> ScanRegistration {
    let mut registration = ScanRegistration::new(config).unwrap();
    registration.process_sweep(sweep, 0.0).unwrap();
    registration
}

// ============================================================================
// Scenario: static planar ground
// ============================================================================

#[test]
fn planar_ground_yields_bounded_flat_surfaces_only() {
    let sweep = planar_ground_sweep(400);
    let config = RegistrationConfig::default();
    let expected_flats = config.feature_regions * config.max_surface_flat;
    let registration = process(&sweep, config);
    let outputs = registration.outputs();

    assert!(outputs.corners_sharp.is_empty());
    assert!(outputs.corners_less_sharp.is_empty());
    assert_eq!(outputs.surfaces_flat.len(), expected_flats);
    assert!(!outputs.surfaces_less_flat.is_empty());
}

#[test]
fn planar_ground_outputs_stay_in_plane() {
    let sweep = planar_ground_sweep(400);
    let registration = process(&sweep, RegistrationConfig::default());
    let outputs = registration.outputs();

    for p in outputs
        .full_cloud
        .iter()
        .chain(outputs.surfaces_flat.iter())
        .chain(outputs.surfaces_less_flat.iter())
    {
        assert!((p.position.z - -1.0).abs() < 1e-6, "left the plane: {:?}", p);
    }
}

#[test]
fn flat_region_caps_hold_per_region() {
    // 6 regions × 4 flats: re-run with a tighter cap and check it binds
    let sweep = planar_ground_sweep(400);
    let config = RegistrationConfig::default()
        .with_feature_regions(3)
        .with_max_surface_flat(2);
    let registration = process(&sweep, config);

    assert_eq!(registration.outputs().surfaces_flat.len(), 3 * 2);
}

// ============================================================================
// Scenario: sharp vertical edge with occlusion
// ============================================================================

#[test]
fn depth_jump_corner_comes_from_the_near_side() {
    let sweep = depth_jump_sweep(400);
    let registration = process(&sweep, RegistrationConfig::default());
    let outputs = registration.outputs();

    assert!(
        !outputs.corners_sharp.is_empty(),
        "no sharp corner at the silhouette"
    );
    // the far side of the jump is occluded; every corner must come from
    // the 2 m half-ring
    for p in outputs.corners_sharp.iter().chain(outputs.corners_less_sharp.iter()) {
        assert!(
            p.position.norm() < 3.0,
            "corner selected on the occluded far side: {:?}",
            p
        );
    }
}

#[test]
fn sharp_corners_are_a_subset_of_less_sharp() {
    let sweep = depth_jump_sweep(400);
    let registration = process(&sweep, RegistrationConfig::default());
    let outputs = registration.outputs();

    for sharp in outputs.corners_sharp.iter() {
        assert!(
            outputs.corners_less_sharp.iter().any(|p| p == sharp),
            "sharp corner missing from the less-sharp set: {:?}",
            sharp
        );
    }
}

#[test]
fn corners_and_surfaces_are_disjoint() {
    let sweep = depth_jump_sweep(400);
    let registration = process(&sweep, RegistrationConfig::default());
    let outputs = registration.outputs();

    for corner in outputs.corners_less_sharp.iter() {
        assert!(
            !outputs.surfaces_flat.iter().any(|p| p == corner),
            "point classified as both corner and surface: {:?}",
            corner
        );
    }
}

// ============================================================================
// Scenario: near-parallel beam
// ============================================================================

#[test]
fn grazing_beam_emits_no_features() {
    let sweep = grazing_beam_sweep(200);
    let registration = process(&sweep, RegistrationConfig::default());
    let outputs = registration.outputs();

    assert!(outputs.corners_sharp.is_empty());
    assert!(outputs.corners_less_sharp.is_empty());
    assert!(outputs.surfaces_flat.is_empty());
    assert!(outputs.surfaces_less_flat.is_empty());
    // the compensated cloud itself is untouched by masking
    assert_eq!(outputs.full_cloud.len(), 200);
}

// ============================================================================
// Scenario: region balance under monotone curvature
// ============================================================================

#[test]
fn monotone_curvature_spreads_one_sharp_corner_per_region() {
    // zig-zag with linearly growing amplitude: curvature increases
    // strictly along the ring, so each region's pick sits at its top end
    let n = 400;
    let points: Vec<LidarPoint> = (0..n)
        .map(|i| {
            let amplitude = 0.03 + 0.0002 * i as f32;
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            LidarPoint::new(50.0 + i as f32 * 0.05, amplitude * sign, 0.0, 0.0)
        })
        .collect();
    let sweep = Sweep::new(points, 1, 0.1);

    let config = RegistrationConfig::default()
        .with_feature_regions(4)
        .with_max_corner_sharp(1);
    let registration = process(&sweep, config);
    let outputs = registration.outputs();

    assert_eq!(outputs.corners_sharp.len(), 4);

    // recover ring indices from x and check one pick per quarter, each
    // from the high-curvature (high-index) end of its region
    let mut indices: Vec<usize> = outputs
        .corners_sharp
        .iter()
        .map(|p| ((p.position.x - 50.0) / 0.05).round() as usize)
        .collect();
    indices.sort_unstable();

    let windows = [(50, 102), (150, 199), (247, 296), (344, 394)];
    for (idx, (lo, hi)) in indices.iter().zip(windows) {
        assert!(
            (lo..=hi).contains(idx),
            "pick at index {} not in the upper end {}..={} of its region",
            idx,
            lo,
            hi
        );
    }
}

// ============================================================================
// Invariant: flat and less-flat outputs are disjoint
// ============================================================================

#[test]
fn flat_outputs_are_disjoint_from_downsampled_less_flat() {
    // clustered spacing keeps several points per voxel, so every less-flat
    // representative is a centroid that coincides with no raw point
    let n = 200;
    let points: Vec<LidarPoint> = (0..n)
        .map(|i| {
            let offset = if i % 2 == 1 { 0.005 } else { 0.0 };
            LidarPoint::new(i as f32 * 0.02 + offset - 2.0, 4.0, -1.0, 0.0)
        })
        .collect();
    let sweep = Sweep::new(points, 1, 0.1);
    let registration = process(&sweep, RegistrationConfig::default());
    let outputs = registration.outputs();

    assert!(!outputs.surfaces_flat.is_empty());
    assert!(!outputs.surfaces_less_flat.is_empty());
    for flat in outputs.surfaces_flat.iter() {
        assert!(
            !outputs
                .surfaces_less_flat
                .iter()
                .any(|p| p.position == flat.position),
            "flat point also present in the less-flat output: {:?}",
            flat
        );
    }
}
