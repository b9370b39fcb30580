//! Voxel-grid downsampling for the less-flat surface set.

use crate::core::types::{LidarPoint, Vec3};
use std::collections::HashMap;

struct VoxelAccum {
    sum: Vec3,
    count: u32,
    channel: f32,
}

/// Reduce point density to one centroid per occupied voxel.
///
/// Space is divided into cubes of edge `leaf`; every occupied cube is
/// replaced by the centroid of its points. The representative keeps the
/// channel of the first point seen in the cube, and cubes are emitted in
/// first-occupancy order, so the result is deterministic for a given input
/// order. A non-positive `leaf` copies the input unchanged.
pub fn voxel_downsample(points: &[LidarPoint], leaf: f32) -> Vec<LidarPoint> {
    if points.is_empty() || leaf <= 0.0 {
        return points.to_vec();
    }

    let inv_leaf = 1.0 / leaf;
    let mut cells: HashMap<(i32, i32, i32), VoxelAccum> = HashMap::with_capacity(points.len());
    let mut order: Vec<(i32, i32, i32)> = Vec::with_capacity(points.len());

    for p in points {
        let key = (
            (p.position.x * inv_leaf).floor() as i32,
            (p.position.y * inv_leaf).floor() as i32,
            (p.position.z * inv_leaf).floor() as i32,
        );
        match cells.get_mut(&key) {
            Some(accum) => {
                accum.sum += p.position;
                accum.count += 1;
            }
            None => {
                cells.insert(
                    key,
                    VoxelAccum {
                        sum: p.position,
                        count: 1,
                        channel: p.channel,
                    },
                );
                order.push(key);
            }
        }
    }

    order
        .into_iter()
        .map(|key| {
            let accum = &cells[&key];
            LidarPoint::from_position(accum.sum * (1.0 / accum.count as f32), accum.channel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_input() {
        assert!(voxel_downsample(&[], 0.2).is_empty());
    }

    #[test]
    fn test_non_positive_leaf_copies_input() {
        let points = vec![LidarPoint::new(1.0, 2.0, 3.0, 0.0)];
        assert_eq!(voxel_downsample(&points, 0.0), points);
        assert_eq!(voxel_downsample(&points, -1.0), points);
    }

    #[test]
    fn test_same_cell_collapses_to_centroid() {
        let points = vec![
            LidarPoint::new(0.01, 0.01, 0.01, 3.0),
            LidarPoint::new(0.05, 0.01, 0.01, 4.0),
            LidarPoint::new(0.09, 0.01, 0.01, 5.0),
        ];
        let result = voxel_downsample(&points, 0.2);

        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].position.x, 0.05, epsilon = 1e-6);
        assert_relative_eq!(result[0].position.y, 0.01, epsilon = 1e-6);
        // channel comes from the first point in the cell
        assert_relative_eq!(result[0].channel, 3.0);
    }

    #[test]
    fn test_distinct_cells_are_preserved() {
        let points = vec![
            LidarPoint::new(0.05, 0.0, 0.0, 0.0),
            LidarPoint::new(1.05, 0.0, 0.0, 0.0),
            LidarPoint::new(-0.95, 0.0, 0.0, 0.0),
        ];
        let result = voxel_downsample(&points, 0.2);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_multi_point_cell_centroid_is_not_a_member() {
        // Two points per cell, asymmetric offsets: the centroid can never
        // coincide with an input point.
        let points = vec![
            LidarPoint::new(0.02, 0.0, 0.0, 0.0),
            LidarPoint::new(0.08, 0.0, 0.0, 0.0),
        ];
        let result = voxel_downsample(&points, 0.2);
        assert_eq!(result.len(), 1);
        for p in &points {
            assert!(result[0].position != p.position);
        }
    }

    #[test]
    fn test_deterministic_order() {
        let points = vec![
            LidarPoint::new(2.05, 0.0, 0.0, 0.0),
            LidarPoint::new(0.05, 0.0, 0.0, 0.0),
            LidarPoint::new(2.07, 0.0, 0.0, 0.0),
            LidarPoint::new(1.05, 0.0, 0.0, 0.0),
        ];
        let a = voxel_downsample(&points, 0.2);
        let b = voxel_downsample(&points, 0.2);
        assert_eq!(a, b);
        // first-occupancy order: cell of 2.05 first, then 0.05, then 1.05
        assert!(a[0].position.x > 2.0);
        assert!(a[1].position.x < 1.0);
    }
}
