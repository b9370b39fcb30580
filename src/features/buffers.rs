//! Reusable scratch buffers for feature extraction.

use serde::{Deserialize, Serialize};

/// Geometric class assigned to a ring point.
///
/// Discriminants match the legacy wire values consumed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum PointLabel {
    /// Sharp corner point.
    CornerSharp = 2,
    /// Less sharp corner point.
    CornerLessSharp = 1,
    /// Less flat surface point (the default class).
    #[default]
    SurfaceLessFlat = 0,
    /// Flat surface point.
    SurfaceFlat = -1,
}

impl PointLabel {
    /// True for the two surface classes.
    #[inline]
    pub fn is_surface(self) -> bool {
        matches!(self, PointLabel::SurfaceLessFlat | PointLabel::SurfaceFlat)
    }

    /// True for the two corner classes.
    #[inline]
    pub fn is_corner(self) -> bool {
        matches!(self, PointLabel::CornerSharp | PointLabel::CornerLessSharp)
    }
}

/// Per-region scratch: curvature, labels and the curvature-sorted index
/// permutation. Reused across regions to avoid reallocation.
#[derive(Debug, Default)]
pub struct RegionBuffers {
    /// Squared magnitude of the discrete Laplacian per region point.
    pub curvature: Vec<f32>,
    /// Label per region point, reset to `SurfaceLessFlat`.
    pub label: Vec<PointLabel>,
    /// Absolute cloud indices of the region, sorted by ascending curvature
    /// (ties keep index order).
    pub sort_indices: Vec<usize>,
}

impl RegionBuffers {
    /// Clear and resize for a region of `size` points.
    pub fn reset(&mut self, size: usize) {
        self.curvature.clear();
        self.curvature.resize(size, 0.0);
        self.label.clear();
        self.label.resize(size, PointLabel::SurfaceLessFlat);
        self.sort_indices.clear();
    }
}

/// Per-ring scratch: the selection and reliability masks.
///
/// `picked` bars a point from selection (already picked, neighbor of a
/// pick, or unreliable). `unreliable` is the subset set by reliability
/// masking alone (occluded silhouettes, near-parallel beams, numerical
/// glitches); those points are also withheld from the less-flat residual,
/// while mere neighbors of picks still contribute to it.
#[derive(Debug, Default)]
pub struct ScanBuffers {
    /// Selection mask, one flag per ring point.
    pub picked: Vec<bool>,
    /// Reliability mask, one flag per ring point.
    pub unreliable: Vec<bool>,
}

impl ScanBuffers {
    /// Clear and resize for a ring of `size` points.
    pub fn reset(&mut self, size: usize) {
        self.picked.clear();
        self.picked.resize(size, false);
        self.unreliable.clear();
        self.unreliable.resize(size, false);
    }

    /// Flag a point as unreliable (and therefore unpickable).
    #[inline]
    pub fn mask(&mut self, i: usize) {
        self.picked[i] = true;
        self.unreliable[i] = true;
    }
}
