//! Curvature-based feature extraction over per-ring point ranges.
//!
//! Walks each ring of a motion-compensated cloud, masks unreliable points
//! (occluded silhouettes, near-parallel beams, numerical glitches), splits
//! the ring interior into equal regions and selects a bounded set of corner
//! and surface features per region.

use crate::core::types::{LidarPoint, PointCloud3D};
use crate::features::buffers::{PointLabel, RegionBuffers, ScanBuffers};
use crate::features::config::RegistrationConfig;
use crate::features::voxel::voxel_downsample;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Squared gap between consecutive returns above which a depth jump is
/// suspected and the occlusion test runs.
const OCCLUSION_GAP_SQ: f32 = 0.1;

/// Occlusion ratio bound: ‖Δ_rescaled‖² / d_far² below this marks the far
/// side of the jump as a silhouette.
const OCCLUSION_RATIO: f32 = 0.1;

/// A beam is near-parallel to the surface when both adjacent squared gaps
/// exceed this fraction of the squared depth.
const PARALLEL_BEAM_RATIO: f32 = 0.0002;

/// Neighbor exclusion around a pick stops at squared gaps above this.
const EXCLUSION_CONTINUATION_GAP: f32 = 0.05;

/// Returns closer than this are sensor glitches.
const MIN_RANGE_SQ: f32 = 1e-6;

/// The four labeled feature clouds produced per sweep.
///
/// Sharp corners are a subset of the less-sharp set; flat surfaces are
/// selected raw while the less-flat set is voxel-downsampled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSets {
    /// Sharp corner points.
    pub corners_sharp: PointCloud3D,
    /// Less sharp corner points (includes the sharp ones).
    pub corners_less_sharp: PointCloud3D,
    /// Flat surface points.
    pub surfaces_flat: PointCloud3D,
    /// Less flat surface points, voxel-downsampled.
    pub surfaces_less_flat: PointCloud3D,
}

impl FeatureSets {
    /// Remove all points, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.corners_sharp.clear();
        self.corners_less_sharp.clear();
        self.surfaces_flat.clear();
        self.surfaces_less_flat.clear();
    }
}

/// Region-partitioned feature extractor.
///
/// Owns the per-ring and per-region scratch buffers so repeated sweeps
/// reuse their allocations.
#[derive(Debug, Default)]
pub struct FeatureExtractor {
    config: RegistrationConfig,
    region: RegionBuffers,
    scan: ScanBuffers,
}

impl FeatureExtractor {
    /// Create an extractor with the given configuration.
    ///
    /// The configuration is assumed validated by the caller.
    pub fn new(config: RegistrationConfig) -> Self {
        Self {
            config,
            region: RegionBuffers::default(),
            scan: ScanBuffers::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Replace the configuration. The caller validates first.
    pub fn set_config(&mut self, config: RegistrationConfig) {
        self.config = config;
    }

    /// Extract features from `cloud` over the given per-ring index ranges
    /// (half-open, in ring order), filling `out`.
    ///
    /// Rings too short to carry a full curvature neighborhood are skipped.
    pub fn extract(
        &mut self,
        cloud: &[LidarPoint],
        ring_ranges: &[(usize, usize)],
        out: &mut FeatureSets,
    ) {
        out.clear();
        let w = self.config.curvature_region;
        let regions = self.config.feature_regions;
        let mut less_flat_ring: Vec<LidarPoint> = Vec::new();

        for &(start, end) in ring_ranges {
            if end - start < 2 * w + 2 {
                continue;
            }

            self.mask_unreliable(cloud, start, end);
            less_flat_ring.clear();

            for j in 0..regions {
                // integer interpolation of the interior [start+w, end-1-w]
                // into equal spans; ep is inclusive
                let sp = ((start + w) * (regions - j) + (end - 1 - w) * j) / regions;
                let ep =
                    ((start + w) * (regions - 1 - j) + (end - 1 - w) * (j + 1)) / regions - 1;
                if ep <= sp {
                    continue;
                }
                let region_size = ep - sp + 1;

                self.prepare_region(cloud, sp, ep);

                // corners, scanning from the high-curvature end
                let mut picked_corners = 0;
                for k in (0..region_size).rev() {
                    if picked_corners >= self.config.max_corner_less_sharp {
                        break;
                    }
                    let idx = self.region.sort_indices[k];
                    let scan_idx = idx - start;
                    let region_idx = idx - sp;
                    // positive comparison so NaN curvature never qualifies
                    let selectable = !self.scan.picked[scan_idx]
                        && self.region.curvature[region_idx]
                            > self.config.surface_curvature_threshold;
                    if !selectable {
                        continue;
                    }

                    picked_corners += 1;
                    if picked_corners <= self.config.max_corner_sharp {
                        self.region.label[region_idx] = PointLabel::CornerSharp;
                        out.corners_sharp.push(cloud[idx]);
                    } else {
                        self.region.label[region_idx] = PointLabel::CornerLessSharp;
                    }
                    out.corners_less_sharp.push(cloud[idx]);
                    self.mark_picked(cloud, idx, start);
                }

                // flat surfaces, scanning from the low-curvature end
                let mut picked_flats = 0;
                for k in 0..region_size {
                    if picked_flats >= self.config.max_surface_flat {
                        break;
                    }
                    let idx = self.region.sort_indices[k];
                    let scan_idx = idx - start;
                    let region_idx = idx - sp;
                    let selectable = !self.scan.picked[scan_idx]
                        && self.region.curvature[region_idx]
                            < self.config.surface_curvature_threshold;
                    if !selectable {
                        continue;
                    }

                    picked_flats += 1;
                    self.region.label[region_idx] = PointLabel::SurfaceFlat;
                    out.surfaces_flat.push(cloud[idx]);
                    self.mark_picked(cloud, idx, start);
                }

                // surface-labeled points feed the less-flat residual unless
                // reliability masking ruled them out
                for region_idx in 0..region_size {
                    let idx = sp + region_idx;
                    if self.region.label[region_idx].is_surface()
                        && !self.scan.unreliable[idx - start]
                    {
                        less_flat_ring.push(cloud[idx]);
                    }
                }
            }

            out.surfaces_less_flat.extend(voxel_downsample(
                &less_flat_ring,
                self.config.less_flat_filter_size,
            ));
        }

        log::debug!(
            "extracted {} sharp / {} less-sharp corners, {} flat / {} less-flat surfaces",
            out.corners_sharp.len(),
            out.corners_less_sharp.len(),
            out.surfaces_flat.len(),
            out.surfaces_less_flat.len()
        );
    }

    /// Flag ring points that must never be selected: silhouette edges of
    /// occluding depth jumps, beams near-parallel to the surface, and
    /// numerically bad returns.
    fn mask_unreliable(&mut self, cloud: &[LidarPoint], start: usize, end: usize) {
        let w = self.config.curvature_region;
        self.scan.reset(end - start);

        for i in start..end {
            let p = &cloud[i];
            if !p.is_finite() || p.position.norm_squared() < MIN_RANGE_SQ {
                self.scan.mask(i - start);
            }
        }

        for i in (start + w)..(end - w - 1) {
            let prev = cloud[i - 1].position;
            let cur = cloud[i].position;
            let next = cloud[i + 1].position;

            let diff_next = cur.distance_squared(&next);
            if diff_next > OCCLUSION_GAP_SQ {
                let depth_cur = cur.norm();
                let depth_next = next.norm();

                if depth_cur > depth_next {
                    // current side is occluded; rescale it to the nearer
                    // depth and compare against the next return
                    let ratio = next.distance_squared_scaled(&cur, depth_next / depth_cur)
                        / (depth_cur * depth_cur);
                    if ratio < OCCLUSION_RATIO {
                        for j in (i - w)..=i {
                            self.scan.mask(j - start);
                        }
                        continue;
                    }
                } else {
                    let ratio = cur.distance_squared_scaled(&next, depth_cur / depth_next)
                        / (depth_next * depth_next);
                    if ratio < OCCLUSION_RATIO {
                        for j in (i + 1)..=(i + 1 + w) {
                            self.scan.mask(j - start);
                        }
                    }
                }
            }

            let diff_prev = cur.distance_squared(&prev);
            let depth_sq = cur.norm_squared();
            if diff_prev > PARALLEL_BEAM_RATIO * depth_sq
                && diff_next > PARALLEL_BEAM_RATIO * depth_sq
            {
                self.scan.mask(i - start);
            }
        }
    }

    /// Compute curvature, reset labels and sort the region by curvature.
    fn prepare_region(&mut self, cloud: &[LidarPoint], sp: usize, ep: usize) {
        let w = self.config.curvature_region;
        self.region.reset(ep - sp + 1);

        for i in sp..=ep {
            let mut diff = cloud[i].position * -(2.0 * w as f32);
            for k in 1..=w {
                diff += cloud[i + k].position + cloud[i - k].position;
            }
            self.region.curvature[i - sp] = diff.norm_squared();
        }

        let RegionBuffers {
            curvature,
            sort_indices,
            ..
        } = &mut self.region;
        sort_indices.extend(sp..=ep);
        sort_indices.sort_by(|&a, &b| {
            curvature[a - sp]
                .partial_cmp(&curvature[b - sp])
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Mark a pick and its close neighbors as consumed. The exclusion runs
    /// up to the curvature half-width on each side and stops at the first
    /// large gap, so points across a discontinuity stay available.
    fn mark_picked(&mut self, cloud: &[LidarPoint], idx: usize, start: usize) {
        self.scan.picked[idx - start] = true;
        let w = self.config.curvature_region;

        for k in 1..=w {
            if cloud[idx + k]
                .position
                .distance_squared(&cloud[idx + k - 1].position)
                > EXCLUSION_CONTINUATION_GAP
            {
                break;
            }
            self.scan.picked[idx + k - start] = true;
        }
        for k in 1..=w {
            if cloud[idx - k]
                .position
                .distance_squared(&cloud[idx - k + 1].position)
                > EXCLUSION_CONTINUATION_GAP
            {
                break;
            }
            self.scan.picked[idx - k - start] = true;
        }
    }
}
