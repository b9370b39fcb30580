//! Feature extraction configuration.

use crate::error::{RegistrationError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for curvature-based feature extraction.
///
/// An invalid configuration never becomes active: [`validate`](Self::validate)
/// gates every update, and rejection keeps the previous values (see
/// [`ScanRegistration::set_config`](crate::engine::ScanRegistration::set_config)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Number of equally sized regions the interior of each ring is split
    /// into, to spread features across the scan. Must be >= 1.
    /// Default: 6
    pub feature_regions: usize,

    /// Half-width of the curvature neighborhood (+/- points around the
    /// evaluated one). Must be >= 1.
    /// Default: 5
    pub curvature_region: usize,

    /// Maximum sharp corner points per region. Must be >= 1.
    /// Default: 2
    pub max_corner_sharp: usize,

    /// Maximum less-sharp corner points per region, counting the sharp
    /// ones. Must be >= `max_corner_sharp`.
    /// Default: 10 × `max_corner_sharp`
    pub max_corner_less_sharp: usize,

    /// Maximum flat surface points per region. Must be >= 1.
    /// Default: 4
    pub max_surface_flat: usize,

    /// Curvature boundary between surface and corner candidates.
    /// Must be >= 0.001.
    /// Default: 0.1
    pub surface_curvature_threshold: f32,

    /// Voxel edge length for downsampling the less-flat surface points
    /// (meters). Must be >= 0.001.
    /// Default: 0.2
    pub less_flat_filter_size: f32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            feature_regions: 6,
            curvature_region: 5,
            max_corner_sharp: 2,
            max_corner_less_sharp: 20,
            max_surface_flat: 4,
            surface_curvature_threshold: 0.1,
            less_flat_filter_size: 0.2,
        }
    }
}

impl RegistrationConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the region count.
    pub fn with_feature_regions(mut self, regions: usize) -> Self {
        self.feature_regions = regions;
        self
    }

    /// Builder-style setter for the curvature half-width.
    pub fn with_curvature_region(mut self, half_width: usize) -> Self {
        self.curvature_region = half_width;
        self
    }

    /// Builder-style setter for the sharp corner cap.
    ///
    /// Also resets the less-sharp cap to 10× the new value, keeping the
    /// default ratio unless the caller sets it explicitly afterwards.
    pub fn with_max_corner_sharp(mut self, max: usize) -> Self {
        self.max_corner_sharp = max;
        self.max_corner_less_sharp = 10 * max;
        self
    }

    /// Builder-style setter for the less-sharp corner cap.
    pub fn with_max_corner_less_sharp(mut self, max: usize) -> Self {
        self.max_corner_less_sharp = max;
        self
    }

    /// Builder-style setter for the flat surface cap.
    pub fn with_max_surface_flat(mut self, max: usize) -> Self {
        self.max_surface_flat = max;
        self
    }

    /// Builder-style setter for the curvature threshold.
    pub fn with_surface_curvature_threshold(mut self, threshold: f32) -> Self {
        self.surface_curvature_threshold = threshold;
        self
    }

    /// Builder-style setter for the less-flat voxel size.
    pub fn with_less_flat_filter_size(mut self, size: f32) -> Self {
        self.less_flat_filter_size = size;
        self
    }

    /// Check every field against its allowed range.
    ///
    /// Returns the first violation found; the configuration itself is not
    /// modified either way.
    pub fn validate(&self) -> Result<()> {
        if self.feature_regions < 1 {
            return Err(RegistrationError::ConfigInvalid {
                field: "feature_regions",
                value: self.feature_regions as f64,
                constraint: ">= 1",
            });
        }
        if self.curvature_region < 1 {
            return Err(RegistrationError::ConfigInvalid {
                field: "curvature_region",
                value: self.curvature_region as f64,
                constraint: ">= 1",
            });
        }
        if self.max_corner_sharp < 1 {
            return Err(RegistrationError::ConfigInvalid {
                field: "max_corner_sharp",
                value: self.max_corner_sharp as f64,
                constraint: ">= 1",
            });
        }
        if self.max_corner_less_sharp < self.max_corner_sharp {
            return Err(RegistrationError::ConfigInvalid {
                field: "max_corner_less_sharp",
                value: self.max_corner_less_sharp as f64,
                constraint: ">= max_corner_sharp",
            });
        }
        if self.max_surface_flat < 1 {
            return Err(RegistrationError::ConfigInvalid {
                field: "max_surface_flat",
                value: self.max_surface_flat as f64,
                constraint: ">= 1",
            });
        }
        if self.surface_curvature_threshold < 0.001 {
            return Err(RegistrationError::ConfigInvalid {
                field: "surface_curvature_threshold",
                value: self.surface_curvature_threshold as f64,
                constraint: ">= 0.001",
            });
        }
        if self.less_flat_filter_size < 0.001 {
            return Err(RegistrationError::ConfigInvalid {
                field: "less_flat_filter_size",
                value: self.less_flat_filter_size as f64,
                constraint: ">= 0.001",
            });
        }
        Ok(())
    }

    /// Log the active values once, at registration start-up.
    pub fn log_summary(&self) {
        log::info!(
            "scan registration: {} regions, curvature +/-{}, caps {} sharp / {} less-sharp / {} flat, threshold {}, less-flat voxel {} m",
            self.feature_regions,
            self.curvature_region,
            self.max_corner_sharp,
            self.max_corner_less_sharp,
            self.max_surface_flat,
            self.surface_curvature_threshold,
            self.less_flat_filter_size
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RegistrationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_corner_less_sharp, 10 * config.max_corner_sharp);
    }

    #[test]
    fn test_sharp_cap_builder_keeps_ratio() {
        let config = RegistrationConfig::new().with_max_corner_sharp(3);
        assert_eq!(config.max_corner_sharp, 3);
        assert_eq!(config.max_corner_less_sharp, 30);
    }

    #[test]
    fn test_explicit_less_sharp_cap_overrides_ratio() {
        let config = RegistrationConfig::new()
            .with_max_corner_sharp(3)
            .with_max_corner_less_sharp(5);
        assert_eq!(config.max_corner_less_sharp, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_regions() {
        let config = RegistrationConfig::new().with_feature_regions(0);
        assert!(matches!(
            config.validate(),
            Err(RegistrationError::ConfigInvalid {
                field: "feature_regions",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_less_sharp_below_sharp() {
        let config = RegistrationConfig::new()
            .with_max_corner_sharp(4)
            .with_max_corner_less_sharp(2);
        assert!(matches!(
            config.validate(),
            Err(RegistrationError::ConfigInvalid {
                field: "max_corner_less_sharp",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_tiny_threshold() {
        let config = RegistrationConfig::new().with_surface_curvature_threshold(1e-5);
        assert!(config.validate().is_err());

        let config = RegistrationConfig::new().with_less_flat_filter_size(0.0);
        assert!(config.validate().is_err());
    }
}
