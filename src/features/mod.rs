//! Feature extraction layer (depends on core).
//!
//! # Pipeline
//!
//! For each ring of the compensated cloud:
//!
//! ```text
//! ring → reliability mask → curvature per region → sorted selection
//!      → {sharp, less-sharp} corners + {flat} surfaces
//!      → residual surface points → voxel filter → {less-flat}
//! ```

mod buffers;
mod config;
mod extractor;
mod voxel;

pub use buffers::{PointLabel, RegionBuffers, ScanBuffers};
pub use config::RegistrationConfig;
pub use extractor::{FeatureExtractor, FeatureSets};
pub use voxel::voxel_downsample;
