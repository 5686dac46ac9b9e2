//! `cropsight-catalog` — reference entities for remote-sensing analysis.
//!
//! These are shared lookup tables (not user-owned): crops, satellites and
//! their polarization channels, crop/satellite calibrations, and mask-noise
//! profiles.

pub mod calibration;
pub mod crop;
pub mod mask_noise;
pub mod satellite;

pub use calibration::Calibration;
pub use crop::Crop;
pub use mask_noise::MaskNoise;
pub use satellite::{Polarization, Satellite};
