use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cropsight_core::{CalibrationId, CropId, DomainError, DomainResult, SatelliteId};

/// A calibration coefficient linking a crop to a satellite.
///
/// Both foreign keys are validated against the catalog at the API boundary
/// before a calibration is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub id: CalibrationId,
    pub crop_id: CropId,
    pub satellite_id: SatelliteId,
    pub coefficient: f64,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Calibration {
    pub fn new(
        crop_id: CropId,
        satellite_id: SatelliteId,
        coefficient: f64,
        confidence: Option<f64>,
    ) -> DomainResult<Self> {
        if !coefficient.is_finite() {
            return Err(DomainError::validation("coefficient must be finite"));
        }
        if let Some(c) = confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(DomainError::validation("confidence must be within 0..=1"));
            }
        }
        Ok(Self {
            id: CalibrationId::new(),
            crop_id,
            satellite_id,
            coefficient,
            confidence,
            created_at: Utc::now(),
        })
    }
}
