use serde::{Deserialize, Serialize};

use cropsight_core::{DomainError, DomainResult, PolarizationId, SatelliteId};

/// A satellite whose imagery the platform can analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub id: SatelliteId,
    pub name: String,
    pub description: Option<String>,
    /// Ground resolution in meters.
    pub resolution_m: Option<f64>,
}

impl Satellite {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        resolution_m: Option<f64>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("satellite name cannot be empty"));
        }
        if let Some(res) = resolution_m {
            if res <= 0.0 {
                return Err(DomainError::validation("resolution must be positive"));
            }
        }
        Ok(Self {
            id: SatelliteId::new(),
            name,
            description,
            resolution_m,
        })
    }
}

/// A polarization channel of a satellite (e.g. VV, VH).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polarization {
    pub id: PolarizationId,
    pub name: String,
    pub description: Option<String>,
    pub satellite_id: SatelliteId,
}

impl Polarization {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        satellite_id: SatelliteId,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("polarization name cannot be empty"));
        }
        Ok(Self {
            id: PolarizationId::new(),
            name,
            description,
            satellite_id,
        })
    }
}
