use cropsight_catalog::{Calibration, Crop, MaskNoise, Polarization, Satellite};
use cropsight_core::{
    CalibrationId, CropId, DomainError, DomainResult, MaskNoiseId, PolarizationId, SatelliteId,
};

use crate::memory::Table;

/// Reference-data storage: crops, satellites, polarizations, calibrations,
/// mask-noise profiles.
#[derive(Debug, Default)]
pub struct CatalogRepo {
    crops: Table<CropId, Crop>,
    satellites: Table<SatelliteId, Satellite>,
    polarizations: Table<PolarizationId, Polarization>,
    calibrations: Table<CalibrationId, Calibration>,
    mask_noise: Table<MaskNoiseId, MaskNoise>,
}

impl CatalogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    // Crops

    pub fn insert_crop(&self, crop: Crop) {
        self.crops.insert(crop.id, crop);
    }

    pub fn get_crop(&self, id: CropId) -> DomainResult<Crop> {
        self.crops.get(&id).ok_or(DomainError::NotFound("crop"))
    }

    pub fn crop_exists(&self, id: CropId) -> bool {
        self.crops.contains(&id)
    }

    pub fn list_crops(&self) -> Vec<Crop> {
        let mut crops = self.crops.all();
        crops.sort_by(|a, b| a.name.cmp(&b.name));
        crops
    }

    // Satellites

    pub fn insert_satellite(&self, satellite: Satellite) {
        self.satellites.insert(satellite.id, satellite);
    }

    pub fn get_satellite(&self, id: SatelliteId) -> DomainResult<Satellite> {
        self.satellites
            .get(&id)
            .ok_or(DomainError::NotFound("satellite"))
    }

    pub fn satellite_exists(&self, id: SatelliteId) -> bool {
        self.satellites.contains(&id)
    }

    pub fn list_satellites(&self) -> Vec<Satellite> {
        let mut satellites = self.satellites.all();
        satellites.sort_by(|a, b| a.name.cmp(&b.name));
        satellites
    }

    // Polarizations

    /// Store a polarization; the satellite must exist.
    pub fn insert_polarization(&self, polarization: Polarization) -> DomainResult<()> {
        if !self.satellite_exists(polarization.satellite_id) {
            return Err(DomainError::NotFound("satellite"));
        }
        self.polarizations.insert(polarization.id, polarization);
        Ok(())
    }

    pub fn list_polarizations(&self, satellite_id: Option<SatelliteId>) -> Vec<Polarization> {
        let mut rows = self
            .polarizations
            .filtered(|p| satellite_id.is_none_or(|s| p.satellite_id == s));
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    // Calibrations

    /// Store a calibration; both the crop and the satellite must exist.
    pub fn insert_calibration(&self, calibration: Calibration) -> DomainResult<()> {
        if !self.crop_exists(calibration.crop_id) {
            return Err(DomainError::NotFound("crop"));
        }
        if !self.satellite_exists(calibration.satellite_id) {
            return Err(DomainError::NotFound("satellite"));
        }
        self.calibrations.insert(calibration.id, calibration);
        Ok(())
    }

    pub fn list_calibrations(
        &self,
        crop_id: Option<CropId>,
        satellite_id: Option<SatelliteId>,
    ) -> Vec<Calibration> {
        let mut rows = self.calibrations.filtered(|c| {
            crop_id.is_none_or(|id| c.crop_id == id)
                && satellite_id.is_none_or(|id| c.satellite_id == id)
        });
        rows.sort_by_key(|c| c.created_at);
        rows
    }

    // Mask noise

    pub fn insert_mask_noise(&self, mask_noise: MaskNoise) {
        self.mask_noise.insert(mask_noise.id, mask_noise);
    }

    pub fn list_mask_noise(&self) -> Vec<MaskNoise> {
        let mut rows = self.mask_noise.all();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }
}
