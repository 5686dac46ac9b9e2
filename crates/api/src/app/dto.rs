use chrono::NaiveDate;
use serde::Deserialize;

use cropsight_auth::UserAccount;
use cropsight_catalog::{Polarization, Satellite};
use cropsight_core::{CategoryId, CropId, DataProductId, SatelliteId, TrainingDatasetId};
use cropsight_jobs::AnalysisRequest;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCropRequest {
    pub name: String,
    pub description: Option<String>,
    pub growth_period_days: Option<u32>,
    pub water_requirements: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSatelliteRequest {
    pub name: String,
    pub description: Option<String>,
    pub resolution_m: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePolarizationRequest {
    pub name: String,
    pub description: Option<String>,
    pub satellite_id: SatelliteId,
}

#[derive(Debug, Deserialize)]
pub struct CreateCalibrationRequest {
    pub crop_id: CropId,
    pub satellite_id: SatelliteId,
    pub coefficient: f64,
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaskNoiseRequest {
    pub name: String,
    pub description: Option<String>,
    pub mask_type: String,
    pub noise_level: f64,
}

#[derive(Debug, Deserialize)]
pub struct PolarizationFilter {
    pub satellite_id: Option<SatelliteId>,
}

#[derive(Debug, Deserialize)]
pub struct CalibrationFilter {
    pub crop_id: Option<CropId>,
    pub satellite_id: Option<SatelliteId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDataProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttachFileRequest {
    pub path: String,
    pub file_type: Option<String>,
    pub size_bytes: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
}

#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrainingDatasetRequest {
    pub data_path: Option<String>,
    pub data_type: String,
    pub validation_split: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LaunchTrainingRequest {
    pub training_dataset_id: TrainingDatasetId,
    pub model_type: String,
    #[serde(default)]
    pub hyperparameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct LaunchAnalysisRequest {
    pub data_product_id: DataProductId,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub crop_type: Option<String>,
    pub request: Option<AnalysisRequest>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(account: &UserAccount) -> serde_json::Value {
    serde_json::json!({
        "id": account.id.to_string(),
        "username": account.username,
        "email": account.email,
        "phone_number": account.phone_number,
        "is_premium": account.is_premium,
        "is_active": account.is_active,
        "created_at": account.created_at.to_rfc3339(),
    })
}

pub fn satellite_detail_to_json(
    satellite: &Satellite,
    polarizations: &[Polarization],
) -> serde_json::Value {
    serde_json::json!({
        "id": satellite.id.to_string(),
        "name": satellite.name,
        "description": satellite.description,
        "resolution_m": satellite.resolution_m,
        "polarizations": polarizations,
    })
}
