use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use cropsight_catalog::{Calibration, Crop, MaskNoise, Polarization, Satellite};
use cropsight_core::{CropId, SatelliteId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/crops", post(create_crop).get(list_crops))
        .route("/crops/:id", get(get_crop))
        .route("/satellites", post(create_satellite).get(list_satellites))
        .route("/satellites/:id", get(get_satellite))
        .route(
            "/polarizations",
            post(create_polarization).get(list_polarizations),
        )
        .route(
            "/calibrations",
            post(create_calibration).get(list_calibrations),
        )
        .route("/mask-noise", post(create_mask_noise).get(list_mask_noise))
}

pub async fn create_crop(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCropRequest>,
) -> axum::response::Response {
    let crop = match Crop::new(
        body.name,
        body.description,
        body.growth_period_days,
        body.water_requirements,
    ) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    services.catalog.insert_crop(crop.clone());
    (StatusCode::CREATED, Json(crop)).into_response()
}

pub async fn list_crops(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": services.catalog.list_crops() })),
    )
        .into_response()
}

pub async fn get_crop(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let crop_id: CropId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid crop id"),
    };
    match services.catalog.get_crop(crop_id) {
        Ok(crop) => (StatusCode::OK, Json(crop)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_satellite(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateSatelliteRequest>,
) -> axum::response::Response {
    let satellite = match Satellite::new(body.name, body.description, body.resolution_m) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };
    services.catalog.insert_satellite(satellite.clone());
    (StatusCode::CREATED, Json(satellite)).into_response()
}

pub async fn list_satellites(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": services.catalog.list_satellites() })),
    )
        .into_response()
}

/// GET /catalog/satellites/:id: satellite with its polarizations.
pub async fn get_satellite(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let satellite_id: SatelliteId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid satellite id");
        }
    };
    match services.catalog.get_satellite(satellite_id) {
        Ok(satellite) => {
            let polarizations = services.catalog.list_polarizations(Some(satellite_id));
            (
                StatusCode::OK,
                Json(dto::satellite_detail_to_json(&satellite, &polarizations)),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_polarization(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreatePolarizationRequest>,
) -> axum::response::Response {
    let polarization = match Polarization::new(body.name, body.description, body.satellite_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.catalog.insert_polarization(polarization.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::CREATED, Json(polarization)).into_response()
}

pub async fn list_polarizations(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<dto::PolarizationFilter>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": services.catalog.list_polarizations(filter.satellite_id)
        })),
    )
        .into_response()
}

pub async fn create_calibration(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCalibrationRequest>,
) -> axum::response::Response {
    let calibration = match Calibration::new(
        body.crop_id,
        body.satellite_id,
        body.coefficient,
        body.confidence,
    ) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.catalog.insert_calibration(calibration.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::CREATED, Json(calibration)).into_response()
}

pub async fn list_calibrations(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<dto::CalibrationFilter>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": services
                .catalog
                .list_calibrations(filter.crop_id, filter.satellite_id)
        })),
    )
        .into_response()
}

pub async fn create_mask_noise(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateMaskNoiseRequest>,
) -> axum::response::Response {
    let mask_noise = match MaskNoise::new(
        body.name,
        body.description,
        body.mask_type,
        body.noise_level,
    ) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };
    services.catalog.insert_mask_noise(mask_noise.clone());
    (StatusCode::CREATED, Json(mask_noise)).into_response()
}

pub async fn list_mask_noise(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": services.catalog.list_mask_noise() })),
    )
        .into_response()
}
