use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use cropsight_auth::assert_owns;
use cropsight_core::DataProductId;
use cropsight_datasets::{Category, DataProduct, DataProductPatch, Product, TrainingDataset};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route(
            "/data-products",
            post(create_data_product).get(list_data_products),
        )
        .route(
            "/data-products/categories",
            post(create_category).get(list_categories),
        )
        .route(
            "/data-products/products",
            post(create_product).get(list_products),
        )
        .route(
            "/data-products/:id",
            get(get_data_product)
                .put(update_data_product)
                .delete(delete_data_product),
        )
        .route("/data-products/:id/file", post(attach_file))
        .route(
            "/training-datasets",
            post(create_training_dataset).get(list_training_datasets),
        )
}

pub async fn create_data_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateDataProductRequest>,
) -> axum::response::Response {
    let product = match DataProduct::new(user.user_id(), body.name, body.description, body.file_type)
    {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    services.datasets.insert_data_product(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

pub async fn list_data_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": services.datasets.list_data_products(user.user_id())
        })),
    )
        .into_response()
}

pub async fn get_data_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: DataProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid data product id",
            );
        }
    };
    match services.datasets.get_data_product(product_id) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_data_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(patch): Json<DataProductPatch>,
) -> axum::response::Response {
    let product_id: DataProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid data product id",
            );
        }
    };

    let mut product = match services.datasets.get_data_product(product_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = assert_owns(&product, user.user_id()) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = product.apply(patch) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.datasets.update_data_product(&product) {
        return errors::domain_error_to_response(e);
    }

    (StatusCode::OK, Json(product)).into_response()
}

pub async fn delete_data_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: DataProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid data product id",
            );
        }
    };

    let product = match services.datasets.get_data_product(product_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = assert_owns(&product, user.user_id()) {
        return errors::domain_error_to_response(e);
    }
    match services.datasets.remove_data_product(product_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /data-products/:id/file: register the backing file's location.
///
/// Byte transfer happens out of band; this records where the file landed so
/// analysis jobs can reference it.
pub async fn attach_file(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::AttachFileRequest>,
) -> axum::response::Response {
    let product_id: DataProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid data product id",
            );
        }
    };

    let mut product = match services.datasets.get_data_product(product_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = assert_owns(&product, user.user_id()) {
        return errors::domain_error_to_response(e);
    }

    product.attach_file(body.path, body.file_type, body.size_bytes);
    if let Err(e) = services.datasets.update_data_product(&product) {
        return errors::domain_error_to_response(e);
    }

    (StatusCode::OK, Json(product)).into_response()
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    let category = match Category::new(body.name, body.description) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    services.datasets.insert_category(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": services.datasets.list_categories() })),
    )
        .into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let product = match Product::new(body.name, body.description, body.category_id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.datasets.insert_product(product.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::CREATED, Json(product)).into_response()
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<dto::ProductFilter>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": services.datasets.list_products(filter.category_id)
        })),
    )
        .into_response()
}

pub async fn create_training_dataset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateTrainingDatasetRequest>,
) -> axum::response::Response {
    let dataset = match TrainingDataset::new(
        user.user_id(),
        body.data_path,
        body.data_type,
        body.validation_split,
    ) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };
    services.datasets.insert_training_dataset(dataset.clone());
    (StatusCode::CREATED, Json(dataset)).into_response()
}

pub async fn list_training_datasets(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": services.datasets.list_training_datasets(user.user_id())
        })),
    )
        .into_response()
}
