use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};

use catalog_core::{DomainResult, ProductId};
use catalog_products::{Product, ProductInput};

use crate::app::dto::{self, ProductRequest, ProductResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> DomainResult<ProductId> {
    raw.parse()
}

/// Decode and validate a request body. The service is never reached with
/// invalid input.
fn validated(
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Product, ApiError> {
    let Json(body) = body?;
    Ok(ProductInput::from(body).validate()?)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = validated(body)?;
    let created = services.products.create(product).await?;
    Ok((StatusCode::CREATED, Json(dto::product_to_json(&created))))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let items = services
        .products
        .list()
        .await?
        .iter()
        .map(dto::product_to_json)
        .collect();
    Ok(Json(items))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id)?;
    let product = services.products.get_by_id(id).await?;
    Ok(Json(dto::product_to_json(&product)))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id)?;
    let details = validated(body)?;
    let updated = services.products.update(id, details).await?;
    Ok(Json(dto::product_to_json(&updated)))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
