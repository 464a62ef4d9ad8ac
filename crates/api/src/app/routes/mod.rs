use axum::{Router, routing::get};

pub mod products;
pub mod system;

/// Router for every endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(products::router())
}
