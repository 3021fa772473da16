use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Public product routes (no authentication required)
pub fn public_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/{id}", get(handlers::get_product))
        .with_state(service)
}

/// Admin product routes (bearer token + admin role)
pub fn admin_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", post(handlers::create_product))
        .route(
            "/api/products/{id}",
            patch(handlers::update_product).delete(handlers::delete_product),
        )
        .with_state(service)
}
