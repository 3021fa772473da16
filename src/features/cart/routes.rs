use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::cart::handlers;
use crate::features::cart::services::CartService;

/// Cart routes (all require a bearer token; rows are scoped to the caller)
pub fn routes(service: Arc<CartService>) -> Router {
    Router::new()
        .route(
            "/api/cart",
            get(handlers::list_cart)
                .post(handlers::add_to_cart)
                .delete(handlers::clear_cart),
        )
        .route(
            "/api/cart/{id}",
            patch(handlers::update_cart_item).delete(handlers::remove_cart_item),
        )
        .with_state(service)
}
