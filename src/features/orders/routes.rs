use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Order routes (all require a bearer token; the status patch additionally
/// requires the admin role)
pub fn routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route(
            "/api/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/api/orders/{id}", patch(handlers::update_order_status))
        .with_state(service)
}
