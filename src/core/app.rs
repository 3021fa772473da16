use std::sync::Arc;

use axum::{routing::get, Router};

use crate::core::config::AuthConfig;
use crate::core::middleware;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::{AuthService, TokenService};
use crate::features::auth::JwtValidator;
use crate::features::cart::{routes as cart_routes, CartService};
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::orders::{routes as orders_routes, OrderService};
use crate::features::products::{routes as products_routes, ProductService};
use crate::storage::Store;

/// Services wired to a store, shared by the router and the startup code
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub cart: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub validator: Arc<JwtValidator>,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>, auth_config: &AuthConfig) -> Self {
        let tokens = TokenService::new(auth_config);
        Self {
            auth: Arc::new(AuthService::new(Arc::clone(&store), tokens.clone())),
            categories: Arc::new(CategoryService::new(Arc::clone(&store))),
            products: Arc::new(ProductService::new(Arc::clone(&store))),
            cart: Arc::new(CartService::new(Arc::clone(&store))),
            orders: Arc::new(OrderService::new(Arc::clone(&store))),
            validator: Arc::new(JwtValidator::new(tokens, store)),
        }
    }
}

/// Build the API router.
///
/// Public and protected routers are merged per path: the bearer-token
/// middleware wraps only the protected method routers, so e.g.
/// `GET /api/products` stays public while `POST /api/products` requires an
/// admin. Authentication always runs before the admin guard, which runs
/// before body validation.
pub fn build_app(services: &AppServices) -> Router {
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(categories_routes::admin_routes(Arc::clone(
            &services.categories,
        )))
        .merge(products_routes::admin_routes(Arc::clone(&services.products)))
        .merge(cart_routes::routes(Arc::clone(&services.cart)))
        .merge(orders_routes::routes(Arc::clone(&services.orders)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.validator),
            middleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .merge(categories_routes::public_routes(Arc::clone(
            &services.categories,
        )))
        .merge(products_routes::public_routes(Arc::clone(
            &services.products,
        )))
        .route("/health", get(health_check));

    Router::new().merge(protected_routes).merge(public_routes)
}

/// Simple health check endpoint (no auth required)
async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}
