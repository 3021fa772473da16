#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use rust_decimal::Decimal;
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::config::AuthConfig;
#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::auth::models::User;
#[cfg(test)]
use crate::features::auth::services::TokenService;
#[cfg(test)]
use crate::features::categories::models::Category;
#[cfg(test)]
use crate::features::products::models::Product;
#[cfg(test)]
use crate::storage::{MemStore, NewCategory, NewProduct, NewUser, Store};

#[cfg(test)]
pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemStore::new())
}

#[cfg(test)]
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-that-is-long-enough!".to_string(),
        token_ttl: std::time::Duration::from_secs(3600),
        admin_username: None,
        admin_email: None,
        admin_password: None,
    }
}

#[cfg(test)]
pub fn test_token_service() -> TokenService {
    TokenService::new(&test_auth_config())
}

#[cfg(test)]
pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

#[cfg(test)]
pub async fn seed_user(store: &Arc<dyn Store>, username: &str, is_admin: bool) -> User {
    store
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "unusable-test-hash".to_string(),
            is_admin,
        })
        .await
        .unwrap()
}

#[cfg(test)]
pub async fn seed_category(store: &Arc<dyn Store>, name: &str) -> Category {
    store
        .create_category(NewCategory {
            name: name.to_string(),
            description: None,
            icon: None,
        })
        .await
        .unwrap()
}

#[cfg(test)]
pub async fn seed_product(
    store: &Arc<dyn Store>,
    name: &str,
    price: &str,
    category_id: Option<Uuid>,
) -> Product {
    store
        .create_product(NewProduct {
            name: name.to_string(),
            description: format!("{} description", name),
            price: dec(price),
            image: format!("https://example.com/{}.png", name.to_lowercase()),
            category_id,
            stock: 100,
        })
        .await
        .unwrap()
}

/// Serve the full app on an ephemeral port for client-layer tests.
/// Returns the base URL plus the services and store behind it.
#[cfg(test)]
pub async fn spawn_app() -> (
    String,
    crate::core::app::AppServices,
    Arc<dyn Store>,
) {
    let store = memory_store();
    let services = crate::core::app::AppServices::new(Arc::clone(&store), &test_auth_config());
    let app = crate::core::app::build_app(&services);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), services, store)
}

/// Layer a router with middleware that injects the given user, bypassing
/// token checks in handler-level tests.
#[cfg(test)]
pub fn with_auth_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
