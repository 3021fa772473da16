use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::client::api::{ApiClient, Result};
use crate::features::cart::dtos::{AddToCartDto, CartItemDto, UpdateCartItemDto};
use crate::features::products::dtos::ProductResponseDto;

/// Client-side cart state.
///
/// Caches the server's cart rows and the product catalog. Every mutation
/// issues the API call and then refetches the whole cart, so the cache
/// only ever holds server-confirmed state. Total and count are derived on
/// demand by folding rows against the cached catalog.
pub struct CartStore {
    api: Arc<ApiClient>,
    items: RwLock<Vec<CartItemDto>>,
    catalog: RwLock<HashMap<Uuid, ProductResponseDto>>,
}

impl CartStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            items: RwLock::new(Vec::new()),
            catalog: RwLock::new(HashMap::new()),
        }
    }

    /// Re-fetch the product catalog used to price the cart
    pub async fn refresh_catalog(&self) -> Result<()> {
        let products: Vec<ProductResponseDto> = self.api.get("/api/products").await?;
        *self.catalog.write().await = products.into_iter().map(|p| (p.id, p)).collect();
        Ok(())
    }

    /// Re-fetch the cart from the server
    pub async fn refresh(&self) -> Result<()> {
        let items: Vec<CartItemDto> = self.api.get("/api/cart").await?;
        *self.items.write().await = items;
        Ok(())
    }

    /// Add a product, then resync with the server
    pub async fn add(&self, product_id: Uuid, quantity: i32) -> Result<()> {
        let _: CartItemDto = self
            .api
            .post(
                "/api/cart",
                &AddToCartDto {
                    product_id,
                    quantity,
                },
            )
            .await?;
        self.refresh().await
    }

    /// Set a row's quantity, then resync with the server
    pub async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> Result<()> {
        let _: CartItemDto = self
            .api
            .patch(
                &format!("/api/cart/{}", item_id),
                &UpdateCartItemDto { quantity },
            )
            .await?;
        self.refresh().await
    }

    /// Remove a row, then resync with the server
    pub async fn remove(&self, item_id: Uuid) -> Result<()> {
        self.api.delete(&format!("/api/cart/{}", item_id)).await?;
        self.refresh().await
    }

    /// Clear the cart, then resync with the server
    pub async fn clear(&self) -> Result<()> {
        self.api.delete("/api/cart").await?;
        self.refresh().await
    }

    /// Snapshot of the cached cart rows
    pub async fn items(&self) -> Vec<CartItemDto> {
        self.items.read().await.clone()
    }

    /// Total number of units across all rows
    pub async fn count(&self) -> i32 {
        self.items.read().await.iter().map(|i| i.quantity).sum()
    }

    /// Cart total derived from the cached catalog. Rows whose product is
    /// missing from the catalog contribute nothing.
    pub async fn total(&self) -> Decimal {
        let catalog = self.catalog.read().await;
        self.items
            .read()
            .await
            .iter()
            .filter_map(|item| {
                catalog
                    .get(&item.product_id)
                    .map(|product| product.price * Decimal::from(item.quantity))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::SessionStore;
    use crate::features::auth::dtos::RegisterRequestDto;
    use crate::shared::test_helpers::{dec, seed_product, spawn_app};

    async fn shopper_session(base_url: String) -> (Arc<ApiClient>, SessionStore) {
        let api = Arc::new(ApiClient::new(base_url));
        let session = SessionStore::new(Arc::clone(&api));
        session
            .register(RegisterRequestDto {
                username: "maria".to_string(),
                email: "maria@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
                confirm_password: None,
            })
            .await
            .unwrap();
        (api, session)
    }

    #[tokio::test]
    async fn test_mutations_resync_from_server() {
        let (base_url, _services, store) = spawn_app().await;
        let cola = seed_product(&store, "Cola", "2.50", None).await;
        let chips = seed_product(&store, "Chips", "1.75", None).await;

        let (api, _session) = shopper_session(base_url).await;
        let cart = CartStore::new(api);
        cart.refresh_catalog().await.unwrap();

        cart.add(cola.id, 2).await.unwrap();
        cart.add(chips.id, 1).await.unwrap();
        cart.add(cola.id, 1).await.unwrap();

        // Merged server-side; the cache mirrors it after the refetch
        let items = cart.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(cart.count().await, 4);
        assert_eq!(cart.total().await, dec("9.25"));

        let cola_row = items.iter().find(|i| i.product_id == cola.id).unwrap();
        cart.set_quantity(cola_row.id, 1).await.unwrap();
        assert_eq!(cart.total().await, dec("4.25"));

        cart.remove(cola_row.id).await.unwrap();
        assert_eq!(cart.count().await, 1);

        cart.clear().await.unwrap();
        assert!(cart.items().await.is_empty());
        assert_eq!(cart.total().await, Decimal::ZERO);

        // Clearing again is fine
        cart.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_total_tolerates_product_missing_from_catalog() {
        let (base_url, _services, store) = spawn_app().await;
        let cola = seed_product(&store, "Cola", "2.50", None).await;

        let (api, _session) = shopper_session(base_url).await;
        let cart = CartStore::new(api);
        cart.refresh_catalog().await.unwrap();
        cart.add(cola.id, 2).await.unwrap();

        // Product disappears server-side; the stale cart row must not break pricing
        store.delete_product(cola.id).await.unwrap();
        cart.refresh_catalog().await.unwrap();

        assert_eq!(cart.count().await, 2);
        assert_eq!(cart.total().await, Decimal::ZERO);
    }
}
