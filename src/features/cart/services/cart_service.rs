use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::dtos::{AddToCartDto, CartItemDto};
use crate::storage::{NewCartItem, Store};

/// Service for cart operations, always scoped to the owning user
pub struct CartService {
    store: Arc<dyn Store>,
}

impl CartService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List the user's cart rows
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CartItemDto>> {
        let items = self.store.cart_items_for_user(user_id).await?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }

    /// Add a product to the cart.
    ///
    /// If the user already has a row for this product the quantities are
    /// merged into it; a (user, product) pair never spans two rows.
    pub async fn add(&self, user_id: Uuid, dto: AddToCartDto) -> Result<CartItemDto> {
        if self.store.get_product(dto.product_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Product '{}' not found",
                dto.product_id
            )));
        }

        let existing = self
            .store
            .cart_items_for_user(user_id)
            .await?
            .into_iter()
            .find(|item| item.product_id == dto.product_id);

        let item = match existing {
            Some(existing) => self
                .store
                .set_cart_item_quantity(existing.id, existing.quantity + dto.quantity)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Cart item '{}' not found", existing.id))
                })?,
            None => {
                self.store
                    .add_cart_item(NewCartItem {
                        user_id,
                        product_id: dto.product_id,
                        quantity: dto.quantity,
                    })
                    .await?
            }
        };

        Ok(item.into())
    }

    /// Set a cart row's quantity
    pub async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItemDto> {
        self.owned_item(user_id, item_id).await?;

        let item = self
            .store
            .set_cart_item_quantity(item_id, quantity)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cart item '{}' not found", item_id)))?;

        Ok(item.into())
    }

    /// Remove a cart row
    pub async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<()> {
        self.owned_item(user_id, item_id).await?;

        let deleted = self.store.delete_cart_item(item_id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "Cart item '{}' not found",
                item_id
            )));
        }
        Ok(())
    }

    /// Remove every row in the user's cart. Clearing an empty cart is fine.
    pub async fn clear(&self, user_id: Uuid) -> Result<()> {
        self.store.clear_cart(user_id).await
    }

    /// Rows belonging to other users are reported as absent, not forbidden
    async fn owned_item(&self, user_id: Uuid, item_id: Uuid) -> Result<()> {
        match self.store.get_cart_item(item_id).await? {
            Some(item) if item.user_id == user_id => Ok(()),
            _ => Err(AppError::NotFound(format!(
                "Cart item '{}' not found",
                item_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_store, seed_product, seed_user};

    fn add_dto(product_id: Uuid, quantity: i32) -> AddToCartDto {
        AddToCartDto {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_add_merges_existing_row() {
        let store = memory_store();
        let service = CartService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        service.add(user.id, add_dto(product.id, 2)).await.unwrap();
        let merged = service.add(user.id, add_dto(product.id, 1)).await.unwrap();

        assert_eq!(merged.quantity, 3);
        let rows = service.list(user.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_product() {
        let store = memory_store();
        let service = CartService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;

        let err = service
            .add(user.id, add_dto(Uuid::new_v4(), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service.list(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_carts_are_scoped_per_user() {
        let store = memory_store();
        let service = CartService::new(Arc::clone(&store));
        let maria = seed_user(&store, "maria", false).await;
        let carla = seed_user(&store, "carla", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        let row = service.add(maria.id, add_dto(product.id, 2)).await.unwrap();

        // Another user cannot touch the row, and sees an empty cart
        assert!(service.list(carla.id).await.unwrap().is_empty());
        let err = service.set_quantity(carla.id, row.id, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.remove(carla.id, row.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // The owner still has the untouched row
        let rows = service.list(maria.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_set_quantity_and_remove() {
        let store = memory_store();
        let service = CartService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        let row = service.add(user.id, add_dto(product.id, 1)).await.unwrap();

        let updated = service.set_quantity(user.id, row.id, 4).await.unwrap();
        assert_eq!(updated.quantity, 4);

        service.remove(user.id, row.id).await.unwrap();
        let err = service.remove(user.id, row.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = memory_store();
        let service = CartService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        service.add(user.id, add_dto(product.id, 2)).await.unwrap();
        service.clear(user.id).await.unwrap();
        assert!(service.list(user.id).await.unwrap().is_empty());

        // Clearing an already-empty cart succeeds
        service.clear(user.id).await.unwrap();
    }
}
