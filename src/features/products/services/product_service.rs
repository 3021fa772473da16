use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{CreateProductDto, ProductResponseDto, UpdateProductDto};
use crate::storage::{NewProduct, ProductPatch, Store};

/// Service for product operations
pub struct ProductService {
    store: Arc<dyn Store>,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List products, optionally filtered by category
    pub async fn list(&self, category_id: Option<Uuid>) -> Result<Vec<ProductResponseDto>> {
        let products = self.store.list_products(category_id).await?;
        Ok(products.into_iter().map(|p| p.into()).collect())
    }

    /// Get product by id
    pub async fn get(&self, id: Uuid) -> Result<ProductResponseDto> {
        let product = self.store.get_product(id).await?;
        product
            .map(|p| p.into())
            .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", id)))
    }

    /// Create a product
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        if dto.price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }

        let product = self
            .store
            .create_product(NewProduct {
                name: dto.name,
                description: dto.description,
                price: dto.price,
                image: dto.image,
                category_id: Some(dto.category_id),
                stock: dto.stock,
            })
            .await?;

        tracing::info!("Product created: id={}, name={}", product.id, product.name);

        Ok(product.into())
    }

    /// Merge the provided fields into an existing product
    pub async fn update(&self, id: Uuid, dto: UpdateProductDto) -> Result<ProductResponseDto> {
        if let Some(price) = dto.price {
            if price <= Decimal::ZERO {
                return Err(AppError::Validation(
                    "Price must be greater than zero".to_string(),
                ));
            }
        }

        let product = self
            .store
            .update_product(
                id,
                ProductPatch {
                    name: dto.name,
                    description: dto.description,
                    price: dto.price,
                    image: dto.image,
                    category_id: dto.category_id,
                    stock: dto.stock,
                },
            )
            .await?;

        product
            .map(|p| p.into())
            .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", id)))
    }

    /// Delete a product
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self.store.delete_product(id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("Product '{}' not found", id)));
        }

        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{dec, memory_store, seed_category, seed_product};

    #[tokio::test]
    async fn test_list_filters_by_category() {
        let store = memory_store();
        let service = ProductService::new(Arc::clone(&store));

        let drinks = seed_category(&store, "Drinks").await;
        let snacks = seed_category(&store, "Snacks").await;
        seed_product(&store, "Cola", "2.50", Some(drinks.id)).await;
        seed_product(&store, "Chips", "1.75", Some(snacks.id)).await;

        let all = service.list(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = service.list(Some(drinks.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Cola");
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let store = memory_store();
        let service = ProductService::new(store);

        let err = service.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_price() {
        let store = memory_store();
        let service = ProductService::new(Arc::clone(&store));
        let category = seed_category(&store, "Drinks").await;

        let err = service
            .create(CreateProductDto {
                name: "Cola".to_string(),
                description: "A can of cola".to_string(),
                price: dec("0"),
                image: "https://example.com/cola.png".to_string(),
                category_id: category.id,
                stock: 10,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let store = memory_store();
        let service = ProductService::new(Arc::clone(&store));
        let product = seed_product(&store, "Cola", "2.50", None).await;

        let updated = service
            .update(
                product.id,
                UpdateProductDto {
                    price: Some(dec("3.00")),
                    stock: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Cola");
        assert_eq!(updated.price, dec("3.00"));
        assert_eq!(updated.stock, 5);
    }

    #[tokio::test]
    async fn test_delete_is_not_found_on_second_call() {
        let store = memory_store();
        let service = ProductService::new(Arc::clone(&store));
        let product = seed_product(&store, "Cola", "2.50", None).await;

        service.delete(product.id).await.unwrap();
        let err = service.delete(product.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
