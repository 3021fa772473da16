use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::storage::{NewCategory, Store};

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn Store>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.store.list_categories().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Create a category
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let category = self
            .store
            .create_category(NewCategory {
                name: dto.name,
                description: dto.description,
                icon: dto.icon,
            })
            .await?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);

        Ok(category.into())
    }
}
