use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::products::models::Product;

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Unit price as a decimal string, e.g. "12.50"
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub price: Decimal,
    pub image: String,
    pub category_id: Option<Uuid>,
    pub stock: i32,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image: p.image,
            category_id: p.category_id,
            stock: p.stock,
        }
    }
}

/// Request DTO for creating a product (admin only)
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Unit price as a decimal string; must be greater than zero
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub price: Decimal,

    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,

    pub category_id: Uuid,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}

/// Request DTO for partially updating a product (admin only).
/// Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[serde(default)]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price as a decimal string; must be greater than zero when present
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,

    #[validate(length(min = 1, message = "Image cannot be empty"))]
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub category_id: Option<Uuid>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    pub stock: Option<i32>,
}
