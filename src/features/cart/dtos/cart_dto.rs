use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::cart::models::CartItem;
use crate::shared::constants::DEFAULT_CART_QUANTITY;

/// Response DTO for a cart row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

impl From<CartItem> for CartItemDto {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

/// Request DTO for adding a product to the cart
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddToCartDto {
    pub product_id: Uuid,

    /// How many units to add; defaults to 1
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    DEFAULT_CART_QUANTITY
}

/// Request DTO for setting a cart row's quantity
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemDto {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}
