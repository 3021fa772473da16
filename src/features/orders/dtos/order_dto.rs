use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::orders::models::{Order, OrderItem};

/// Request DTO for checkout; the order itself is built from the caller's cart
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub customer_email: String,

    #[validate(length(min = 1, message = "Customer phone is required"))]
    pub customer_phone: String,

    #[validate(length(min = 1, message = "Shipping address is required"))]
    pub shipping_address: String,
}

/// Request DTO for updating an order's status (admin only)
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusDto {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Response DTO for an order line
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDto {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price frozen at order time, as a decimal string
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Response DTO for an order with its lines
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Order total as a decimal string, computed once at creation
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String)]
    pub total: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemDto>,
}

impl OrderResponseDto {
    pub fn from_order(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            total: order.total,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            shipping_address: order.shipping_address,
            status: order.status,
            created_at: order.created_at,
            items: items.into_iter().map(|i| i.into()).collect(),
        }
    }
}
