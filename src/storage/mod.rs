//! Storage interface over the six entity types.
//!
//! Services hold an `Arc<dyn Store>`; the backend is picked at startup
//! (Postgres when `DATABASE_URL` is configured, in-memory otherwise).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::models::User;
use crate::features::cart::models::CartItem;
use crate::features::categories::models::Category;
use crate::features::orders::models::{Order, OrderItem};
use crate::features::products::models::Product;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Insert payload for a user row. The password is already hashed by the
/// auth service; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category_id: Option<Uuid>,
    pub stock: i32,
}

/// Field-merge update for a product; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub total: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// Durable (or in-process) storage for users, categories, products, cart
/// rows, orders and order lines.
///
/// Lookups return `Ok(None)` for absent rows; mapping absence to an HTTP
/// 404 is the service layer's job. List methods return newest-first. No
/// cross-entity integrity is enforced here: deleting a category leaves
/// product references dangling by design.
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, data: NewUser) -> Result<User>;

    // Categories
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, data: NewCategory) -> Result<Category>;

    // Products
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn list_products(&self, category_id: Option<Uuid>) -> Result<Vec<Product>>;
    async fn create_product(&self, data: NewProduct) -> Result<Product>;
    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Option<Product>>;
    async fn delete_product(&self, id: Uuid) -> Result<bool>;

    // Cart
    async fn get_cart_item(&self, id: Uuid) -> Result<Option<CartItem>>;
    async fn cart_items_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>>;
    async fn add_cart_item(&self, data: NewCartItem) -> Result<CartItem>;
    async fn set_cart_item_quantity(&self, id: Uuid, quantity: i32) -> Result<Option<CartItem>>;
    async fn delete_cart_item(&self, id: Uuid) -> Result<bool>;
    async fn clear_cart(&self, user_id: Uuid) -> Result<()>;

    // Orders
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>>;
    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
    async fn list_orders(&self) -> Result<Vec<Order>>;
    async fn create_order(&self, data: NewOrder) -> Result<Order>;
    async fn update_order_status(&self, id: Uuid, status: &str) -> Result<Option<Order>>;
    async fn create_order_item(&self, data: NewOrderItem) -> Result<OrderItem>;
    async fn order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>>;
}
