use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::DatabaseConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::models::User;
use crate::features::cart::models::CartItem;
use crate::features::categories::models::Category;
use crate::features::orders::models::{Order, OrderItem};
use crate::features::products::models::Product;

use super::{
    NewCartItem, NewCategory, NewOrder, NewOrderItem, NewProduct, NewUser, ProductPatch, Store,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, is_admin, created_at";
const CATEGORY_COLUMNS: &str = "id, name, description, icon, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, image, category_id, stock, created_at";
const CART_ITEM_COLUMNS: &str = "id, user_id, product_id, quantity, created_at";
const ORDER_COLUMNS: &str = "id, user_id, total, customer_name, customer_email, customer_phone, \
                             shipping_address, status, created_at";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price, created_at";

/// Postgres store. Queries are runtime-bound so the crate builds without a
/// reachable database; the schema lives in `migrations/`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool with the configured limits and timeouts
    pub async fn connect(config: &DatabaseConfig) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {:?}", context, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to get user"))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to get user by username"))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to get user by email"))
    }

    async fn create_user(&self, data: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create user"))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories ORDER BY created_at DESC",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list categories"))
    }

    async fn create_category(&self, data: NewCategory) -> Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description, icon) \
             VALUES ($1, $2, $3) RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.icon)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create category"))
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to get product"))
    }

    async fn list_products(&self, category_id: Option<Uuid>) -> Result<Vec<Product>> {
        match category_id {
            Some(category_id) => sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products WHERE category_id = $1 ORDER BY created_at DESC",
                PRODUCT_COLUMNS
            ))
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list products by category")),
            None => sqlx::query_as::<_, Product>(&format!(
                "SELECT {} FROM products ORDER BY created_at DESC",
                PRODUCT_COLUMNS
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list products")),
        }
    }

    async fn create_product(&self, data: NewProduct) -> Result<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, image, category_id, stock) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.price)
        .bind(data.image)
        .bind(data.category_id)
        .bind(data.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create product"))
    }

    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 image = COALESCE($5, image), \
                 category_id = COALESCE($6, category_id), \
                 stock = COALESCE($7, stock) \
             WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.image)
        .bind(patch.category_id)
        .bind(patch.stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update product"))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete product"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_cart_item(&self, id: Uuid) -> Result<Option<CartItem>> {
        sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM cart_items WHERE id = $1",
            CART_ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to get cart item"))
    }

    async fn cart_items_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM cart_items WHERE user_id = $1 ORDER BY created_at DESC",
            CART_ITEM_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list cart items"))
    }

    async fn add_cart_item(&self, data: NewCartItem) -> Result<CartItem> {
        sqlx::query_as::<_, CartItem>(&format!(
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) RETURNING {}",
            CART_ITEM_COLUMNS
        ))
        .bind(data.user_id)
        .bind(data.product_id)
        .bind(data.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to add cart item"))
    }

    async fn set_cart_item_quantity(&self, id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
        sqlx::query_as::<_, CartItem>(&format!(
            "UPDATE cart_items SET quantity = $2 WHERE id = $1 RETURNING {}",
            CART_ITEM_COLUMNS
        ))
        .bind(id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update cart item"))
    }

    async fn delete_cart_item(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete cart item"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_cart(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to clear cart"))?;
        Ok(())
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to get order"))
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list orders for user"))
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list orders"))
    }

    async fn create_order(&self, data: NewOrder) -> Result<Order> {
        sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, total, customer_name, customer_email, \
             customer_phone, shipping_address) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(data.user_id)
        .bind(data.total)
        .bind(data.customer_name)
        .bind(data.customer_email)
        .bind(data.customer_phone)
        .bind(data.shipping_address)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create order"))
    }

    async fn update_order_status(&self, id: Uuid, status: &str) -> Result<Option<Order>> {
        sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update order status"))
    }

    async fn create_order_item(&self, data: NewOrderItem) -> Result<OrderItem> {
        sqlx::query_as::<_, OrderItem>(&format!(
            "INSERT INTO order_items (order_id, product_id, quantity, price) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ORDER_ITEM_COLUMNS
        ))
        .bind(data.order_id)
        .bind(data.product_id)
        .bind(data.quantity)
        .bind(data.price)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create order item"))
    }

    async fn order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {} FROM order_items WHERE order_id = $1 ORDER BY created_at",
            ORDER_ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list order items"))
    }
}
