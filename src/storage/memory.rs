use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::models::User;
use crate::features::cart::models::CartItem;
use crate::features::categories::models::Category;
use crate::features::orders::models::{Order, OrderItem, OrderStatus};
use crate::features::products::models::Product;

use super::{
    NewCartItem, NewCategory, NewOrder, NewOrderItem, NewProduct, NewUser, ProductPatch, Store,
};

/// In-process store backed by per-entity maps.
///
/// Default backend when `DATABASE_URL` is unset; also the fixture the test
/// suite runs against. Data does not survive a restart.
#[derive(Default)]
pub struct MemStore {
    users: RwLock<HashMap<Uuid, User>>,
    categories: RwLock<HashMap<Uuid, Category>>,
    products: RwLock<HashMap<Uuid, Product>>,
    cart_items: RwLock<HashMap<Uuid, CartItem>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    order_items: RwLock<HashMap<Uuid, OrderItem>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F: Fn(&T) -> chrono::DateTime<Utc>>(mut rows: Vec<T>, created_at: F) -> Vec<T> {
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

#[async_trait]
impl Store for MemStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, data: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            is_admin: data.is_admin,
            created_at: Utc::now(),
        };
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = self.categories.read().await.values().cloned().collect();
        Ok(newest_first(rows, |c: &Category| c.created_at))
    }

    async fn create_category(&self, data: NewCategory) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            icon: data.icon,
            created_at: Utc::now(),
        };
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list_products(&self, category_id: Option<Uuid>) -> Result<Vec<Product>> {
        let rows = self
            .products
            .read()
            .await
            .values()
            .filter(|p| category_id.is_none() || p.category_id == category_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |p: &Product| p.created_at))
    }

    async fn create_product(&self, data: NewProduct) -> Result<Product> {
        let product = Product {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            price: data.price,
            image: data.image,
            category_id: data.category_id,
            stock: data.stock,
            created_at: Utc::now(),
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }
        if let Some(category_id) = patch.category_id {
            product.category_id = Some(category_id);
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn get_cart_item(&self, id: Uuid) -> Result<Option<CartItem>> {
        Ok(self.cart_items.read().await.get(&id).cloned())
    }

    async fn cart_items_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let rows = self
            .cart_items
            .read()
            .await
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |i: &CartItem| i.created_at))
    }

    async fn add_cart_item(&self, data: NewCartItem) -> Result<CartItem> {
        let item = CartItem {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            product_id: data.product_id,
            quantity: data.quantity,
            created_at: Utc::now(),
        };
        self.cart_items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn set_cart_item_quantity(&self, id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
        let mut items = self.cart_items.write().await;
        let Some(item) = items.get_mut(&id) else {
            return Ok(None);
        };
        item.quantity = quantity;
        Ok(Some(item.clone()))
    }

    async fn delete_cart_item(&self, id: Uuid) -> Result<bool> {
        Ok(self.cart_items.write().await.remove(&id).is_some())
    }

    async fn clear_cart(&self, user_id: Uuid) -> Result<()> {
        self.cart_items
            .write()
            .await
            .retain(|_, item| item.user_id != user_id);
        Ok(())
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let rows = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |o: &Order| o.created_at))
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = self.orders.read().await.values().cloned().collect();
        Ok(newest_first(rows, |o: &Order| o.created_at))
    }

    async fn create_order(&self, data: NewOrder) -> Result<Order> {
        let order = Order {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            total: data.total,
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            customer_phone: data.customer_phone,
            shipping_address: data.shipping_address,
            status: OrderStatus::Pending.to_string(),
            created_at: Utc::now(),
        };
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_order_status(&self, id: Uuid, status: &str) -> Result<Option<Order>> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&id) else {
            return Ok(None);
        };
        order.status = status.to_string();
        Ok(Some(order.clone()))
    }

    async fn create_order_item(&self, data: NewOrderItem) -> Result<OrderItem> {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: data.order_id,
            product_id: data.product_id,
            quantity: data.quantity,
            price: data.price,
            created_at: Utc::now(),
        };
        self.order_items
            .write()
            .await
            .insert(item.id, item.clone());
        Ok(item)
    }

    async fn order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        let mut rows: Vec<OrderItem> = self
            .order_items
            .read()
            .await
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect();
        // Order lines read oldest-first so they match the cart they came from
        rows.sort_by_key(|item| item.created_at);
        Ok(rows)
    }
}
