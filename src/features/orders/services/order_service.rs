use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::orders::dtos::{CreateOrderDto, OrderResponseDto, UpdateOrderStatusDto};
use crate::features::orders::models::{Order, OrderStatus};
use crate::storage::{NewOrder, NewOrderItem, Store};

/// Service for checkout and order management
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an order from the user's current cart.
    ///
    /// The total is the sum of unit price times quantity over the cart at
    /// this moment; each order line freezes the unit price it was billed
    /// at. A cart row whose product no longer exists fails the whole
    /// checkout before anything is persisted. The cart is cleared last.
    pub async fn create(&self, user_id: Uuid, dto: CreateOrderDto) -> Result<OrderResponseDto> {
        let cart_items = self.store.cart_items_for_user(user_id).await?;
        if cart_items.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }

        let mut lines = Vec::with_capacity(cart_items.len());
        let mut total = Decimal::ZERO;
        for item in &cart_items {
            let product = self
                .store
                .get_product(item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Product '{}' is no longer available",
                        item.product_id
                    ))
                })?;
            total += product.price * Decimal::from(item.quantity);
            lines.push((item, product));
        }

        let order = self
            .store
            .create_order(NewOrder {
                user_id,
                total,
                customer_name: dto.customer_name,
                customer_email: dto.customer_email,
                customer_phone: dto.customer_phone,
                shipping_address: dto.shipping_address,
            })
            .await?;

        let mut order_items = Vec::with_capacity(lines.len());
        for (item, product) in lines {
            let order_item = self
                .store
                .create_order_item(NewOrderItem {
                    order_id: order.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: product.price,
                })
                .await?;
            order_items.push(order_item);
        }

        self.store.clear_cart(user_id).await?;

        tracing::info!(
            "Order created: id={}, user={}, total={}",
            order.id,
            user_id,
            order.total
        );

        Ok(OrderResponseDto::from_order(order, order_items))
    }

    /// List orders: admins see every order, everyone else their own
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<OrderResponseDto>> {
        let orders = if user.is_admin {
            self.store.list_orders().await?
        } else {
            self.store.orders_for_user(user.id).await?
        };

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            result.push(self.with_items(order).await?);
        }
        Ok(result)
    }

    /// Set an order's status
    pub async fn update_status(
        &self,
        id: Uuid,
        dto: UpdateOrderStatusDto,
    ) -> Result<OrderResponseDto> {
        let status = OrderStatus::from_str(&dto.status)
            .map_err(|_| AppError::Validation(format!("Unknown order status '{}'", dto.status)))?;

        let order = self
            .store
            .update_order_status(id, status.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order '{}' not found", id)))?;

        self.with_items(order).await
    }

    async fn with_items(&self, order: Order) -> Result<OrderResponseDto> {
        let items = self.store.order_items(order.id).await?;
        Ok(OrderResponseDto::from_order(order, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cart::services::CartService;
    use crate::features::cart::dtos::AddToCartDto;
    use crate::features::products::dtos::UpdateProductDto;
    use crate::features::products::services::ProductService;
    use crate::shared::test_helpers::{dec, memory_store, seed_product, seed_user};

    fn checkout_dto() -> CreateOrderDto {
        CreateOrderDto {
            customer_name: "Maria Lopez".to_string(),
            customer_email: "maria@example.com".to_string(),
            customer_phone: "+34 600 000 000".to_string(),
            shipping_address: "Calle Mayor 1, Madrid".to_string(),
        }
    }

    #[tokio::test]
    async fn test_checkout_from_merged_cart() {
        let store = memory_store();
        let cart = CartService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "100", None).await;

        // qty 2 then qty 1 merge into a single row of 3
        cart.add(
            user.id,
            AddToCartDto {
                product_id: product.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();
        cart.add(
            user.id,
            AddToCartDto {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();

        let order = orders.create(user.id, checkout_dto()).await.unwrap();

        assert_eq!(order.total, dec("300"));
        assert_eq!(order.status, "pending");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, dec("100"));
        assert_eq!(order.items[0].quantity, 3);

        // Cart is empty immediately after checkout
        assert!(cart.list(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let store = memory_store();
        let orders = OrderService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;

        let err = orders.create(user.id, checkout_dto()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_checkout_aborts_on_missing_product() {
        let store = memory_store();
        let cart = CartService::new(Arc::clone(&store));
        let products = ProductService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        cart.add(
            user.id,
            AddToCartDto {
                product_id: product.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();

        // Product disappears between add-to-cart and checkout
        products.delete(product.id).await.unwrap();

        let err = orders.create(user.id, checkout_dto()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Nothing was persisted and the cart is untouched
        let admin = AuthenticatedUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: true,
        };
        assert!(orders.list(&admin).await.unwrap().is_empty());
        assert_eq!(cart.list(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_order_item_price_survives_product_edit() {
        let store = memory_store();
        let cart = CartService::new(Arc::clone(&store));
        let products = ProductService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        cart.add(
            user.id,
            AddToCartDto {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();
        let order = orders.create(user.id, checkout_dto()).await.unwrap();

        // Later price change must not rewrite order history
        products
            .update(
                product.id,
                UpdateProductDto {
                    price: Some(dec("9.99")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let me = AuthenticatedUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: false,
        };
        let listed = orders.list(&me).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items[0].price, dec("2.50"));
        assert_eq!(listed[0].total, order.total);
    }

    #[tokio::test]
    async fn test_list_scopes_to_owner_unless_admin() {
        let store = memory_store();
        let cart = CartService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store));
        let maria = seed_user(&store, "maria", false).await;
        let carla = seed_user(&store, "carla", false).await;
        let admin = seed_user(&store, "admin", true).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        for user_id in [maria.id, carla.id] {
            cart.add(
                user_id,
                AddToCartDto {
                    product_id: product.id,
                    quantity: 1,
                },
            )
            .await
            .unwrap();
            orders.create(user_id, checkout_dto()).await.unwrap();
        }

        let as_maria = AuthenticatedUser {
            id: maria.id,
            username: maria.username.clone(),
            email: maria.email.clone(),
            is_admin: false,
        };
        let as_admin = AuthenticatedUser {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            is_admin: true,
        };

        assert_eq!(orders.list(&as_maria).await.unwrap().len(), 1);
        assert_eq!(orders.list(&as_admin).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_validates_and_persists() {
        let store = memory_store();
        let cart = CartService::new(Arc::clone(&store));
        let orders = OrderService::new(Arc::clone(&store));
        let user = seed_user(&store, "maria", false).await;
        let product = seed_product(&store, "Cola", "2.50", None).await;

        cart.add(
            user.id,
            AddToCartDto {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();
        let order = orders.create(user.id, checkout_dto()).await.unwrap();

        let err = orders
            .update_status(
                order.id,
                UpdateOrderStatusDto {
                    status: "refunded".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let updated = orders
            .update_status(
                order.id,
                UpdateOrderStatusDto {
                    status: "shipped".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "shipped");

        let err = orders
            .update_status(
                Uuid::new_v4(),
                UpdateOrderStatusDto {
                    status: "shipped".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
