use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{self, dtos as auth_dtos};
use crate::features::cart::{dtos as cart_dtos, handlers as cart_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::orders::{dtos as orders_dtos, handlers as orders_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Cart
        cart_handlers::list_cart,
        cart_handlers::add_to_cart,
        cart_handlers::update_cart_item,
        cart_handlers::remove_cart_item,
        cart_handlers::clear_cart,
        // Orders
        orders_handlers::list_orders,
        orders_handlers::create_order,
        orders_handlers::update_order_status,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::UserDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::UserDto>,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Products
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::ProductResponseDto,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            ApiResponse<products_dtos::ProductResponseDto>,
            // Cart
            cart_dtos::AddToCartDto,
            cart_dtos::UpdateCartItemDto,
            cart_dtos::CartItemDto,
            ApiResponse<Vec<cart_dtos::CartItemDto>>,
            ApiResponse<cart_dtos::CartItemDto>,
            // Orders
            orders_dtos::CreateOrderDto,
            orders_dtos::UpdateOrderStatusDto,
            orders_dtos::OrderItemDto,
            orders_dtos::OrderResponseDto,
            ApiResponse<Vec<orders_dtos::OrderResponseDto>>,
            ApiResponse<orders_dtos::OrderResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and session info"),
        (name = "categories", description = "Catalog categories"),
        (name = "products", description = "Catalog products"),
        (name = "cart", description = "Per-user shopping cart"),
        (name = "orders", description = "Checkout and order management"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Tienda API",
        version = "0.1.0",
        description = "Storefront API documentation",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
