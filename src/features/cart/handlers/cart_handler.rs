use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::cart::dtos::{AddToCartDto, CartItemDto, UpdateCartItemDto};
use crate::features::cart::services::CartService;
use crate::shared::types::ApiResponse;

/// List the current user's cart
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart rows", body = ApiResponse<Vec<CartItemDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<Vec<CartItemDto>>>> {
    let items = service.list(user.id).await?;
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Add a product to the cart, merging with an existing row for the same product
#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartDto,
    responses(
        (status = 201, description = "Cart row created or merged", body = ApiResponse<CartItemDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_to_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    AppJson(dto): AppJson<AddToCartDto>,
) -> Result<(StatusCode, Json<ApiResponse<CartItemDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.add(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(item), None, None)),
    ))
}

/// Set a cart row's quantity
#[utoipa::path(
    patch,
    path = "/api/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item id")
    ),
    request_body = UpdateCartItemDto,
    responses(
        (status = 200, description = "Cart row updated", body = ApiResponse<CartItemDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart item not found")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCartItemDto>,
) -> Result<Json<ApiResponse<CartItemDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.set_quantity(user.id, id, dto.quantity).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Remove a cart row
#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item id")
    ),
    responses(
        (status = 200, description = "Cart row removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart item not found")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(user.id, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Cart item removed".to_string()),
        None,
    )))
}

/// Clear the current user's cart
#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.clear(user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Cart cleared".to_string()),
        None,
    )))
}
