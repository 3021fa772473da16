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
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::orders::dtos::{CreateOrderDto, OrderResponseDto, UpdateOrderStatusDto};
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta};

/// List orders: own orders, or every order for admins
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "List of orders", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_orders(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let orders = service.list(&user).await?;
    let meta = Meta {
        total: orders.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(orders), None, Some(meta))))
}

/// Create an order from the caller's current cart
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Validation error or empty cart"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "A cart product is no longer available")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_order(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    AppJson(dto): AppJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let order = service.create(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(order), None, None)),
    ))
}

/// Update an order's status (admin only)
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order id")
    ),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_order_status(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateOrderStatusDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let order = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}
