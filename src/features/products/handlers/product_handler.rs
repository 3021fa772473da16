use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::products::dtos::{CreateProductDto, ProductResponseDto, UpdateProductDto};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing products
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Restrict to a single category
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// List products
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Filter by category id")
    ),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<Vec<ProductResponseDto>>),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let products = service.list(query.category_id).await?;
    let meta = Meta {
        total: products.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(products), None, Some(meta))))
}

/// Get product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_product(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(product), None, None)),
    ))
}

/// Update a product (admin only)
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    ),
    tag = "products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_product(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateProductDto>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    ),
    tag = "products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_product(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Product deleted".to_string()),
        None,
    )))
}
