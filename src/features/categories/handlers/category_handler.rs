use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::routes;
    use crate::shared::test_helpers::{memory_store, seed_user, with_auth_user};
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_category_rejects_non_admin() {
        let store = memory_store();
        let service = Arc::new(CategoryService::new(Arc::clone(&store)));
        let user = seed_user(&store, "maria", false).await;

        let router = with_auth_user(routes::admin_routes(service), user.into());
        let server = TestServer::new(router).unwrap();

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Drinks" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert!(store.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_category_as_admin() {
        let store = memory_store();
        let service = Arc::new(CategoryService::new(Arc::clone(&store)));
        let admin = seed_user(&store, "admin", true).await;

        let admin_router = with_auth_user(routes::admin_routes(Arc::clone(&service)), admin.into());
        let server = TestServer::new(admin_router).unwrap();

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Drinks", "description": "Cold drinks", "icon": "cup" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let public = TestServer::new(routes::public_routes(service)).unwrap();
        let listed = public.get("/api/categories").await;
        listed.assert_status_ok();
        let body = listed.json::<serde_json::Value>();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "Drinks");
    }

    #[tokio::test]
    async fn test_create_category_rejects_empty_name() {
        let store = memory_store();
        let service = Arc::new(CategoryService::new(Arc::clone(&store)));
        let admin = seed_user(&store, "admin", true).await;

        let router = with_auth_user(routes::admin_routes(service), admin.into());
        let server = TestServer::new(router).unwrap();

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
