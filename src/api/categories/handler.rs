//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::Removed;
use crate::core::ServerState;
use crate::db::models::{CategoryCreate, CategoryUpdate, CategoryView};
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CategoryView>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(Json(categories.into_iter().map(CategoryView::from).collect()))
}

/// GET /api/categories/:id - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryView>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category.into()))
}

/// GET /api/categories/slug/:slug - 按 slug 获取分类
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoryView>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_slug(&slug.to_lowercase())
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category.into()))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<CategoryView>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = CategoryRepository::new(state.get_db());

    // 父分类应当存在 (非事务性检查)
    if let Some(ref parent) = payload.parent_category {
        repo.find_by_id(parent)
            .await?
            .ok_or_else(|| AppError::validation("Parent category does not exist"))?;
    }

    let category = repo.create(payload).await?;
    tracing::info!(slug = %category.slug, "Category created");

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<CategoryView>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = CategoryRepository::new(state.get_db());
    if let Some(ref parent) = payload.parent_category {
        repo.find_by_id(parent)
            .await?
            .ok_or_else(|| AppError::validation("Parent category does not exist"))?;
    }

    let category = repo.update(&id, payload).await?;
    tracing::info!(id = %id, "Category updated");

    Ok(Json(category.into()))
}

/// DELETE /api/categories/:id - 删除分类
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Removed>> {
    let repo = CategoryRepository::new(state.get_db());
    repo.delete(&id, state.config.category_delete_policy).await?;
    tracing::info!(id = %id, "Category removed");

    Ok(Json(Removed {
        message: "Category removed",
    }))
}
