//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

use crate::api::Removed;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductListQuery, ProductUpdate, ProductView};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

const DEFAULT_SHOWCASE_LIMIT: usize = 8;

/// 列表响应: 商品 + 分页信息
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductView>,
    pub page: u64,
    pub pages: u64,
    pub total_products: u64,
}

/// `limit` query param for the showcase listings
#[derive(Debug, Deserialize)]
pub struct ShowcaseQuery {
    pub limit: Option<String>,
}

impl ShowcaseQuery {
    /// Lenient: malformed or non-positive values fall back to the default
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_SHOWCASE_LIMIT)
    }
}

/// Denormalize category links into {id, name, slug} on each product
async fn with_categories(
    state: &ServerState,
    products: Vec<Product>,
) -> AppResult<Vec<ProductView>> {
    let mut ids: Vec<Thing> = Vec::new();
    for product in &products {
        if !ids.contains(&product.category) {
            ids.push(product.category.clone());
        }
    }

    let categories = CategoryRepository::new(state.get_db()).find_by_ids(ids).await?;

    Ok(products
        .into_iter()
        .map(|product| {
            let category = categories
                .iter()
                .find(|c| c.id.as_ref() == Some(&product.category));
            ProductView::from_parts(product, category)
        })
        .collect())
}

/// The category link on a create/update payload must resolve
async fn ensure_category_exists(state: &ServerState, category_id: &str) -> AppResult<()> {
    CategoryRepository::new(state.get_db())
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| AppError::validation("Category does not exist"))?;
    Ok(())
}

/// GET /api/products - 过滤 / 排序 / 分页的商品列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let (filter, sort, page) = query.build();

    let repo = ProductRepository::new(state.get_db());
    let result = repo.find_page(&filter, sort, &page).await?;
    let products = with_categories(&state, result.items).await?;

    Ok(Json(ProductListResponse {
        products,
        page: page.page,
        pages: page.pages(result.total),
        total_products: result.total,
    }))
}

/// GET /api/products/featured - 推荐商品
pub async fn featured(
    State(state): State<ServerState>,
    Query(query): Query<ShowcaseQuery>,
) -> AppResult<Json<Vec<ProductView>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_featured(query.limit()).await?;
    Ok(Json(with_categories(&state, products).await?))
}

/// GET /api/products/on-sale - 特价商品
pub async fn on_sale(
    State(state): State<ServerState>,
    Query(query): Query<ShowcaseQuery>,
) -> AppResult<Json<Vec<ProductView>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_on_sale(query.limit()).await?;
    Ok(Json(with_categories(&state, products).await?))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let mut views = with_categories(&state, vec![product]).await?;
    Ok(Json(views.remove(0)))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ProductView>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    ensure_category_exists(&state, &payload.category).await?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;
    tracing::info!(sku = %product.sku, "Product created");

    let mut views = with_categories(&state, vec![product]).await?;
    Ok((StatusCode::CREATED, Json(views.remove(0))))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductView>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if let Some(ref category) = payload.category {
        ensure_category_exists(&state, category).await?;
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;
    tracing::info!(id = %id, "Product updated");

    let mut views = with_categories(&state, vec![product]).await?;
    Ok(Json(views.remove(0)))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Removed>> {
    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id).await?;
    tracing::info!(id = %id, "Product removed");

    Ok(Json(Removed {
        message: "Product removed",
    }))
}
