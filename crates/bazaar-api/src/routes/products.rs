//! Catalog routes. Reads are public; edits need an admin token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bazaar_commerce::catalog::{InventoryAdjustment, Product};
use bazaar_commerce::ProductId;

use crate::dto::{
    AdjustStockRequest, ApiResponse, ProductRequest, StockResponse, UpdateStockRequest,
};
use crate::extract::{AppJson, CurrentUser};
use crate::{ApiError, AppState};

type ProductResponse = Result<Json<ApiResponse<Product>>, ApiError>;

pub(super) async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(ApiResponse::ok(products)))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ProductResponse {
    let product = state.catalog.product(&ProductId::new(id)).await?;
    Ok(Json(ApiResponse::ok(product)))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<ProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    principal.ensure_admin()?;
    let product = body.into_product(state.catalog.currency())?;
    let product = state.catalog.create_product(&principal, product).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<ProductRequest>,
) -> ProductResponse {
    principal.ensure_admin()?;
    let product = body.into_product(state.catalog.currency())?;
    let product = state
        .catalog
        .update_product(&principal, &ProductId::new(id), product)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

pub(super) async fn update_stock(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateStockRequest>,
) -> ProductResponse {
    principal.ensure_admin()?;
    let levels = body.into_levels()?;
    let product = state
        .catalog
        .update_stock(&principal, &ProductId::new(id), levels)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

pub(super) async fn adjust_stock(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<AdjustStockRequest>,
) -> Result<Json<ApiResponse<StockResponse>>, ApiError> {
    principal.ensure_admin()?;
    let (variant, delta) = body.into_parts()?;
    let product_id = ProductId::new(id);
    let stock = state
        .catalog
        .adjust_stock(&principal, &product_id, &variant, delta)
        .await?;
    Ok(Json(ApiResponse::ok(StockResponse {
        product_id,
        variant,
        stock,
    })))
}

pub(super) async fn stock_history(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<InventoryAdjustment>>>, ApiError> {
    let history = state
        .catalog
        .stock_history(&principal, &ProductId::new(id))
        .await?;
    Ok(Json(ApiResponse::ok(history)))
}
