//! Admin order routes. Role checks happen in the workflow, except where a
//! body must be parsed first.

use axum::extract::{Path, State};
use axum::Json;

use bazaar_commerce::checkout::{AdminStats, Order};
use bazaar_commerce::OrderId;

use crate::dto::{ApiResponse, UpdateStatusRequest};
use crate::extract::{AppJson, CurrentUser};
use crate::{ApiError, AppState};

pub(super) async fn all_orders(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = state.orders.all_orders(&principal).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

pub(super) async fn stats(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<ApiResponse<AdminStats>>, ApiError> {
    let stats = state.orders.admin_stats(&principal).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

pub(super) async fn update_status(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    principal.ensure_admin()?;
    let next = body.status()?;
    let order = state
        .orders
        .update_status(&principal, &OrderId::new(id), next)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub(super) async fn refund_order(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.orders.refund_order(&principal, &OrderId::new(id)).await?;
    Ok(Json(ApiResponse::ok(order)))
}
