use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bazaar_commerce::checkout::{CheckoutReceipt, Order};
use bazaar_commerce::OrderId;

use crate::dto::{ApiResponse, CheckoutRequest, PaymentVerificationRequest};
use crate::extract::{AppJson, CurrentUser};
use crate::{ApiError, AppState};

pub(super) async fn checkout(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutReceipt>>), ApiError> {
    let shipping_info = body.into_shipping_info()?;
    let receipt = state.orders.checkout(&principal, shipping_info).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(receipt))))
}

pub(super) async fn verify_payment(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<PaymentVerificationRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let confirmation = body.into_confirmation()?;
    let order = state.orders.verify_payment(&principal, &confirmation).await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub(super) async fn my_orders(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = state.orders.my_orders(&principal).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

pub(super) async fn get_order(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.orders.order(&principal, &OrderId::new(id)).await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub(super) async fn cancel_order(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state.orders.cancel_order(&principal, &OrderId::new(id)).await?;
    Ok(Json(ApiResponse::ok(order)))
}
