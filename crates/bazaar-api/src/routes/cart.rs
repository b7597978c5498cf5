use axum::extract::State;
use axum::Json;

use bazaar_commerce::cart::{CartView, MergeOutcome};

use crate::dto::{
    AddToCartRequest, ApiResponse, MergeCartRequest, RemoveFromCartRequest, UpdateCartItemRequest,
};
use crate::extract::{AppJson, CurrentUser};
use crate::{ApiError, AppState};

type CartResponse = Result<Json<ApiResponse<CartView>>, ApiError>;

pub(super) async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> CartResponse {
    let cart = state.carts.get(&principal).await?;
    Ok(Json(ApiResponse::ok(cart)))
}

pub(super) async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<AddToCartRequest>,
) -> CartResponse {
    let (product_id, variant, quantity) = body.into_parts()?;
    let cart = state
        .carts
        .add(&principal, &product_id, &variant, quantity)
        .await?;
    Ok(Json(ApiResponse::ok(cart)))
}

pub(super) async fn update_cart_item(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<UpdateCartItemRequest>,
) -> CartResponse {
    let (product_id, variant, quantity) = body.into_parts()?;
    let cart = state
        .carts
        .update(&principal, &product_id, &variant, quantity)
        .await?;
    Ok(Json(ApiResponse::ok(cart)))
}

pub(super) async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<RemoveFromCartRequest>,
) -> CartResponse {
    let (product_id, variant) = body.into_parts()?;
    let cart = state.carts.remove(&principal, &product_id, &variant).await?;
    Ok(Json(ApiResponse::ok(cart)))
}

pub(super) async fn clear_cart(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> CartResponse {
    let cart = state.carts.clear(&principal).await?;
    Ok(Json(ApiResponse::ok(cart)))
}

pub(super) async fn merge_cart(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    AppJson(body): AppJson<MergeCartRequest>,
) -> Result<Json<ApiResponse<MergeOutcome>>, ApiError> {
    let outcome = state.carts.merge(&principal, body.into_entries()).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
