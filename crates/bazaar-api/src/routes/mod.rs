//! Route table.

mod admin;
mod cart;
mod orders;
mod products;

use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id;
use crate::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product).put(products::update_product),
        )
        .route("/products/:id/stock", patch(products::update_stock))
        .route("/products/:id/stock/adjust", post(products::adjust_stock))
        .route("/products/:id/stock/history", get(products::stock_history))
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/update", patch(cart::update_cart_item))
        .route("/cart/remove", delete(cart::remove_from_cart))
        .route("/cart/clear", delete(cart::clear_cart))
        .route("/cart/merge", post(cart::merge_cart))
        .route("/orders/checkout", post(orders::checkout))
        .route("/orders/payment-verification", post(orders::verify_payment))
        .route("/orders/my-orders", get(orders::my_orders))
        .route("/orders/admin/all", get(admin::all_orders))
        .route("/orders/admin/stats", get(admin::stats))
        .route("/orders/admin/:id/status", patch(admin::update_status))
        .route("/orders/admin/:id/refund", patch(admin::refund_order))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/cancel", patch(orders::cancel_order));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "success": true, "data": { "status": "ok" } }))
}
