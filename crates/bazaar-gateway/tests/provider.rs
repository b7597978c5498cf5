//! RazorpayGateway against a local stand-in for the provider API.

use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};

use bazaar_commerce::payment::PaymentGateway;
use bazaar_commerce::{Currency, Money};
use bazaar_gateway::RazorpayGateway;

async fn create_order(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let expected = format!("Basic {}", general_purpose::STANDARD.encode("key_1:secret_1"));
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": "BAD_REQUEST_ERROR", "description": "Authentication failed"}})),
        );
    }
    if body["payment_capture"] != json!(1) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": {"description": "capture flag"}})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": "order_TEST123",
            "entity": "order",
            "amount": body["amount"],
            "currency": body["currency"],
            "receipt": body["receipt"],
            "status": "created"
        })),
    )
}

async fn spawn_provider() -> String {
    let app = Router::new().route("/v1/orders", post(create_order));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_create_intent() {
    let base = spawn_provider().await;
    let gateway = RazorpayGateway::new("key_1", "secret_1").unwrap().with_base_url(base);

    let intent = gateway
        .create_intent(Money::new(116_200, Currency::INR), "ord-1")
        .await
        .unwrap();
    assert_eq!(intent.id, "order_TEST123");
    assert_eq!(intent.amount.amount_minor, 116_200);
    assert_eq!(intent.receipt, "ord-1");
}

#[tokio::test]
async fn test_rejected_credentials_are_payment_init() {
    let base = spawn_provider().await;
    let gateway = RazorpayGateway::new("key_1", "wrong").unwrap().with_base_url(base);

    let err = gateway
        .create_intent(Money::new(5_000, Currency::INR), "ord-2")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "PaymentInitError");
    assert!(err.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn test_unreachable_provider_is_payment_init() {
    let gateway = RazorpayGateway::new("key_1", "secret_1")
        .unwrap()
        .with_base_url("http://127.0.0.1:1");

    let err = gateway
        .create_intent(Money::new(5_000, Currency::INR), "ord-3")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn test_zero_amount_never_leaves_process() {
    let gateway = RazorpayGateway::new("key_1", "secret_1")
        .unwrap()
        .with_base_url("http://127.0.0.1:1");
    let err = gateway
        .create_intent(Money::zero(Currency::INR), "ord-4")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("must be positive"));
}
