//! Request-id correlation.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info_span, Instrument};

use bazaar_observability::{RequestId, REQUEST_ID_HEADER};

/// Attach a [`RequestId`] span to the request and echo the ID back.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let span = info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(id.clone());

    let mut response = next.run(req).instrument(span.clone()).await;
    if let Some(value) = id.header_value() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    span.in_scope(|| debug!(status = response.status().as_u16(), "Request completed"));
    response
}
