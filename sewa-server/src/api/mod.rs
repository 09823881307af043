//! API routes for sewa-server

pub mod health;
pub mod orders;
pub mod payments;
pub mod shops;


use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use http::HeaderName;
use shared::error::{AppError, ErrorCode};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::customer_auth::customer_auth_middleware;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static("x-request-id");

    // Customer / shop API (JWT authenticated)
    let authenticated = Router::new()
        .route("/api/v1/orders", post(orders::create_order))
        .route("/api/v1/orders/me", get(orders::my_orders))
        .route("/api/v1/orders/{id}/cancel", post(orders::cancel_order))
        .route("/api/v1/orders/{id}/status", put(orders::update_order_status))
        .route("/api/v1/shops/me/orders", get(shops::shop_orders))
        .route("/api/v1/payment-channels", get(payments::payment_channels))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            customer_auth_middleware,
        ));

    // Gateway callback (signature-verified, raw body)
    let callback = Router::new().route("/api/v1/payments/callback", post(payments::callback));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(callback)
        .merge(authenticated)
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// Unwrap a JSON body, answering malformed input with `ValidationFailed`
/// instead of the framework's plain-text rejection.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        AppError::with_message(ErrorCode::ValidationFailed, "Invalid request body")
            .with_detail("reason", rejection.body_text())
    })
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<uuid::Uuid, AppError> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| AppError::invalid_field(field, format!("Invalid {field}, expected a UUID")))
}
