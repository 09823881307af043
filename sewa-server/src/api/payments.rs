//! Payment gateway endpoints
//!
//! POST /api/v1/payments/callback: gateway callback (raw body for signature verification)

use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{Value, json};
use shared::error::{AppError, AppResult};

use crate::auth::CustomerIdentity;
use crate::settlement;
use crate::state::AppState;

/// GET /api/v1/payment-channels: gateway channel list, verbatim
pub async fn payment_channels(
    State(state): State<AppState>,
    Extension(_identity): Extension<CustomerIdentity>,
) -> AppResult<Json<Value>> {
    let channels = state.gateway.payment_channels().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to fetch payment channels");
        AppError::from(e)
    })?;
    Ok(Json(channels))
}

/// Handle an incoming gateway callback
///
/// Must receive raw body (not JSON) for HMAC signature verification.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let signature = headers
        .get("x-callback-signature")
        .and_then(|v| v.to_str().ok());

    let outcome = settlement::handle_callback(
        state.store.as_ref(),
        &state.merchant.private_key,
        &body,
        signature,
    )
    .await?;

    if outcome.recorded() {
        settlement::spawn_ledger_trim(state.store.clone(), state.callback_history_cap);
    }

    Ok(Json(json!({ "success": true })))
}
