//! Payment callback processing
//!
//! Verified callbacks move an order to `active` (PAID) or `cancelled`
//! (anything else). Each `(merchant_ref, status)` is applied at most once:
//! the ledger row and the status change commit together, so a replay finds
//! the row and does nothing.

use std::sync::Arc;

use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderStatus, StatusChange};
use uuid::Uuid;

use crate::db::RentalStore;
use crate::error::ServiceResult;
use crate::tripay::signature::verify_callback;

/// What a verified callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Applied {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    /// Order already had the mapped status
    Unchanged,
    /// Same `(merchant_ref, status)` was processed before
    Replayed,
    /// No order matches `merchant_ref`
    UnknownOrder,
    /// Mapped status is not reachable from the current one
    Rejected,
    /// Storage failed; logged, still acknowledged
    Failed,
}

impl CallbackOutcome {
    /// Whether this callback added a ledger row
    pub fn recorded(&self) -> bool {
        !matches!(self, Self::Replayed | Self::Failed)
    }
}

#[derive(Debug, Deserialize)]
struct CallbackBody {
    status: Option<String>,
    merchant_ref: Option<String>,
}

/// Gateway status to order status
pub fn map_status(external: &str) -> OrderStatus {
    if external == "PAID" {
        OrderStatus::Active
    } else {
        OrderStatus::Cancelled
    }
}

/// Verify and apply one callback.
///
/// Only a bad signature or an unusable body is an `Err`; once both pass
/// the callback is acknowledged whatever happens to the order.
pub async fn handle_callback(
    store: &dyn RentalStore,
    private_key: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<CallbackOutcome, AppError> {
    let verified = signature.is_some_and(|s| verify_callback(private_key, body, s));
    if !verified {
        tracing::warn!(
            has_header = signature.is_some(),
            "Callback signature verification failed"
        );
        return Err(AppError::new(ErrorCode::SignatureInvalid));
    }

    let parsed: CallbackBody = serde_json::from_slice(body).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid callback body: {e}"))
    })?;
    let status = parsed
        .status
        .ok_or_else(|| AppError::with_message(ErrorCode::RequiredField, "status is required"))?;
    let merchant_ref = parsed.merchant_ref.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "merchant_ref is required")
    })?;

    tracing::info!(
        merchant_ref = %merchant_ref,
        status = %status,
        "Received payment callback"
    );

    match apply(store, &merchant_ref, &status).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            tracing::error!(
                merchant_ref = %merchant_ref,
                status = %status,
                error = ?e,
                "Failed to apply payment callback"
            );
            Ok(CallbackOutcome::Failed)
        }
    }
}

async fn apply(
    store: &dyn RentalStore,
    merchant_ref: &str,
    external_status: &str,
) -> ServiceResult<CallbackOutcome> {
    let mut tx = store.begin().await?;

    let now = shared::util::now_millis();
    if !tx.record_callback(merchant_ref, external_status, now).await? {
        tracing::info!(
            merchant_ref = %merchant_ref,
            status = %external_status,
            "Duplicate payment callback, skipping"
        );
        return Ok(CallbackOutcome::Replayed);
    }

    let order = match Uuid::parse_str(merchant_ref) {
        Ok(id) => tx.lock_order(id).await?,
        Err(_) => None,
    };
    let Some(order) = order else {
        tx.commit().await?;
        tracing::warn!(merchant_ref = %merchant_ref, "Callback for unknown order");
        return Ok(CallbackOutcome::UnknownOrder);
    };

    let target = map_status(external_status);
    let outcome = match order.status.plan_transition(target) {
        Ok(StatusChange::Unchanged(_)) => CallbackOutcome::Unchanged,
        Ok(StatusChange::Changed { from, to }) => {
            tx.update_order_status(order.id, to).await?;
            CallbackOutcome::Applied {
                order_id: order.id,
                from,
                to,
            }
        }
        Err(e) => {
            tracing::warn!(
                order_id = %order.id,
                status = %external_status,
                error = %e,
                "Callback status not applicable, ignoring"
            );
            CallbackOutcome::Rejected
        }
    };
    tx.commit().await?;

    if let CallbackOutcome::Applied { order_id, from, to } = outcome {
        tracing::info!(order_id = %order_id, from = %from, to = %to, "Order settled");
    }
    Ok(outcome)
}

/// Trim the callback ledger to `cap` rows in the background, oldest first.
///
/// Best effort: the cap is enforced eventually, never on the request path.
pub fn spawn_ledger_trim(store: Arc<dyn RentalStore>, cap: i64) {
    tokio::spawn(async move {
        match store.trim_callbacks(cap).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, cap, "Trimmed payment callback ledger"),
            Err(e) => tracing::warn!(error = %e, "Failed to trim payment callback ledger"),
        }
    });
}
