//! Order placement followed by the payment request

use serde_json::Value;
use shared::error::AppError;
use uuid::Uuid;

use super::create::{NewOrder, place_order};
use crate::db::RentalStore;
use crate::error::ServiceResult;
use crate::tripay::{MerchantConfig, PaymentGateway, TransactionRequest};

/// Place the order, then open the gateway transaction for it.
///
/// The gateway call runs after commit. When it fails the order stays
/// `pending` without a payment reference and the error carries `order_id`
/// so the client can reconcile.
pub async fn checkout(
    store: &dyn RentalStore,
    gateway: &dyn PaymentGateway,
    merchant: &MerchantConfig,
    customer_id: Uuid,
    req: NewOrder,
) -> ServiceResult<Value> {
    let placed = place_order(store, customer_id, req).await?;
    let order_id = placed.order.id;

    let outcome = match TransactionRequest::build(&placed, merchant, shared::util::now_secs()) {
        Ok(request) => gateway.create_transaction(&request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(data) => {
            if let Some(reference) = data.get("reference").and_then(Value::as_str) {
                if let Err(e) = store.set_payment_reference(order_id, reference).await {
                    tracing::warn!(
                        order_id = %order_id,
                        reference = reference,
                        error = %e,
                        "Failed to store payment reference"
                    );
                }
            }
            Ok(data)
        }
        Err(e) => {
            tracing::warn!(
                order_id = %order_id,
                error = %e,
                "Payment transaction failed, order left pending"
            );
            Err(AppError::from(e)
                .with_detail("order_id", order_id.to_string())
                .into())
        }
    }
}
