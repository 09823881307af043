//! Status transitions driven by customers and shops
//!
//! Every transition locks the order row for the check-then-set.

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus, StatusChange};
use uuid::Uuid;

use crate::db::RentalStore;
use crate::error::ServiceResult;

/// Customer cancellation: only the owner, only while `pending`
pub async fn cancel_by_customer(
    store: &dyn RentalStore,
    customer_id: Uuid,
    order_id: Uuid,
) -> ServiceResult<Order> {
    let mut tx = store.begin().await?;

    let mut order = tx
        .lock_order(order_id)
        .await?
        .filter(|o| o.user_id == customer_id)
        .ok_or_else(|| {
            AppError::forbidden("Order not found or you do not have permission to cancel it")
        })?;

    if order.status != OrderStatus::Pending {
        return Err(AppError::new(ErrorCode::OrderNotCancellable)
            .with_detail("status", order.status.as_db())
            .into());
    }

    tx.update_order_status(order.id, OrderStatus::Cancelled)
        .await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id, "Order cancelled by customer");
    order.status = OrderStatus::Cancelled;
    Ok(order)
}

/// Shop-side status update along the transition table.
///
/// Re-applying the current status succeeds without a write.
pub async fn update_by_shop(
    store: &dyn RentalStore,
    owner_id: Uuid,
    order_id: Uuid,
    next: OrderStatus,
) -> ServiceResult<Order> {
    let shop = store
        .find_shop_by_owner(owner_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShopOwnerRequired))?;

    let mut tx = store.begin().await?;

    let mut order = tx.lock_order(order_id).await?.ok_or_else(|| {
        AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id.to_string())
    })?;
    if order.shop_id != shop.id {
        return Err(AppError::forbidden("You do not have permission to edit this order").into());
    }

    match order.status.plan_transition(next) {
        Ok(StatusChange::Unchanged(_)) => Ok(order),
        Ok(StatusChange::Changed { from, to }) => {
            tx.update_order_status(order.id, to).await?;
            tx.commit().await?;
            tracing::info!(
                order_id = %order.id,
                shop_id = %shop.id,
                from = %from,
                to = %to,
                "Order status updated by shop"
            );
            order.status = to;
            Ok(order)
        }
        Err(e) => Err(AppError::with_message(ErrorCode::OrderInvalidTransition, e.to_string())
            .with_detail("from", e.from.as_db())
            .with_detail("to", e.to.as_db())
            .into()),
    }
}
