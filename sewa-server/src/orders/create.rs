//! Order construction
//!
//! Validation, availability, pricing and persistence of one order as a
//! single atomic unit. The payment step runs afterwards, see [`super::checkout`].

use std::collections::BTreeMap;

use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, Order, OrderItem, OrderStatus};
use uuid::Uuid;

use super::availability::available;
use super::period::RentalPeriod;
use super::pricing::quote;
use crate::db::RentalStore;
use crate::error::ServiceResult;

/// Validated order request
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub shop_id: Uuid,
    pub payment_method: String,
    pub period: RentalPeriod,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Persisted line item with the product facts the gateway manifest needs
#[derive(Debug, Clone)]
pub struct PlacedLine {
    pub item: OrderItem,
    pub sku: String,
    pub name: String,
}

/// A committed `pending` order
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub lines: Vec<PlacedLine>,
    pub customer: Customer,
}

/// Merge repeated products, summing quantities. Keys come out in ascending
/// id order, which is also the product lock order.
fn merge_items(items: &[NewOrderItem]) -> Result<BTreeMap<Uuid, i32>, AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    let mut merged = BTreeMap::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(
                AppError::invalid_field("quantity", "Quantity must be greater than zero")
                    .with_detail("product_id", item.product_id.to_string()),
            );
        }
        let qty: &mut i32 = merged.entry(item.product_id).or_insert(0);
        *qty = qty.checked_add(item.quantity).ok_or_else(|| {
            AppError::new(ErrorCode::ValueOutOfRange)
                .with_detail("field", "quantity")
                .with_detail("product_id", item.product_id.to_string())
        })?;
    }
    Ok(merged)
}

/// Create a `pending` order for `customer_id`.
///
/// All-or-nothing: the first failing item aborts the unit and nothing is
/// written. Product rows stay locked from the availability read to commit,
/// so concurrent orders for the same product are linearized.
pub async fn place_order(
    store: &dyn RentalStore,
    customer_id: Uuid,
    req: NewOrder,
) -> ServiceResult<PlacedOrder> {
    let merged = merge_items(&req.items)?;
    let payment_method = req.payment_method.trim();
    if payment_method.is_empty() {
        return Err(AppError::new(ErrorCode::PaymentInvalidMethod).into());
    }

    let customer = store
        .find_customer(customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

    let mut tx = store.begin().await?;

    if tx.find_shop(req.shop_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::ShopNotFound)
            .with_detail("shop_id", req.shop_id.to_string())
            .into());
    }

    let order_id = Uuid::new_v4();
    let days = req.period.billable_days();
    let mut total: i64 = 0;
    let mut lines = Vec::with_capacity(merged.len());

    for (product_id, quantity) in merged {
        let product = tx.lock_product(product_id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound)
                .with_detail("product_id", product_id.to_string())
        })?;
        if product.shop_id != req.shop_id {
            return Err(AppError::new(ErrorCode::ProductNotInShop)
                .with_detail("product_id", product_id.to_string())
                .into());
        }

        let free = available(tx.as_mut(), &product, req.period).await?;
        if free < i64::from(quantity) {
            tracing::info!(
                product_id = %product_id,
                requested = quantity,
                available = free,
                "Insufficient stock for requested period"
            );
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "Stock for product {} is not available on the selected dates",
                    product.name
                ),
            )
            .with_detail("product_id", product_id.to_string())
            .with_detail("requested", quantity)
            .with_detail("available", free.max(0))
            .into());
        }

        let q = quote(&product, quantity, days).ok_or_else(|| {
            AppError::new(ErrorCode::OrderTotalOverflow)
                .with_detail("product_id", product_id.to_string())
        })?;
        total = total
            .checked_add(q.line_total)
            .ok_or_else(|| AppError::new(ErrorCode::OrderTotalOverflow))?;

        lines.push(PlacedLine {
            item: OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id,
                quantity,
                daily_price: q.daily_price,
                price_at_time_of_order: q.unit_price,
            },
            sku: product.sku,
            name: product.name,
        });
    }

    let order = Order {
        id: order_id,
        user_id: customer_id,
        shop_id: req.shop_id,
        total_price: total,
        status: OrderStatus::Pending,
        start_date: req.period.start(),
        end_date: req.period.end(),
        payment_method: payment_method.to_string(),
        payment_reference: None,
        created_at: Utc::now(),
    };
    let items: Vec<OrderItem> = lines.iter().map(|l| l.item.clone()).collect();

    tx.insert_order(&order, &items).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        shop_id = %order.shop_id,
        total_price = order.total_price,
        items = items.len(),
        "Order created"
    );

    Ok(PlacedOrder {
        order,
        lines,
        customer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: Uuid, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_merge_sums_duplicates_in_id_order() {
        let a = Uuid::from_u128(2);
        let b = Uuid::from_u128(1);
        let merged = merge_items(&[item(a, 1), item(b, 2), item(a, 3)]).unwrap();
        let pairs: Vec<(Uuid, i32)> = merged.into_iter().collect();
        assert_eq!(pairs, vec![(b, 2), (a, 4)]);
    }

    #[test]
    fn test_merge_rejects_empty_and_non_positive() {
        assert_eq!(merge_items(&[]).unwrap_err().code, ErrorCode::OrderEmpty);
        let err = merge_items(&[item(Uuid::from_u128(1), 0)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let err = merge_items(&[item(Uuid::from_u128(1), -2)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_merge_rejects_quantity_overflow() {
        let id = Uuid::from_u128(7);
        let err = merge_items(&[item(id, i32::MAX), item(id, 1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
