//! Customer order history

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderHistory, OrderHistoryItem, OrderStatus, ProductSummary};
use uuid::Uuid;

use crate::db::{CustomerOrderRow, RentalStore};
use crate::error::ServiceResult;

/// Group flattened `(order × item)` rows into one entry per order.
///
/// Rows of one order are contiguous and orders arrive newest first; the
/// output keeps that order.
pub fn group_rows(rows: Vec<CustomerOrderRow>) -> Vec<OrderHistory> {
    let mut history: Vec<OrderHistory> = Vec::new();
    for row in rows {
        let item = OrderHistoryItem {
            product: ProductSummary {
                name: row.product_name,
                image_url: row.product_image_url,
            },
            quantity: row.quantity,
            price_at_time_of_order: row.price_at_time_of_order,
        };
        match history.last_mut() {
            Some(entry) if entry.id == row.order_id => entry.items.push(item),
            _ => history.push(OrderHistory {
                id: row.order_id,
                shop: row.shop.summary(),
                total_price: row.total_price,
                status: row.status,
                start_date: row.start_date,
                end_date: row.end_date,
                created_at: row.created_at,
                payment_method: row.payment_method,
                items: vec![item],
            }),
        }
    }
    history
}

pub async fn customer_history(
    store: &dyn RentalStore,
    customer_id: Uuid,
) -> ServiceResult<Vec<OrderHistory>> {
    let rows = store.list_customer_orders(customer_id).await?;
    Ok(group_rows(rows))
}

/// Orders of the caller's shop, newest first
pub async fn shop_orders(
    store: &dyn RentalStore,
    owner_id: Uuid,
    status: Option<OrderStatus>,
) -> ServiceResult<Vec<Order>> {
    let shop = store
        .find_shop_by_owner(owner_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShopOwnerRequired))?;
    Ok(store.list_shop_orders(shop.id, status).await?)
}
