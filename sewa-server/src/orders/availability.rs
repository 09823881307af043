//! Date-range availability

use shared::models::Product;

use super::period::RentalPeriod;
use crate::db::{StoreError, StoreTx};

/// Units of `product` still reservable over `period`
///
/// `stock - Σ quantity` of pending/active line items overlapping the period.
/// The result can be negative only when stock was lowered below existing
/// reservations; callers reject whenever it is below the requested quantity.
/// Call it after [`StoreTx::lock_product`] so the figure holds until commit.
pub async fn available(
    tx: &mut dyn StoreTx,
    product: &Product,
    period: RentalPeriod,
) -> Result<i64, StoreError> {
    let reserved = tx
        .reserved_quantity(product.id, period.start(), period.end())
        .await?;
    Ok(i64::from(product.stock) - reserved)
}
