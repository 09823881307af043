//! Price snapshots

use shared::models::Product;

/// Prices of one line item, frozen at order time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Effective daily rate
    pub daily_price: i64,
    /// One unit for the whole period (`daily_price * days`)
    pub unit_price: i64,
    /// `unit_price * quantity`
    pub line_total: i64,
}

/// Quote `quantity` units of `product` for `days` billable days.
///
/// `None` when any product overflows `i64`.
pub fn quote(product: &Product, quantity: i32, days: i64) -> Option<Quote> {
    let daily_price = product.effective_daily_price();
    let unit_price = daily_price.checked_mul(days)?;
    let line_total = unit_price.checked_mul(i64::from(quantity))?;
    Some(Quote {
        daily_price,
        unit_price,
        line_total,
    })
}
