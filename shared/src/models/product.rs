//! Product Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rentable product listed by a shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub sku: String,
    pub name: String,
    /// Base price per rented day, whole currency units
    pub price_per_day: i64,
    /// Discounted price per day; `0` means no discount
    pub discount_price_per_day: i64,
    /// Total units owned by the shop
    pub stock: i32,
    pub image_url: String,
}

impl Product {
    /// Discount price when one is set, otherwise the base price
    pub fn effective_daily_price(&self) -> i64 {
        if self.discount_price_per_day > 0 {
            self.discount_price_per_day
        } else {
            self.price_per_day
        }
    }
}
