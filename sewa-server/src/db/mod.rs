//! Database access layer
//!
//! Services reach storage through [`RentalStore`] (pool-level reads) and
//! [`StoreTx`] (one atomic unit). The PostgreSQL backend lives in the
//! per-table modules and is wired up by [`PgStore`]; tests use
//! [`memory::MemoryStore`].

pub mod callbacks;
pub mod customers;
pub mod orders;
pub mod products;
pub mod shops;

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{Customer, Order, OrderItem, OrderStatus, Product, Shop};
use thiserror::Error;
use uuid::Uuid;

/// Storage-layer error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A row that violates a model invariant (e.g. unknown status string)
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// One line of a customer's order history, flattened (order × item)
#[derive(Debug, Clone)]
pub struct CustomerOrderRow {
    pub order_id: Uuid,
    pub total_price: i64,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub payment_method: String,
    pub shop: Shop,
    pub product_name: String,
    pub product_image_url: String,
    pub quantity: i32,
    pub price_at_time_of_order: i64,
}

/// Pool-level storage operations
#[async_trait]
pub trait RentalStore: Send + Sync + 'static {
    /// Start an atomic unit. Dropping it without [`StoreTx::commit`] rolls back.
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError>;

    /// The shop owned by `user_id`, if any
    async fn find_shop_by_owner(&self, user_id: Uuid) -> Result<Option<Shop>, StoreError>;

    /// Flattened history rows, newest order first
    async fn list_customer_orders(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CustomerOrderRow>, StoreError>;

    /// Orders of a shop, newest first
    async fn list_shop_orders(
        &self,
        shop_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, StoreError>;

    async fn set_payment_reference(
        &self,
        order_id: Uuid,
        reference: &str,
    ) -> Result<(), StoreError>;

    /// Delete the oldest callback ledger rows beyond `cap`. Returns rows removed.
    async fn trim_callbacks(&self, cap: i64) -> Result<u64, StoreError>;
}

/// Operations inside one atomic unit
#[async_trait]
pub trait StoreTx: Send {
    async fn find_shop(&mut self, id: Uuid) -> Result<Option<Shop>, StoreError>;

    /// Load a product and hold its row lock until the unit ends
    async fn lock_product(&mut self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Units of `product_id` held by pending/active orders whose range
    /// overlaps `[start, end]` (inclusive on both ends)
    async fn reserved_quantity(
        &mut self,
        product_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, StoreError>;

    async fn insert_order(&mut self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError>;

    /// Load an order and hold its row lock until the unit ends
    async fn lock_order(&mut self, id: Uuid) -> Result<Option<Order>, StoreError>;

    async fn update_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<(), StoreError>;

    /// Record a verified gateway callback. `false` when `(merchant_ref, status)`
    /// was already recorded.
    async fn record_callback(
        &mut self,
        merchant_ref: &str,
        status: &str,
        received_at: i64,
    ) -> Result<bool, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
