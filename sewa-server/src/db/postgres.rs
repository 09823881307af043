//! PostgreSQL-backed [`RentalStore`]

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{Customer, Order, OrderItem, OrderStatus, Product, Shop};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{CustomerOrderRow, RentalStore, StoreError, StoreTx};
use super::{callbacks, customers, orders, products, shops};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RentalStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Ok(customers::find_by_id(&self.pool, id).await?)
    }

    async fn find_shop_by_owner(&self, user_id: Uuid) -> Result<Option<Shop>, StoreError> {
        Ok(shops::find_by_owner(&self.pool, user_id).await?)
    }

    async fn list_customer_orders(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CustomerOrderRow>, StoreError> {
        orders::list_for_customer(&self.pool, user_id).await
    }

    async fn list_shop_orders(
        &self,
        shop_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, StoreError> {
        orders::list_for_shop(&self.pool, shop_id, status).await
    }

    async fn set_payment_reference(
        &self,
        order_id: Uuid,
        reference: &str,
    ) -> Result<(), StoreError> {
        orders::set_payment_reference(&self.pool, order_id, reference).await
    }

    async fn trim_callbacks(&self, cap: i64) -> Result<u64, StoreError> {
        Ok(callbacks::trim(&self.pool, cap).await?)
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn find_shop(&mut self, id: Uuid) -> Result<Option<Shop>, StoreError> {
        Ok(shops::find_by_id(&mut *self.tx, id).await?)
    }

    async fn lock_product(&mut self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(products::lock(&mut self.tx, id).await?)
    }

    async fn reserved_quantity(
        &mut self,
        product_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, StoreError> {
        orders::reserved_quantity(&mut self.tx, product_id, start, end).await
    }

    async fn insert_order(&mut self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError> {
        orders::insert(&mut self.tx, order, items).await
    }

    async fn lock_order(&mut self, id: Uuid) -> Result<Option<Order>, StoreError> {
        orders::lock(&mut self.tx, id).await
    }

    async fn update_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        orders::update_status(&mut self.tx, id, status).await
    }

    async fn record_callback(
        &mut self,
        merchant_ref: &str,
        status: &str,
        received_at: i64,
    ) -> Result<bool, StoreError> {
        Ok(callbacks::record(&mut self.tx, merchant_ref, status, received_at).await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
