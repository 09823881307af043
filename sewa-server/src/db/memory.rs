//! In-memory [`RentalStore`] for tests
//!
//! A transaction holds the whole dataset behind an async mutex and works on a
//! staged copy; `commit` writes the copy back, dropping discards it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{Customer, Order, OrderItem, OrderStatus, Product, Shop};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{CustomerOrderRow, RentalStore, StoreError, StoreTx};

#[derive(Debug, Clone)]
pub struct CallbackRecord {
    pub id: i64,
    pub merchant_ref: String,
    pub status: String,
    pub received_at: i64,
}

#[derive(Debug, Clone, Default)]
struct Data {
    customers: HashMap<Uuid, Customer>,
    shops: HashMap<Uuid, Shop>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
    items: Vec<OrderItem>,
    callbacks: Vec<CallbackRecord>,
    next_callback_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Data>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_customer(&self, customer: Customer) {
        self.data.lock().await.customers.insert(customer.id, customer);
    }

    pub async fn put_shop(&self, shop: Shop) {
        self.data.lock().await.shops.insert(shop.id, shop);
    }

    pub async fn put_product(&self, product: Product) {
        self.data.lock().await.products.insert(product.id, product);
    }

    /// Seed an existing order with its items
    pub async fn put_order(&self, order: Order, items: Vec<OrderItem>) {
        let mut data = self.data.lock().await;
        data.orders.insert(order.id, order);
        data.items.extend(items);
    }

    pub async fn order(&self, id: Uuid) -> Option<Order> {
        self.data.lock().await.orders.get(&id).cloned()
    }

    pub async fn order_count(&self) -> usize {
        self.data.lock().await.orders.len()
    }

    pub async fn items_of(&self, order_id: Uuid) -> Vec<OrderItem> {
        self.data
            .lock()
            .await
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    pub async fn callbacks(&self) -> Vec<CallbackRecord> {
        self.data.lock().await.callbacks.clone()
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<Data>,
    staged: Data,
}

#[async_trait]
impl RentalStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let guard = self.data.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Ok(self.data.lock().await.customers.get(&id).cloned())
    }

    async fn find_shop_by_owner(&self, user_id: Uuid) -> Result<Option<Shop>, StoreError> {
        let data = self.data.lock().await;
        Ok(data.shops.values().find(|s| s.user_id == user_id).cloned())
    }

    async fn list_customer_orders(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CustomerOrderRow>, StoreError> {
        let data = self.data.lock().await;
        let mut orders: Vec<&Order> = data.orders.values().filter(|o| o.user_id == user_id).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let mut rows = Vec::new();
        for order in orders {
            let shop = data
                .shops
                .get(&order.shop_id)
                .ok_or_else(|| StoreError::Corrupt(format!("shop {}", order.shop_id)))?;
            for item in data.items.iter().filter(|i| i.order_id == order.id) {
                let product = data
                    .products
                    .get(&item.product_id)
                    .ok_or_else(|| StoreError::Corrupt(format!("product {}", item.product_id)))?;
                rows.push(CustomerOrderRow {
                    order_id: order.id,
                    total_price: order.total_price,
                    status: order.status,
                    start_date: order.start_date,
                    end_date: order.end_date,
                    created_at: order.created_at,
                    payment_method: order.payment_method.clone(),
                    shop: shop.clone(),
                    product_name: product.name.clone(),
                    product_image_url: product.image_url.clone(),
                    quantity: item.quantity,
                    price_at_time_of_order: item.price_at_time_of_order,
                });
            }
        }
        Ok(rows)
    }

    async fn list_shop_orders(
        &self,
        shop_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, StoreError> {
        let data = self.data.lock().await;
        let mut orders: Vec<Order> = data
            .orders
            .values()
            .filter(|o| o.shop_id == shop_id && status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn set_payment_reference(
        &self,
        order_id: Uuid,
        reference: &str,
    ) -> Result<(), StoreError> {
        if let Some(order) = self.data.lock().await.orders.get_mut(&order_id) {
            order.payment_reference = Some(reference.to_string());
        }
        Ok(())
    }

    async fn trim_callbacks(&self, cap: i64) -> Result<u64, StoreError> {
        let mut data = self.data.lock().await;
        let keep = usize::try_from(cap.max(0)).unwrap_or(usize::MAX);
        let excess = data.callbacks.len().saturating_sub(keep);
        // Ids grow with insertion, so the front is the oldest
        data.callbacks.sort_by_key(|c| c.id);
        data.callbacks.drain(..excess);
        Ok(excess as u64)
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn find_shop(&mut self, id: Uuid) -> Result<Option<Shop>, StoreError> {
        Ok(self.staged.shops.get(&id).cloned())
    }

    async fn lock_product(&mut self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.staged.products.get(&id).cloned())
    }

    async fn reserved_quantity(
        &mut self,
        product_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, StoreError> {
        let staged = &self.staged;
        Ok(staged
            .items
            .iter()
            .filter(|i| i.product_id == product_id)
            .filter(|i| {
                staged.orders.get(&i.order_id).is_some_and(|o| {
                    o.status.holds_stock() && o.start_date <= end && o.end_date >= start
                })
            })
            .map(|i| i64::from(i.quantity))
            .sum())
    }

    async fn insert_order(&mut self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError> {
        self.staged.orders.insert(order.id, order.clone());
        self.staged.items.extend_from_slice(items);
        Ok(())
    }

    async fn lock_order(&mut self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.staged.orders.get(&id).cloned())
    }

    async fn update_order_status(
        &mut self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        if let Some(order) = self.staged.orders.get_mut(&id) {
            order.status = status;
        }
        Ok(())
    }

    async fn record_callback(
        &mut self,
        merchant_ref: &str,
        status: &str,
        received_at: i64,
    ) -> Result<bool, StoreError> {
        let seen = self
            .staged
            .callbacks
            .iter()
            .any(|c| c.merchant_ref == merchant_ref && c.status == status);
        if seen {
            return Ok(false);
        }
        self.staged.next_callback_id += 1;
        let id = self.staged.next_callback_id;
        self.staged.callbacks.push(CallbackRecord {
            id,
            merchant_ref: merchant_ref.to_string(),
            status: status.to_string(),
            received_at,
        });
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dropped_transaction_discards_changes() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            assert!(tx.record_callback("ref-1", "PAID", 1).await.unwrap());
        }
        assert!(store.callbacks().await.is_empty());

        let mut tx = store.begin().await.unwrap();
        assert!(tx.record_callback("ref-1", "PAID", 1).await.unwrap());
        tx.commit().await.unwrap();
        assert_eq!(store.callbacks().await.len(), 1);
    }

    #[tokio::test]
    async fn test_trim_removes_oldest_first() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        for n in 0..5 {
            tx.record_callback(&format!("ref-{n}"), "PAID", n).await.unwrap();
        }
        tx.commit().await.unwrap();

        assert_eq!(store.trim_callbacks(2).await.unwrap(), 3);
        let left: Vec<String> = store
            .callbacks()
            .await
            .into_iter()
            .map(|c| c.merchant_ref)
            .collect();
        assert_eq!(left, vec!["ref-3", "ref-4"]);
        assert_eq!(store.trim_callbacks(2).await.unwrap(), 0);
    }
}
