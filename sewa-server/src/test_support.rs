//! Shared test fixtures: an in-memory store seeded with one customer, one
//! shop and one product, plus a scripted payment gateway.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};
use shared::models::{Customer, Order, OrderItem, OrderStatus, Product, Shop};
use uuid::Uuid;

use crate::db::memory::MemoryStore;
use crate::db::{CustomerOrderRow, RentalStore, StoreError, StoreTx};
use crate::orders::{NewOrder, NewOrderItem, RentalPeriod};
use crate::tripay::{GatewayError, MerchantConfig, PaymentGateway, TransactionRequest};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub struct Fixture {
    pub store: MemoryStore,
    pub customer: Customer,
    pub owner_id: Uuid,
    pub shop: Shop,
    /// stock 2, 100/day, discounted to 80/day
    pub product: Product,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: "Siti".into(),
            email: "siti@example.com".into(),
            phone: Some("08123456789".into()),
        };
        store.put_customer(customer.clone()).await;

        let owner_id = Uuid::new_v4();
        let shop = Shop {
            id: Uuid::new_v4(),
            user_id: owner_id,
            shop_name: "Outdoor Rent".into(),
            shop_address: "Jl. Braga 10, Bandung".into(),
            shop_phone_number: "0221234567".into(),
            shop_profile_image_url: "https://img.example.com/shop.png".into(),
        };
        store.put_shop(shop.clone()).await;

        let product = product_in(shop.id, 2, 100, 80);
        store.put_product(product.clone()).await;

        Self {
            store,
            customer,
            owner_id,
            shop,
            product,
        }
    }

    pub async fn add_product(&self, stock: i32, price: i64, discount: i64) -> Product {
        let product = product_in(self.shop.id, stock, price, discount);
        self.store.put_product(product.clone()).await;
        product
    }

    /// A second shop with its own owner
    pub async fn add_shop(&self) -> Shop {
        let shop = Shop {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            shop_name: "Other Shop".into(),
            shop_address: String::new(),
            shop_phone_number: String::new(),
            shop_profile_image_url: String::new(),
        };
        self.store.put_shop(shop.clone()).await;
        shop
    }

    pub fn order_request(&self, start: &str, end: &str, items: &[(Uuid, i32)]) -> NewOrder {
        NewOrder {
            shop_id: self.shop.id,
            payment_method: "QRIS".into(),
            period: RentalPeriod::new(date(start), date(end)).unwrap(),
            items: items
                .iter()
                .map(|&(product_id, quantity)| NewOrderItem {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }
}

pub fn product_in(shop_id: Uuid, stock: i32, price: i64, discount: i64) -> Product {
    let id = Uuid::new_v4();
    let tag = id.simple().to_string();
    Product {
        id,
        shop_id,
        sku: format!("SKU-{}", &tag[..8]),
        name: format!("Product {}", &tag[..4]),
        price_per_day: price,
        discount_price_per_day: discount,
        stock,
        image_url: String::new(),
    }
}

/// Seed an order of the fixture customer holding `quantity` units of the
/// fixture product.
pub async fn seed_order(
    fx: &Fixture,
    status: OrderStatus,
    start: &str,
    end: &str,
    quantity: i32,
) -> Uuid {
    let id = Uuid::new_v4();
    let order = Order {
        id,
        user_id: fx.customer.id,
        shop_id: fx.shop.id,
        total_price: 80 * i64::from(quantity),
        status,
        start_date: date(start),
        end_date: date(end),
        payment_method: "QRIS".into(),
        payment_reference: None,
        created_at: Utc::now(),
    };
    let item = OrderItem {
        id: Uuid::new_v4(),
        order_id: id,
        product_id: fx.product.id,
        quantity,
        daily_price: 80,
        price_at_time_of_order: 80,
    };
    fx.store.put_order(order, vec![item]).await;
    id
}

pub async fn pending_order(fx: &Fixture, quantity: i32) -> Uuid {
    seed_order(fx, OrderStatus::Pending, "2024-06-01", "2024-06-02", quantity).await
}

pub fn merchant() -> MerchantConfig {
    MerchantConfig {
        merchant_code: "T0001".into(),
        private_key: "test-private-key".into(),
        callback_url: None,
        return_url: None,
        expiry_hours: 24,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Succeed,
    Reject,
    Timeout,
}

/// Scripted gateway that records every transaction request
pub struct FakeGateway {
    mode: Mutex<GatewayMode>,
    requests: Mutex<Vec<TransactionRequest>>,
}

impl FakeGateway {
    pub fn new(mode: GatewayMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), GatewayError> {
        match *self.mode.lock().unwrap() {
            GatewayMode::Succeed => Ok(()),
            GatewayMode::Reject => Err(GatewayError::Rejected("Payment channel is not enabled".into())),
            GatewayMode::Timeout => Err(GatewayError::Timeout),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_transaction(&self, request: &TransactionRequest) -> Result<Value, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome()?;
        Ok(json!({
            "reference": format!("DEV-{}", request.merchant_ref),
            "merchant_ref": request.merchant_ref,
            "amount": request.amount,
            "payment_method": request.method,
            "checkout_url": "https://tripay.co.id/checkout/DEV",
            "status": "UNPAID",
        }))
    }

    async fn payment_channels(&self) -> Result<Value, GatewayError> {
        self.outcome()?;
        Ok(json!([
            { "group": "Virtual Account", "code": "BRIVA", "name": "BRI Virtual Account", "active": true },
            { "group": "E-Wallet", "code": "QRIS", "name": "QRIS", "active": true },
        ]))
    }
}

/// Store whose every call fails, for storage-outage paths
pub struct FailingStore;

fn offline() -> StoreError {
    StoreError::Corrupt("store offline".into())
}

#[async_trait]
impl RentalStore for FailingStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        Err(offline())
    }

    async fn find_customer(&self, _id: Uuid) -> Result<Option<Customer>, StoreError> {
        Err(offline())
    }

    async fn find_shop_by_owner(&self, _user_id: Uuid) -> Result<Option<Shop>, StoreError> {
        Err(offline())
    }

    async fn list_customer_orders(
        &self,
        _user_id: Uuid,
    ) -> Result<Vec<CustomerOrderRow>, StoreError> {
        Err(offline())
    }

    async fn list_shop_orders(
        &self,
        _shop_id: Uuid,
        _status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, StoreError> {
        Err(offline())
    }

    async fn set_payment_reference(
        &self,
        _order_id: Uuid,
        _reference: &str,
    ) -> Result<(), StoreError> {
        Err(offline())
    }

    async fn trim_callbacks(&self, _cap: i64) -> Result<u64, StoreError> {
        Err(offline())
    }
}
