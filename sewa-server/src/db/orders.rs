//! Orders and order items

use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{Order, OrderItem, OrderStatus, Shop};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{CustomerOrderRow, StoreError};

const ORDER_COLUMNS: &str = "id, user_id, shop_id, total_price, status, start_date, end_date, \
                             payment_method, payment_reference, created_at";

#[derive(sqlx::FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub total_price: i64,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            status: parse_status(&row.status)?,
            id: row.id,
            user_id: row.user_id,
            shop_id: row.shop_id,
            total_price: row.total_price,
            start_date: row.start_date,
            end_date: row.end_date,
            payment_method: row.payment_method,
            payment_reference: row.payment_reference,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CustomerOrderRecord {
    order_id: Uuid,
    total_price: i64,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
    payment_method: String,
    shop_id: Uuid,
    shop_owner_id: Uuid,
    shop_name: String,
    shop_address: String,
    shop_phone_number: String,
    shop_profile_image_url: String,
    product_name: String,
    product_image_url: String,
    quantity: i32,
    price_at_time_of_order: i64,
}

impl TryFrom<CustomerOrderRecord> for CustomerOrderRow {
    type Error = StoreError;

    fn try_from(r: CustomerOrderRecord) -> Result<Self, Self::Error> {
        Ok(CustomerOrderRow {
            status: parse_status(&r.status)?,
            order_id: r.order_id,
            total_price: r.total_price,
            start_date: r.start_date,
            end_date: r.end_date,
            created_at: r.created_at,
            payment_method: r.payment_method,
            shop: Shop {
                id: r.shop_id,
                user_id: r.shop_owner_id,
                shop_name: r.shop_name,
                shop_address: r.shop_address,
                shop_phone_number: r.shop_phone_number,
                shop_profile_image_url: r.shop_profile_image_url,
            },
            product_name: r.product_name,
            product_image_url: r.product_image_url,
            quantity: r.quantity,
            price_at_time_of_order: r.price_at_time_of_order,
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, StoreError> {
    OrderStatus::from_db(s).ok_or_else(|| StoreError::Corrupt(format!("order status {s:?}")))
}

/// Load an order with `FOR UPDATE`
pub async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    row.map(Order::try_from).transpose()
}

pub async fn insert(
    conn: &mut PgConnection,
    order: &Order,
    items: &[OrderItem],
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, shop_id, total_price, status, start_date, end_date,
                             payment_method, payment_reference, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.shop_id)
    .bind(order.total_price)
    .bind(order.status.as_db())
    .bind(order.start_date)
    .bind(order.end_date)
    .bind(&order.payment_method)
    .bind(&order.payment_reference)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, quantity, daily_price,
                                      price_at_time_of_order)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.daily_price)
        .bind(item.price_at_time_of_order)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn update_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: OrderStatus,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
        .bind(status.as_db())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Units of a product held by pending/active orders overlapping `[start, end]`
pub async fn reserved_quantity(
    conn: &mut PgConnection,
    product_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, StoreError> {
    let reserved: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(oi.quantity), 0)::BIGINT
         FROM order_items oi
         JOIN orders o ON o.id = oi.order_id
         WHERE oi.product_id = $1
           AND o.status IN ('pending', 'active')
           AND o.start_date <= $3
           AND o.end_date >= $2",
    )
    .bind(product_id)
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await?;
    Ok(reserved)
}

pub async fn list_for_customer(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CustomerOrderRow>, StoreError> {
    let records: Vec<CustomerOrderRecord> = sqlx::query_as(
        "SELECT o.id AS order_id, o.total_price, o.status, o.start_date, o.end_date,
                o.created_at, o.payment_method,
                s.id AS shop_id, s.user_id AS shop_owner_id, s.shop_name, s.shop_address,
                s.shop_phone_number, s.shop_profile_image_url,
                p.name AS product_name, p.image_url AS product_image_url,
                oi.quantity, oi.price_at_time_of_order
         FROM orders o
         JOIN shops s ON s.id = o.shop_id
         JOIN order_items oi ON oi.order_id = o.id
         JOIN products p ON p.id = oi.product_id
         WHERE o.user_id = $1
         ORDER BY o.created_at DESC, o.id, oi.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    records.into_iter().map(CustomerOrderRow::try_from).collect()
}

pub async fn list_for_shop(
    pool: &PgPool,
    shop_id: Uuid,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders
         WHERE shop_id = $1 AND ($2::TEXT IS NULL OR status = $2)
         ORDER BY created_at DESC"
    ))
    .bind(shop_id)
    .bind(status.map(|s| s.as_db()))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn set_payment_reference(
    pool: &PgPool,
    id: Uuid,
    reference: &str,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE orders SET payment_reference = $1 WHERE id = $2")
        .bind(reference)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
