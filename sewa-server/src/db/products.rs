use shared::models::Product;
use sqlx::PgConnection;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    shop_id: Uuid,
    sku: String,
    name: String,
    price_per_day: i64,
    discount_price_per_day: i64,
    stock: i32,
    image_url: String,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            shop_id: r.shop_id,
            sku: r.sku,
            name: r.name,
            price_per_day: r.price_per_day,
            discount_price_per_day: r.discount_price_per_day,
            stock: r.stock,
            image_url: r.image_url,
        }
    }
}

/// Load a product with `FOR UPDATE`; the lock serializes reservations of it
pub async fn lock(conn: &mut PgConnection, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    let row: Option<ProductRow> = sqlx::query_as(
        "SELECT id, shop_id, sku, name, price_per_day, discount_price_per_day, stock, image_url
         FROM products WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Product::from))
}
