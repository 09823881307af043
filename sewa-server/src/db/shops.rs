use shared::models::Shop;
use sqlx::PgExecutor;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ShopRow {
    id: Uuid,
    user_id: Uuid,
    shop_name: String,
    shop_address: String,
    shop_phone_number: String,
    shop_profile_image_url: String,
}

impl From<ShopRow> for Shop {
    fn from(r: ShopRow) -> Self {
        Shop {
            id: r.id,
            user_id: r.user_id,
            shop_name: r.shop_name,
            shop_address: r.shop_address,
            shop_phone_number: r.shop_phone_number,
            shop_profile_image_url: r.shop_profile_image_url,
        }
    }
}

const SHOP_COLUMNS: &str =
    "id, user_id, shop_name, shop_address, shop_phone_number, shop_profile_image_url";

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<Shop>, sqlx::Error> {
    let row: Option<ShopRow> =
        sqlx::query_as(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(Shop::from))
}

pub async fn find_by_owner<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> Result<Option<Shop>, sqlx::Error> {
    let row: Option<ShopRow> =
        sqlx::query_as(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(Shop::from))
}
