use shared::models::Customer;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
    let row: Option<UserRow> =
        sqlx::query_as("SELECT id, name, email, phone FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|r| Customer {
        id: r.id,
        name: r.name,
        email: r.email,
        phone: r.phone,
    }))
}
