//! Processed payment callback ledger
//!
//! One row per `(merchant_ref, status)`; the unique key makes replays no-ops.

use sqlx::{PgConnection, PgPool};

/// INSERT first and check rows_affected, so a concurrent replay cannot slip in
/// between a check and the write.
pub async fn record(
    conn: &mut PgConnection,
    merchant_ref: &str,
    status: &str,
    received_at: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO payment_callbacks (merchant_ref, status, received_at)
         VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
    )
    .bind(merchant_ref)
    .bind(status)
    .bind(received_at)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Keep the newest `cap` rows, delete the rest
pub async fn trim(pool: &PgPool, cap: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM payment_callbacks
         WHERE id IN (SELECT id FROM payment_callbacks ORDER BY id DESC OFFSET $1)",
    )
    .bind(cap.max(0))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
