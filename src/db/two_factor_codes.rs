use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::TwoFactorCode;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    code_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<TwoFactorCode, sqlx::Error> {
    sqlx::query_as::<_, TwoFactorCode>(
        "INSERT INTO two_factor_codes (user_id, code_hash, expires_at)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(user_id)
    .bind(code_hash)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

pub async fn find_valid(
    pool: &PgPool,
    user_id: Uuid,
    code_hash: &str,
) -> Result<Option<TwoFactorCode>, sqlx::Error> {
    sqlx::query_as::<_, TwoFactorCode>(
        "SELECT * FROM two_factor_codes
         WHERE user_id = $1 AND code_hash = $2 AND used = false AND expires_at > now()",
    )
    .bind(user_id)
    .bind(code_hash)
    .fetch_optional(pool)
    .await
}

pub async fn mark_used(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE two_factor_codes SET used = true WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
