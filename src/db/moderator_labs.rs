use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ModeratorLab;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    lab_id: Uuid,
) -> Result<ModeratorLab, sqlx::Error> {
    sqlx::query_as::<_, ModeratorLab>(
        "INSERT INTO moderator_labs (user_id, lab_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(user_id)
    .bind(lab_id)
    .fetch_one(pool)
    .await
}

pub async fn find(
    pool: &PgPool,
    user_id: Uuid,
    lab_id: Uuid,
) -> Result<Option<ModeratorLab>, sqlx::Error> {
    sqlx::query_as::<_, ModeratorLab>(
        "SELECT * FROM moderator_labs WHERE user_id = $1 AND lab_id = $2",
    )
    .bind(user_id)
    .bind(lab_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<ModeratorLab>, sqlx::Error> {
    sqlx::query_as::<_, ModeratorLab>(
        "SELECT * FROM moderator_labs ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// The set of lab ids the given moderator manages.
pub async fn lab_ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT lab_id FROM moderator_labs WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, lab_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM moderator_labs WHERE user_id = $1 AND lab_id = $2")
        .bind(user_id)
        .bind(lab_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
