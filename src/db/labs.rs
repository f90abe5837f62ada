use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Lab;

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: &str,
    image_url: Option<&str>,
) -> Result<Lab, sqlx::Error> {
    sqlx::query_as::<_, Lab>(
        "INSERT INTO labs (name, description, image_url)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(image_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Lab>, sqlx::Error> {
    sqlx::query_as::<_, Lab>("SELECT * FROM labs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Lab>, sqlx::Error> {
    sqlx::query_as::<_, Lab>("SELECT * FROM labs ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn list_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Lab>, sqlx::Error> {
    sqlx::query_as::<_, Lab>("SELECT * FROM labs WHERE id = ANY($1) ORDER BY name")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM labs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
