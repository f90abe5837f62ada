use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Reservation, ReservationStatus};

/// Create a reservation if no PENDING or APPROVED reservation on the same lab
/// overlaps the half-open interval [start_time, end_time). Returns `None` on
/// conflict.
///
/// The conflict check and the insert run in one transaction holding a per-lab
/// advisory lock, so two concurrent requests for overlapping slots cannot
/// both pass the check.
pub async fn create_if_free(
    pool: &PgPool,
    user_id: Uuid,
    lab_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Option<Reservation>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Serializes reservation creation per lab; released at commit/rollback.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(lab_id)
        .execute(&mut *tx)
        .await?;

    let conflict: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM reservations
         WHERE lab_id = $1
           AND status IN ('PENDING', 'APPROVED')
           AND start_time < $3
           AND end_time > $2
         LIMIT 1",
    )
    .bind(lab_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_optional(&mut *tx)
    .await?;

    if conflict.is_some() {
        return Ok(None);
    }

    let reservation = sqlx::query_as::<_, Reservation>(
        "INSERT INTO reservations (user_id, lab_id, start_time, end_time, status)
         VALUES ($1, $2, $3, $4, 'PENDING') RETURNING *",
    )
    .bind(user_id)
    .bind(lab_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(reservation))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations ORDER BY start_time DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE user_id = $1 ORDER BY start_time DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_labs(pool: &PgPool, lab_ids: &[Uuid]) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE lab_id = ANY($1) ORDER BY start_time DESC",
    )
    .bind(lab_ids)
    .fetch_all(pool)
    .await
}

/// Transition a PENDING reservation to APPROVED or REJECTED, recording the
/// resolver. Returns `None` if the reservation is not PENDING (already
/// resolved); both resolved states are terminal.
pub async fn resolve(
    pool: &PgPool,
    id: Uuid,
    status: ReservationStatus,
    resolver_id: Uuid,
) -> Result<Option<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        "UPDATE reservations
         SET status = $2, updated_by_user_id = $3
         WHERE id = $1 AND status = 'PENDING'
         RETURNING *",
    )
    .bind(id)
    .bind(status)
    .bind(resolver_id)
    .fetch_optional(pool)
    .await
}
