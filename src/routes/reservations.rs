use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::policy::{self, Actor};
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Reservation, ReservationStatus};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateReservation {
    pub lab_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct UpdateStatus {
    pub status: ReservationStatus,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateReservation>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    if !policy::can_create_reservation(auth.actor) {
        return Err(AppError::Forbidden(
            "Only students may request reservations".to_string(),
        ));
    }

    if req.end <= req.start {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    if req.start < Utc::now() {
        return Err(AppError::Validation(
            "Cannot reserve a time slot in the past".to_string(),
        ));
    }

    let lab = db::labs::find_by_id(&state.pool, req.lab_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lab not found".to_string()))?;

    let reservation =
        db::reservations::create_if_free(&state.pool, auth.user_id, req.lab_id, req.start, req.end)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(
                    "An existing reservation for this lab conflicts with the requested time slot"
                        .to_string(),
                )
            })?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "reservation.requested",
        Some(&format!(
            "Requested \"{}\" from {} to {}",
            lab.name,
            req.start.to_rfc3339(),
            req.end.to_rfc3339()
        )),
    )
    .await;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Role-scoped listing: admins see everything, moderators their labs,
/// students their own requests.
pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = match auth.actor {
        Actor::Admin => db::reservations::list_all(&state.pool).await?,
        Actor::Coordinator | Actor::Monitor => {
            let scope = db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?;
            db::reservations::list_by_labs(&state.pool, &scope).await?
        }
        Actor::Student => db::reservations::list_by_user(&state.pool, auth.user_id).await?,
    };
    Ok(Json(reservations))
}

pub async fn list_mine(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = db::reservations::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(reservations))
}

pub async fn list_for_moderator(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    auth.require_moderator()?;

    let scope = db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?;
    let reservations = db::reservations::list_by_labs(&state.pool, &scope).await?;
    Ok(Json(reservations))
}

pub async fn update_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatus>,
) -> Result<Json<Reservation>, AppError> {
    if req.status == ReservationStatus::Pending {
        return Err(AppError::Validation(
            "Status must be APPROVED or REJECTED".to_string(),
        ));
    }

    let reservation = db::reservations::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    let scope = if auth.actor.is_moderator() {
        db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?
    } else {
        Vec::new()
    };

    if !policy::can_resolve_reservation(auth.actor, &scope, reservation.lab_id) {
        return Err(AppError::Forbidden(
            "You may not resolve reservations for this lab".to_string(),
        ));
    }

    // PENDING is the only state a transition may start from; a concurrent
    // resolver loses here as well.
    let updated = db::reservations::resolve(&state.pool, id, req.status, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Conflict("Reservation is already resolved".to_string()))?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "reservation.resolved",
        Some(&format!("Set reservation {id} to {:?}", req.status)),
    )
    .await;

    Ok(Json(updated))
}
