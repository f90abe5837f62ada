use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::policy;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{AuditLog, ModeratorLab, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !policy::can_delete_user(auth.actor, auth.user_id, id) {
        return Err(AppError::Forbidden(
            if auth.actor.is_admin() {
                "You cannot delete your own account".to_string()
            } else {
                "Admin access required".to_string()
            },
        ));
    }

    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    db::users::delete(&state.pool, id).await?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "user.deleted",
        Some(&format!("Deleted user \"{}\" ({})", user.name, user.email)),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

pub async fn list_associations(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ModeratorLab>>, AppError> {
    auth.require_admin()?;
    let associations = db::moderator_labs::list_all(&state.pool).await?;
    Ok(Json(associations))
}

pub async fn list_audit_logs(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    auth.require_admin()?;

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);

    let logs = db::audit::list(&state.pool, limit, offset).await?;
    Ok(Json(logs))
}
