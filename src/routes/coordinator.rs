use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::auth::policy::Actor;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

/// Students plus monitors linked to the coordinator's scoped labs.
pub async fn list_visible_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    if auth.actor != Actor::Coordinator {
        return Err(AppError::Forbidden(
            "Coordinator access required".to_string(),
        ));
    }

    let scope = db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?;
    let users = db::users::list_visible_to_coordinator(&state.pool, &scope).await?;
    Ok(Json(users))
}
