use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::policy::{self, Actor};
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::Lab;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LinkModerator {
    pub user_id: Uuid,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Lab>>, AppError> {
    let labs = db::labs::list(&state.pool).await?;
    Ok(Json(labs))
}

/// Labs inside the calling moderator's scope.
pub async fn list_for_moderator(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Lab>>, AppError> {
    auth.require_moderator()?;

    let scope = db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?;
    let labs = db::labs::list_by_ids(&state.pool, &scope).await?;
    Ok(Json(labs))
}

/// Admin-only lab creation from a multipart form: `name`, `description` and
/// an optional `image` (JPEG/PNG), stored under the uploads dir.
pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Lab>), AppError> {
    if !policy::can_manage_labs(auth.actor) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let mut name = None;
    let mut description = String::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid name field: {e}")))?,
                );
            }
            Some("description") => {
                description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid description field: {e}")))?;
            }
            Some("image") => {
                let ext = match field.content_type() {
                    Some("image/jpeg") | Some("image/jpg") => "jpg",
                    Some("image/png") => "png",
                    _ => {
                        return Err(AppError::Validation(
                            "Invalid image format. Use JPG or PNG.".to_string(),
                        ));
                    }
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid image field: {e}")))?;
                if data.len() > state.config.max_upload_size {
                    return Err(AppError::Validation("Image exceeds 5MB limit".to_string()));
                }
                image = Some((ext.to_string(), data.to_vec()));
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Lab name is required".to_string()))?;

    let image_url = match image {
        Some((ext, data)) => {
            let filename = format!("{}.{ext}", Uuid::now_v7());
            let path = std::path::Path::new(&state.config.upload_dir).join(&filename);
            tokio::fs::create_dir_all(&state.config.upload_dir)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))?;
            tokio::fs::write(&path, &data)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to store image: {e}")))?;
            Some(format!("/uploads/{filename}"))
        }
        None => None,
    };

    let lab = db::labs::create(&state.pool, &name, &description, image_url.as_deref()).await?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "lab.created",
        Some(&format!("Created lab \"{}\"", lab.name)),
    )
    .await;

    Ok((StatusCode::CREATED, Json(lab)))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !policy::can_manage_labs(auth.actor) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let lab = db::labs::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lab not found".to_string()))?;

    db::labs::delete(&state.pool, id).await?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "lab.deleted",
        Some(&format!("Deleted lab \"{}\"", lab.name)),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Lab deleted" })))
}

/// Link a moderator to a lab. Admins link any moderator; coordinators only
/// monitors, and only on labs they already manage.
pub async fn link_moderator(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(lab_id): Path<Uuid>,
    Json(req): Json<LinkModerator>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin_or_coordinator()?;

    let lab = db::labs::find_by_id(&state.pool, lab_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lab not found".to_string()))?;

    let target = db::users::find_by_id(&state.pool, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let target_actor = Actor::from_parts(target.role, target.moderator_type)
        .map_err(|e| AppError::Internal(e))?;

    let scope = if auth.actor == Actor::Coordinator {
        db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?
    } else {
        Vec::new()
    };

    if !policy::can_link_moderator(auth.actor, &scope, target_actor, lab_id) {
        return Err(AppError::Forbidden(
            "You may not link this user to this lab".to_string(),
        ));
    }

    let association = db::moderator_labs::create(&state.pool, req.user_id, lab_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("This moderator is already linked to this lab".to_string())
            }
            _ => AppError::Database(e),
        })?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "moderator_lab.linked",
        Some(&format!(
            "Linked moderator \"{}\" to lab \"{}\"",
            target.name, lab.name
        )),
    )
    .await;

    Ok(Json(serde_json::json!(association)))
}

pub async fn unlink_moderator(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((lab_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin_or_coordinator()?;

    let association = db::moderator_labs::find(&state.pool, user_id, lab_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Association not found".to_string()))?;

    let target = db::users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let target_actor = Actor::from_parts(target.role, target.moderator_type)
        .map_err(|e| AppError::Internal(e))?;

    let scope = if auth.actor == Actor::Coordinator {
        db::moderator_labs::lab_ids_for_user(&state.pool, auth.user_id).await?
    } else {
        Vec::new()
    };

    if !policy::can_unlink_moderator(auth.actor, &scope, target_actor, lab_id) {
        return Err(AppError::Forbidden(
            "You may not unlink this user from this lab".to_string(),
        ));
    }

    db::moderator_labs::delete(&state.pool, association.user_id, association.lab_id).await?;

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "moderator_lab.unlinked",
        Some(&format!(
            "Unlinked moderator \"{}\" from lab {lab_id}",
            target.name
        )),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Association removed" })))
}
