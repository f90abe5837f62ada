use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::policy::Actor;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub actor: Actor,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.actor.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    pub fn require_moderator(&self) -> Result<(), AppError> {
        if self.actor.is_moderator() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Moderator access required".to_string()))
        }
    }

    pub fn require_admin_or_coordinator(&self) -> Result<(), AppError> {
        if matches!(self.actor, Actor::Admin | Actor::Coordinator) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Admin or coordinator access required".to_string(),
            ))
        }
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let claims = jwt::decode_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        let actor = Actor::from_parts(claims.role, claims.mtype)
            .map_err(|_| AppError::Unauthorized("Invalid token claims".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            actor,
        })
    }
}
