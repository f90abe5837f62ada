use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::audit;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CaptchaShownRequest {
    pub email: String,
}

/// Unauthenticated security event: the client displayed the CAPTCHA challenge
/// after repeated failed logins for this email.
pub async fn record_captcha_shown(
    State(state): State<SharedState>,
    Json(req): Json<CaptchaShownRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    audit::log_action(
        &state.pool,
        None,
        "auth.captcha_shown",
        Some(&format!(
            "CAPTCHA challenge shown after repeated login failures for {}",
            req.email
        )),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Event recorded" })))
}
