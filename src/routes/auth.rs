use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::auth::policy::{self, Actor};
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{ModeratorType, Role, User};
use crate::rate_limit::LoginGate;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub captcha_token: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyTwoFactorRequest {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub moderator_type: Option<ModeratorType>,
}

#[derive(Deserialize)]
pub struct SelfRegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ActivateQuery {
    pub token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct UserSummary {
    pub id: uuid::Uuid,
    pub name: String,
    pub role: Role,
    pub moderator_type: Option<ModeratorType>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            moderator_type: user.moderator_type,
        }
    }
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_two_factor_code() -> String {
    let n: u32 = rand::random_range(0..1_000_000);
    format!("{n:06}")
}

fn issue_token(state: &SharedState, user: &User) -> Result<String, AppError> {
    let claims = Claims::new(user.id, user.role, user.moderator_type);
    encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.login_attempts.check(&req.email) {
        LoginGate::Allowed => {}
        LoginGate::Blocked(_) => {
            return Err(AppError::TooManyAttempts(
                "Too many login attempts. Please try again later.".to_string(),
            ));
        }
        LoginGate::CaptchaRequired => {
            if let Some(ref verifier) = state.captcha {
                let token = req.captcha_token.as_deref().ok_or_else(|| {
                    AppError::Validation("CAPTCHA verification required".to_string())
                })?;
                let ok = verifier.verify(token).await.map_err(AppError::Internal)?;
                if !ok {
                    return Err(AppError::Validation(
                        "CAPTCHA verification failed".to_string(),
                    ));
                }
            }
        }
    }

    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "Account not activated. Check your email for the activation link.".to_string(),
        ));
    }

    let hash = user.password_hash.as_deref().ok_or_else(|| {
        AppError::Unauthorized("Password not set. Check your email.".to_string())
    })?;

    let valid = password::verify(&req.password, hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_attempts.record_failure(&req.email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    state.login_attempts.clear(&req.email);

    if user.two_factor_enabled {
        let code = generate_two_factor_code();
        db::two_factor_codes::create(
            &state.pool,
            user.id,
            &hash_token(&code),
            Utc::now() + Duration::minutes(10),
        )
        .await?;

        if let Some(ref mailer) = state.mailer {
            mailer
                .send_two_factor_code(&user.email, &code)
                .await
                .map_err(AppError::Internal)?;
        } else {
            tracing::warn!("SMTP not configured. Two-factor code for {}: {code}", user.email);
        }

        audit::log_action(&state.pool, Some(user.id), "auth.2fa_code_sent", None).await;

        return Ok(Json(serde_json::json!({ "two_factor_required": true })));
    }

    let token = issue_token(&state, &user)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": UserSummary::from(&user),
    })))
}

pub async fn verify_two_factor(
    State(state): State<SharedState>,
    Json(req): Json<VerifyTwoFactorRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid code".to_string()))?;

    let code = db::two_factor_codes::find_valid(&state.pool, user.id, &hash_token(&req.code))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired code".to_string()))?;

    db::two_factor_codes::mark_used(&state.pool, code.id).await?;

    audit::log_action(&state.pool, Some(user.id), "auth.2fa_verified", None).await;

    let token = issue_token(&state, &user)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": UserSummary::from(&user),
    })))
}

/// Admins register any role; coordinators only students and monitors. The new
/// account has no password yet: a set-password link is emailed.
pub async fn register_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    auth.require_admin_or_coordinator()?;

    if req.name.is_empty() || req.email.is_empty() {
        return Err(AppError::Validation("Name and email are required".to_string()));
    }

    let new_actor = Actor::from_parts(req.role, req.moderator_type)
        .map_err(|e| AppError::Validation(e))?;

    if !policy::can_register_user(auth.actor, new_actor) {
        return Err(AppError::Forbidden(
            "You are not allowed to register users with this role".to_string(),
        ));
    }

    let user = db::users::create(
        &state.pool,
        &req.name,
        &req.email,
        None,
        req.role,
        req.moderator_type,
        true,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A user with this email already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    let token = generate_token();
    db::password_reset_tokens::create(
        &state.pool,
        user.id,
        &hash_token(&token),
        Utc::now() + Duration::hours(1),
    )
    .await?;

    let link = format!("{}/definir-senha?token={token}", state.config.frontend_url);
    if let Some(ref mailer) = state.mailer {
        if let Err(e) = mailer.send_set_password(&user.email, &user.name, &link).await {
            tracing::error!("Failed to send set-password email: {e}");
        }
    } else {
        tracing::warn!("SMTP not configured. Set-password link for {}: {link}", user.email);
    }

    audit::log_action(
        &state.pool,
        Some(auth.user_id),
        "user.registered",
        Some(&format!("Registered \"{}\" ({}) as {:?}", user.name, user.email, user.role)),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered. Set-password email sent.",
            "user": user,
        })),
    ))
}

/// Public student self-signup. The account stays inactive until the emailed
/// activation link is used.
pub async fn self_register(
    State(state): State<SharedState>,
    Json(req): Json<SelfRegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let user = db::users::create(
        &state.pool,
        &req.name,
        &req.email,
        Some(&pw_hash),
        Role::Student,
        None,
        false,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A user with this email already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    let token = generate_token();
    db::password_reset_tokens::create(
        &state.pool,
        user.id,
        &hash_token(&token),
        Utc::now() + Duration::hours(1),
    )
    .await?;

    let link = format!("{}/ativar-conta?token={token}", state.config.frontend_url);
    if let Some(ref mailer) = state.mailer {
        if let Err(e) = mailer.send_activation(&user.email, &user.name, &link).await {
            tracing::error!("Failed to send activation email: {e}");
        }
    } else {
        tracing::warn!("SMTP not configured. Activation link for {}: {link}", user.email);
    }

    audit::log_action(
        &state.pool,
        Some(user.id),
        "user.self_registered",
        Some(&format!("Student signup for {}", user.email)),
    )
    .await;

    Ok(Json(serde_json::json!({
        "message": "Account created. Check your email to activate it.",
        "user": UserSummary::from(&user),
    })))
}

pub async fn activate_account(
    State(state): State<SharedState>,
    Query(query): Query<ActivateQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let token = db::password_reset_tokens::find_valid_by_hash(&state.pool, &hash_token(&query.token))
        .await?
        .ok_or_else(|| AppError::Validation("Invalid or expired token".to_string()))?;

    db::password_reset_tokens::mark_used(&state.pool, token.id).await?;
    db::users::activate(&state.pool, token.user_id).await?;

    audit::log_action(&state.pool, Some(token.user_id), "user.activated", None).await;

    Ok(Json(MessageResponse {
        message: "Account activated successfully".to_string(),
    }))
}

/// Sets the password via an emailed token and activates the account. Used
/// both for first-time password definition and for password resets.
pub async fn set_password(
    State(state): State<SharedState>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let token = db::password_reset_tokens::find_valid_by_hash(&state.pool, &hash_token(&req.token))
        .await?
        .ok_or_else(|| AppError::Validation("Invalid or expired token".to_string()))?;

    db::password_reset_tokens::mark_used(&state.pool, token.id).await?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;
    db::users::set_password(&state.pool, token.user_id, &pw_hash).await?;

    audit::log_action(&state.pool, Some(token.user_id), "user.password_set", None).await;

    Ok(Json(MessageResponse {
        message: "Password set successfully".to_string(),
    }))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    // Always 200, to not reveal whether the email exists
    let response = Json(MessageResponse {
        message: "If that email is registered, a reset link has been sent.".to_string(),
    });

    let pool = state.pool.clone();
    let mailer = state.mailer.clone();
    let frontend_url = state.config.frontend_url.clone();

    tokio::spawn(async move {
        if let Ok(Some(user)) = db::users::find_by_email(&pool, &req.email).await {
            let token = generate_token();

            if db::password_reset_tokens::create(
                &pool,
                user.id,
                &hash_token(&token),
                Utc::now() + Duration::hours(1),
            )
            .await
            .is_ok()
            {
                let link = format!("{frontend_url}/definir-senha?token={token}");
                if let Some(mailer) = mailer {
                    if let Err(e) = mailer.send_password_reset(&user.email, &user.name, &link).await
                    {
                        tracing::error!("Failed to send password reset email: {e}");
                    }
                } else {
                    tracing::warn!("SMTP not configured. Password reset link: {link}");
                }

                audit::log_action(&pool, Some(user.id), "auth.password_reset_requested", None)
                    .await;
            }
        }
    });

    Ok(response)
}
