pub mod admin;
pub mod auth;
pub mod coordinator;
pub mod labs;
pub mod logs;
pub mod reservations;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/verify-2fa", post(auth::verify_two_factor))
        .route("/auth/register-user", post(auth::register_user))
        .route("/auth/cadastro-direto", post(auth::self_register))
        .route("/auth/ativar-conta", get(auth::activate_account))
        .route("/auth/definir-senha", post(auth::set_password))
        .route("/auth/esqueci-senha", post(auth::forgot_password))
        // Labs
        .route("/labs", get(labs::list).post(labs::create))
        .route("/labs/moderator", get(labs::list_for_moderator))
        .route("/labs/{id}", delete(labs::delete))
        .route("/labs/{lab_id}/usuarios", post(labs::link_moderator))
        .route(
            "/labs/{lab_id}/usuarios/{user_id}",
            delete(labs::unlink_moderator),
        )
        // Reservations
        .route(
            "/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route("/reservations/user", get(reservations::list_mine))
        .route("/reservations/moderator", get(reservations::list_for_moderator))
        .route("/reservations/{id}", patch(reservations::update_status))
        // Associations
        .route("/moderator-labs", get(admin::list_associations))
        // Coordinator
        .route("/coordenador/usuarios", get(coordinator::list_visible_users))
        // Admin
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/auditoria", get(admin::list_audit_logs))
        // Security events
        .route("/logs/recaptcha", post(logs::record_captcha_shown))
}
