use std::sync::Arc;

use sqlx::PgPool;

use crate::captcha::CaptchaVerifier;
use crate::config::Config;
use crate::email::Mailer;
use crate::rate_limit::LoginAttemptTracker;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub mailer: Option<Arc<Mailer>>,
    pub captcha: Option<CaptchaVerifier>,
    pub login_attempts: LoginAttemptTracker,
}
