use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    /// Base URL of the frontend, used when building emailed links.
    pub frontend_url: String,
    pub upload_dir: String,
    pub max_upload_size: usize,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
    pub recaptcha_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("RESERVALAB_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid RESERVALAB_HOST: {e}"))?;

        let port: u16 = env_or("RESERVALAB_PORT", "3333")
            .parse()
            .map_err(|e| format!("Invalid RESERVALAB_PORT: {e}"))?;

        let frontend_url = env_or("RESERVALAB_FRONTEND_URL", "http://localhost:5173");

        let upload_dir = env_or("RESERVALAB_UPLOAD_DIR", "uploads");

        // 5MB default, matches the lab image limit
        let max_upload_size: usize = env_or("RESERVALAB_MAX_UPLOAD_SIZE", "5242880")
            .parse()
            .map_err(|e| format!("Invalid RESERVALAB_MAX_UPLOAD_SIZE: {e}"))?;

        let log_level = env_or("RESERVALAB_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("RESERVALAB_SMTP_HOST").ok(),
            std::env::var("RESERVALAB_SMTP_PORT").ok(),
            std::env::var("RESERVALAB_SMTP_USER").ok(),
            std::env::var("RESERVALAB_SMTP_PASS").ok(),
            std::env::var("RESERVALAB_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid RESERVALAB_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        let recaptcha_secret = std::env::var("RESERVALAB_RECAPTCHA_SECRET").ok();

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            frontend_url,
            upload_dir,
            max_upload_size,
            log_level,
            smtp,
            recaptcha_secret,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
