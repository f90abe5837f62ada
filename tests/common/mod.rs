use std::net::SocketAddr;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use reservalab::auth::password;
use reservalab::config::Config;
use reservalab::models::{ModeratorType, Role};

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Insert a user directly, bypassing the registration flow.
    pub async fn seed_user(
        &self,
        name: &str,
        email: &str,
        pw: Option<&str>,
        role: Role,
        moderator_type: Option<ModeratorType>,
        is_active: bool,
    ) -> Uuid {
        let hash = pw.map(|p| password::hash(p).unwrap());
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, password_hash, role, moderator_type, is_active)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .bind(hash)
        .bind(role)
        .bind(moderator_type)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .expect("seed user failed")
    }

    pub async fn seed_admin(&self) -> Uuid {
        self.seed_user("Admin", "admin@test.com", Some("password123"), Role::Admin, None, true)
            .await
    }

    pub async fn seed_student(&self, email: &str) -> Uuid {
        self.seed_user("Student", email, Some("password123"), Role::Student, None, true)
            .await
    }

    pub async fn seed_monitor(&self, email: &str) -> Uuid {
        self.seed_user(
            "Monitor",
            email,
            Some("password123"),
            Role::Moderator,
            Some(ModeratorType::Monitor),
            true,
        )
        .await
    }

    pub async fn seed_coordinator(&self, email: &str) -> Uuid {
        self.seed_user(
            "Coordinator",
            email,
            Some("password123"),
            Role::Moderator,
            Some(ModeratorType::Coordinator),
            true,
        )
        .await
    }

    pub async fn seed_lab(&self, name: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO labs (name, description) VALUES ($1, '') RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .expect("seed lab failed")
    }

    pub async fn link_moderator(&self, user_id: Uuid, lab_id: Uuid) {
        sqlx::query("INSERT INTO moderator_labs (user_id, lab_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(lab_id)
            .execute(&self.pool)
            .await
            .expect("seed association failed");
    }

    pub async fn seed_reservation(
        &self,
        user_id: Uuid,
        lab_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: &str,
    ) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO reservations (user_id, lab_id, start_time, end_time, status)
             VALUES ($1, $2, $3, $4, $5::reservation_status) RETURNING id",
        )
        .bind(user_id)
        .bind(lab_id)
        .bind(start)
        .bind(end)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .expect("seed reservation failed")
    }

    /// Insert a password-reset/activation token and return the raw value.
    pub async fn seed_reset_token(&self, user_id: Uuid, expires_in: Duration) -> String {
        let raw = Uuid::now_v7().to_string();
        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(hash)
        .bind(Utc::now() + expires_in)
        .execute(&self.pool)
        .await
        .expect("seed token failed");

        raw
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Login and return the bearer token, panicking on failure.
    pub async fn token_for(&self, email: &str) -> String {
        let (body, status) = self.login(email, "password123").await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn patch_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("patch request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Create a reservation for the given lab and interval.
    pub async fn create_reservation(
        &self,
        token: &str,
        lab_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> (Value, StatusCode) {
        self.post_auth(
            "/reservations",
            token,
            &json!({ "lab_id": lab_id, "start": start, "end": end }),
        )
        .await
    }
}

/// Tomorrow at the given hour, UTC. Keeps interval tests in the future.
pub fn tomorrow_at(hour: u32) -> DateTime<Utc> {
    (Utc::now() + Duration::days(1))
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn tomorrow_at_minutes(hour: u32, minutes: u32) -> DateTime<Utc> {
    (Utc::now() + Duration::days(1))
        .date_naive()
        .and_hms_opt(hour, minutes, 0)
        .unwrap()
        .and_utc()
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!(
        "reservalab_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let upload_dir = std::env::temp_dir().join(&db_name);

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        frontend_url: "http://localhost:5173".to_string(),
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        max_upload_size: 5 * 1024 * 1024,
        log_level: "warn".to_string(),
        smtp: None,
        recaptcha_secret: None,
    };

    let app = reservalab::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
