use sqlx::PgPool;
use uuid::Uuid;

/// Record an audit entry after a privileged mutation. Best-effort: a failed
/// write is logged and never propagated to the caller.
pub async fn log_action(pool: &PgPool, user_id: Option<Uuid>, action: &str, details: Option<&str>) {
    if let Err(e) = crate::db::audit::insert(pool, user_id, action, details).await {
        tracing::error!("Failed to write audit log: {e}");
    }
}
