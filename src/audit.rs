//! Append-only audit trail for mutations and role changes.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

pub mod actions {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
    pub const REGISTER: &str = "REGISTER";
    pub const ROLE_CHANGE: &str = "ROLE_CHANGE";
}

pub mod entities {
    pub const ENTRY: &str = "ENTRY";
    pub const DROPDOWN_OPTION: &str = "DROPDOWN_OPTION";
    pub const USER: &str = "USER";
}

/// Best-effort write: a failed audit insert is logged, never bubbled up, so
/// the mutation it describes still succeeds.
pub async fn record(
    db: &PgPool,
    user_id: Uuid,
    username: &str,
    action: &str,
    entity_type: &str,
    entity_id: &str,
    details: &str,
) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, username, action, entity_type, entity_id, details)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(details)
    .execute(db)
    .await;

    if let Err(e) = result {
        warn!(error = %e, %action, %entity_type, %entity_id, "audit record failed");
    }
}
