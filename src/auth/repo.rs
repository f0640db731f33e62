use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, is_active, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> ApiResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, is_active, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn set_role(db: &PgPool, id: Uuid, role: &str) -> ApiResult<()> {
        sqlx::query(r#"UPDATE users SET role = $2 WHERE id = $1"#)
            .bind(id)
            .bind(role)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// A deactivated account is refused everywhere, not just at login, so the
/// flag cannot be bypassed via refresh tokens or direct mutations.
pub fn ensure_active(user: User) -> ApiResult<User> {
    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is disabled".into()));
    }
    Ok(user)
}

/// Store-side authorization gate: admin-only handlers call this before any
/// mutation, so the STORED role decides, never the client's claims.
pub fn ensure_admin(user: User) -> ApiResult<User> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden("Admin role required".into()));
    }
    Ok(user)
}

pub async fn load_user(db: &PgPool, user_id: Uuid) -> ApiResult<User> {
    let user = User::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account not found".into()))?;
    ensure_active(user)
}

pub async fn require_admin(db: &PgPool, user_id: Uuid) -> ApiResult<User> {
    let user = load_user(db, user_id).await?;
    ensure_admin(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn account(role: &str, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "hash".into(),
            role: role.into(),
            is_active,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn disabled_account_is_rejected() {
        let err = ensure_active(account(ROLE_USER, false)).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert_eq!(err.to_string(), "Account is disabled");
    }

    #[test]
    fn disabled_admin_is_rejected_before_the_role_check() {
        // require_admin goes through ensure_active first.
        let err = ensure_active(account(ROLE_ADMIN, false)).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn non_admin_role_is_forbidden() {
        let err = ensure_admin(account(ROLE_USER, true)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn active_admin_passes_both_gates() {
        let user = ensure_active(account(ROLE_ADMIN, true)).expect("active");
        assert!(ensure_admin(user).is_ok());
    }
}
