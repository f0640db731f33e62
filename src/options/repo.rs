use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiResult;

/// A selectable value for one of the four categorical entry fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DropdownOption {
    pub id: Uuid,
    pub option_type: String,
    pub value: String,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub is_custom: bool,
    pub created_by: String,
    pub created_at: OffsetDateTime,
}

const OPTION_COLUMNS: &str =
    r#"id, option_type, value, display_name, is_active, is_custom, created_by, created_at"#;

impl DropdownOption {
    pub async fn list_active_by_type(db: &PgPool, option_type: &str) -> ApiResult<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {OPTION_COLUMNS}
            FROM dropdown_options
            WHERE option_type = $1 AND is_active
            ORDER BY value
            "#
        ))
        .bind(option_type)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        option_type: &str,
        value: &str,
        display_name: Option<&str>,
        is_custom: bool,
        created_by: &str,
    ) -> ApiResult<Self> {
        let option = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO dropdown_options (option_type, value, display_name, is_custom, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {OPTION_COLUMNS}
            "#
        ))
        .bind(option_type)
        .bind(value)
        .bind(display_name)
        .bind(is_custom)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(option)
    }

    pub async fn set_active(db: &PgPool, id: Uuid, active: bool) -> ApiResult<Option<Self>> {
        let option = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE dropdown_options
            SET is_active = $2
            WHERE id = $1
            RETURNING {OPTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(db)
        .await?;
        Ok(option)
    }

    pub async fn count(db: &PgPool) -> ApiResult<i64> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT count(*) FROM dropdown_options"#)
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}
