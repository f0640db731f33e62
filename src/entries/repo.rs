use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiResult;

/// One reference-code record. `reference_code` is derived at creation time
/// and never recomputed, even when the attribute fields are edited later.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub serial_no: i64,
    pub particulars: String,
    pub client_code: String,
    pub capacity_mw: f64,
    pub state_code: String,
    pub site_code: String,
    pub reference_code: String,
    pub created_by: String,
    pub created_at: OffsetDateTime,
    pub modified_by: Option<String>,
    pub modified_at: Option<OffsetDateTime>,
    pub is_active: bool,
}

const ENTRY_COLUMNS: &str = r#"id, serial_no, particulars, client_code, capacity_mw,
    state_code, site_code, reference_code, created_by, created_at,
    modified_by, modified_at, is_active"#;

impl Entry {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        db: &PgPool,
        serial_no: i64,
        particulars: &str,
        client_code: &str,
        capacity_mw: f64,
        state_code: &str,
        site_code: &str,
        reference_code: &str,
        created_by: &str,
    ) -> ApiResult<Entry> {
        let entry = sqlx::query_as::<_, Entry>(&format!(
            r#"
            INSERT INTO entries
                (serial_no, particulars, client_code, capacity_mw,
                 state_code, site_code, reference_code, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(serial_no)
        .bind(particulars)
        .bind(client_code)
        .bind(capacity_mw)
        .bind(state_code)
        .bind(site_code)
        .bind(reference_code)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> ApiResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    /// Active entries, newest serial first.
    pub async fn list_active(db: &PgPool) -> ApiResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, Entry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM entries
            WHERE is_active
            ORDER BY serial_no DESC
            "#
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_creator(db: &PgPool, username: &str) -> ApiResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, Entry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM entries
            WHERE is_active AND created_by = $1
            ORDER BY serial_no DESC
            "#
        ))
        .bind(username)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Edits the attribute fields and stamps the modifier. The reference
    /// code column is left untouched on purpose.
    pub async fn update_fields(
        db: &PgPool,
        id: Uuid,
        particulars: &str,
        client_code: &str,
        capacity_mw: f64,
        state_code: &str,
        site_code: &str,
        modified_by: &str,
    ) -> ApiResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(&format!(
            r#"
            UPDATE entries
            SET particulars = $2, client_code = $3, capacity_mw = $4,
                state_code = $5, site_code = $6,
                modified_by = $7, modified_at = now()
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(particulars)
        .bind(client_code)
        .bind(capacity_mw)
        .bind(state_code)
        .bind(site_code)
        .bind(modified_by)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    /// Soft delete: flips the active flag. Idempotent — an already-inactive
    /// entry stays inactive and the call still reports success.
    pub async fn soft_delete(db: &PgPool, id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query(r#"UPDATE entries SET is_active = FALSE WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Serialize)]
pub struct EntryStats {
    pub total: i64,
    pub total_capacity_mw: f64,
    pub average_capacity_mw: f64,
    pub this_month: i64,
    pub by_particulars: HashMap<String, i64>,
    pub by_client: HashMap<String, i64>,
    pub by_state: HashMap<String, i64>,
    pub by_site: HashMap<String, i64>,
}

/// `column` is one of the fixed identifiers passed by `stats` below, never
/// caller input.
async fn group_counts(db: &PgPool, column: &str) -> ApiResult<HashMap<String, i64>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
        r#"SELECT {column}, count(*) FROM entries WHERE is_active GROUP BY {column}"#
    ))
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn stats(db: &PgPool) -> ApiResult<EntryStats> {
    let (total, total_capacity_mw, average_capacity_mw, this_month): (i64, f64, f64, i64) =
        sqlx::query_as(
            r#"
            SELECT count(*),
                   COALESCE(sum(capacity_mw), 0)::double precision,
                   COALESCE(avg(capacity_mw), 0)::double precision,
                   count(*) FILTER (WHERE created_at >= date_trunc('month', now()))
            FROM entries
            WHERE is_active
            "#,
        )
        .fetch_one(db)
        .await?;

    Ok(EntryStats {
        total,
        total_capacity_mw,
        average_capacity_mw,
        this_month,
        by_particulars: group_counts(db, "particulars").await?,
        by_client: group_counts(db, "client_code").await?,
        by_state: group_counts(db, "state_code").await?,
        by_site: group_counts(db, "site_code").await?,
    })
}
