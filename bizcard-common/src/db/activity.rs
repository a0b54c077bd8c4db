//! Inactivity clock and data lifecycle
//!
//! The `metadata` table holds exactly one row (id = 1). Every authenticated
//! request runs [`wipe_if_inactive`] before dispatch and [`touch_activity`]
//! after a successful response.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, warn};

use crate::{time, Error, Result};

/// Result of a maintenance pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maintenance {
    /// Directory still active, nothing changed
    Kept,
    /// Directory was idle past the threshold and has been emptied
    Wiped { deleted: u64 },
}

/// Open a transaction that already holds the database write lock
///
/// A deferred transaction that reads before its first write cannot upgrade
/// its lock once another writer has committed, and SQLite fails it with
/// SQLITE_BUSY without waiting. Every read-then-write transaction starts here
/// so it queues on the busy timeout instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE metadata SET last_activity = last_activity WHERE id = 1")
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Read the stored last-activity timestamp
pub async fn last_activity(pool: &SqlitePool) -> Result<DateTime<Utc>> {
    let ts: Option<DateTime<Utc>> = sqlx::query_scalar("SELECT last_activity FROM metadata WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    ts.ok_or_else(|| Error::Internal("activity row missing; database not initialized".to_string()))
}

/// Record activity now
pub async fn touch_activity(pool: &SqlitePool) -> Result<()> {
    touch_activity_at(pool, time::now()).await
}

/// Record activity at an explicit instant
pub async fn touch_activity_at(pool: &SqlitePool, at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE metadata SET last_activity = ? WHERE id = 1")
        .bind(at)
        .execute(pool)
        .await?;

    Ok(())
}

/// Empty the directory if it has been idle for longer than `threshold`
pub async fn wipe_if_inactive(pool: &SqlitePool, threshold: Duration) -> Result<Maintenance> {
    wipe_if_inactive_at(pool, time::now(), threshold).await
}

/// Maintenance pass against an explicit clock
///
/// Check, delete and clock reset happen in one transaction, so an upsert
/// either lands before the wipe (and is removed) or after it (and survives).
pub async fn wipe_if_inactive_at(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    threshold: Duration,
) -> Result<Maintenance> {
    let mut tx = begin_write(pool).await?;

    let last: DateTime<Utc> = sqlx::query_scalar("SELECT last_activity FROM metadata WHERE id = 1")
        .fetch_one(&mut *tx)
        .await?;

    if !time::exceeds(last, now, threshold) {
        tx.commit().await?;
        debug!(last_activity = %last, "Directory active, no wipe");
        return Ok(Maintenance::Kept);
    }

    let deleted = sqlx::query("DELETE FROM employees")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("UPDATE metadata SET last_activity = ? WHERE id = 1")
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    warn!(
        idle_days = now.signed_duration_since(last).num_days(),
        deleted,
        "Directory wiped after inactivity"
    );

    Ok(Maintenance::Wiped { deleted })
}
