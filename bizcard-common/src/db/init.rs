//! Database initialization
//!
//! Creates the database file and schema on first run; safe to call on every
//! startup (all statements are idempotent).

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // WAL allows concurrent readers alongside the single writer
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_employees_table(&pool).await?;
    create_metadata_table(&pool).await?;
    seed_activity_row(&pool).await?;

    Ok(pool)
}

/// Create the employees table
///
/// `email` carries the UNIQUE constraint that upserts conflict on.
async fn create_employees_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            mobile TEXT,
            designation TEXT,
            faculty TEXT,
            school TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_employees_name ON employees(name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the single-row activity table
async fn create_metadata_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metadata (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            last_activity TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert the activity row if this is a fresh database
async fn seed_activity_row(pool: &SqlitePool) -> Result<()> {
    let result = sqlx::query("INSERT OR IGNORE INTO metadata (id, last_activity) VALUES (1, ?)")
        .bind(crate::time::now())
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        info!("Initialized activity clock");
    }

    Ok(())
}
