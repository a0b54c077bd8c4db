//! Database initialization tests

use bizcard_common::db::{init_database, last_activity};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("bizcard.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_tables_created() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bizcard.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(tables, vec!["employees", "metadata"]);
}

#[tokio::test]
async fn test_single_activity_row_after_repeated_init() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("bizcard.db");

    let pool1 = init_database(&db_path).await.unwrap();
    let first = last_activity(&pool1).await.unwrap();
    drop(pool1);

    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM metadata")
        .fetch_one(&pool2)
        .await
        .unwrap();

    assert_eq!(count, 1, "metadata must hold exactly one row");
    // Re-opening must not reset the clock
    assert_eq!(last_activity(&pool2).await.unwrap(), first);
}

#[tokio::test]
async fn test_metadata_rejects_second_row() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bizcard.db")).await.unwrap();

    let result = sqlx::query("INSERT INTO metadata (id, last_activity) VALUES (2, '2024-01-01T00:00:00Z')")
        .execute(&pool)
        .await;

    assert!(result.is_err());
}
