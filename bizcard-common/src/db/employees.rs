//! Employee table operations
//!
//! The UNIQUE constraint on `email` is the only uniqueness check: upserts rely
//! on `ON CONFLICT(email)` rather than checking for existing rows first.

use std::collections::HashSet;

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::activity::begin_write;
use super::models::{Employee, EmployeePage, UpsertOutcome};
use crate::pagination::Pagination;
use crate::Result;

const SELECT_COLUMNS: &str = "SELECT name, email, mobile, designation, faculty, school FROM employees";

/// Insert or merge a single employee in its own transaction
///
/// On an email conflict, name/mobile/designation/faculty/school are
/// overwritten wholesale (last writer wins); id and email are kept.
pub async fn upsert(pool: &SqlitePool, employee: &Employee) -> Result<UpsertOutcome> {
    let mut tx = begin_write(pool).await?;

    let existed: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = ?)")
        .bind(&employee.email)
        .fetch_one(&mut *tx)
        .await?;

    upsert_in_tx(&mut tx, employee).await?;
    tx.commit().await?;

    let outcome = if existed {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Inserted
    };
    debug!(email = %employee.email, ?outcome, "Upserted employee");

    Ok(outcome)
}

/// Insert or merge an employee inside a caller-owned transaction
pub async fn upsert_in_tx(tx: &mut Transaction<'_, Sqlite>, employee: &Employee) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO employees (name, email, mobile, designation, faculty, school)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            name = excluded.name,
            mobile = excluded.mobile,
            designation = excluded.designation,
            faculty = excluded.faculty,
            school = excluded.school
        "#,
    )
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.mobile)
    .bind(&employee.designation)
    .bind(&employee.faculty)
    .bind(&employee.school)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Snapshot of every stored email, read inside the caller's transaction
pub async fn existing_emails(tx: &mut Transaction<'_, Sqlite>) -> Result<HashSet<String>> {
    let emails: Vec<String> = sqlx::query_scalar("SELECT email FROM employees")
        .fetch_all(&mut **tx)
        .await?;

    Ok(emails.into_iter().collect())
}

/// Paginated listing filtered by case-insensitive substring of name
///
/// Ordered by name then id. `total` counts every match, not just this page.
pub async fn list(
    pool: &SqlitePool,
    filter: Option<&str>,
    page: i64,
    page_size: i64,
) -> Result<EmployeePage> {
    let pagination = Pagination::new(page, page_size);
    let pattern = filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(like_pattern);

    // Count and slice from the same snapshot
    let mut tx = pool.begin().await?;

    let total: i64 = sqlx::query_scalar(
        r"SELECT COUNT(*) FROM employees WHERE (?1 IS NULL OR name LIKE ?1 ESCAPE '\')",
    )
    .bind(&pattern)
    .fetch_one(&mut *tx)
    .await?;

    let employees = sqlx::query_as::<_, Employee>(&format!(
        r"{} WHERE (?1 IS NULL OR name LIKE ?1 ESCAPE '\') ORDER BY name ASC, id ASC LIMIT ?2 OFFSET ?3",
        SELECT_COLUMNS
    ))
    .bind(&pattern)
    .bind(pagination.per_page)
    .bind(pagination.offset)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(EmployeePage { employees, total })
}

/// Exact-name lookup
///
/// When several employees share a name, the one with the lowest id wins.
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "{} WHERE name = ? ORDER BY id ASC LIMIT 1",
        SELECT_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(employee)
}

/// Every employee, ordered by name then id
pub async fn all(pool: &SqlitePool) -> Result<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!("{} ORDER BY name ASC, id ASC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await?;

    Ok(employees)
}

/// Number of stored employees
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    Ok(total)
}

/// Build a LIKE pattern matching `needle` anywhere, with wildcards escaped
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_plain() {
        assert_eq!(like_pattern("doe"), "%doe%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_a\\b"), r"%50\%\_a\\b%");
    }
}
