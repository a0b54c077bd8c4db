//! Bulk import reconciliation
//!
//! Takes a spreadsheet export (CSV), classifies each row as insert or update
//! against the emails already stored, and applies every row in one
//! transaction. Nothing is written unless the whole upload applies.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::{begin_write, employees};
use crate::{Employee, Error, Result};

/// Rows with fewer columns than this are skipped silently
pub const MIN_COLUMNS: usize = 9;

/// Fixed column positions in the export
mod column {
    pub const EMAIL: usize = 1;
    pub const NAME: usize = 3;
    pub const DESIGNATION: usize = 5;
    pub const FACULTY: usize = 6;
    pub const SCHOOL: usize = 7;
    pub const MOBILE: usize = 8;
}

/// Insert/update counts reported back to the uploader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub updated: u64,
}

/// Parse CSV bytes into employees, dropping the header and short rows
///
/// Fails with `InvalidInput` on malformed CSV or non-UTF-8 content; nothing
/// has touched the store at that point.
pub fn parse_rows(data: &[u8]) -> Result<Vec<Employee>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::InvalidInput(format!("Unreadable CSV: {}", e)))?;

        // Header
        if line == 0 {
            continue;
        }

        if record.len() < MIN_COLUMNS {
            skipped += 1;
            continue;
        }

        let cell = |i: usize| record.get(i).unwrap_or_default();
        let optional = |i: usize| Some(cell(i)).filter(|v| !v.is_empty()).map(str::to_string);

        rows.push(Employee {
            name: cell(column::NAME).to_string(),
            email: cell(column::EMAIL).to_string(),
            mobile: optional(column::MOBILE),
            designation: optional(column::DESIGNATION),
            faculty: optional(column::FACULTY),
            school: optional(column::SCHOOL),
        });
    }

    debug!(rows = rows.len(), skipped, "Parsed upload");
    Ok(rows)
}

/// Apply parsed rows against the store in a single transaction
///
/// Classification uses one snapshot of existing emails taken inside the
/// transaction; emails first seen in this upload join the snapshot so a
/// repeated email counts as one insert followed by updates.
pub async fn apply(pool: &SqlitePool, rows: &[Employee]) -> Result<ImportSummary> {
    let mut tx = begin_write(pool).await?;
    let mut known = employees::existing_emails(&mut tx).await?;
    let mut summary = ImportSummary::default();

    for row in rows {
        employees::upsert_in_tx(&mut tx, row).await?;

        if known.contains(&row.email) {
            summary.updated += 1;
        } else {
            summary.inserted += 1;
            known.insert(row.email.clone());
        }
    }

    tx.commit().await?;

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        "Bulk import applied"
    );

    Ok(summary)
}

/// Parse and apply an upload
pub async fn reconcile(pool: &SqlitePool, data: &[u8]) -> Result<ImportSummary> {
    let rows = parse_rows(data)?;
    apply(pool, &rows).await
}
