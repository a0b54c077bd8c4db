//! Bulk QR archive assembly
//!
//! Each employee becomes one `<safe name>-bizcard.png` entry holding the QR
//! code of their contact record. Rendering runs concurrently on the blocking
//! pool; the archive itself has a single writer.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use sqlx::SqlitePool;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::db::employees;
use crate::{qr, vcard, Employee, Error, Result};

/// Suggested download name for the bulk archive
pub const ARCHIVE_FILENAME: &str = "employee_qr_codes.zip";

const ENTRY_SUFFIX: &str = "-bizcard.png";

/// One rendered card ready to be written into the archive
#[derive(Debug, Clone)]
pub struct CardImage {
    /// Safe name of the employee, before collision handling
    pub stem: String,
    pub png: Vec<u8>,
}

/// Build the contact record for `employee` and encode it as a QR PNG
pub fn render_card(employee: &Employee) -> Result<CardImage> {
    let record = vcard::build(employee);
    let png = qr::encode(&record)?;

    Ok(CardImage {
        stem: vcard::safe_name(&employee.name),
        png,
    })
}

/// Write rendered cards into a deflate-compressed zip, in order
///
/// Colliding stems get `-2`, `-3`, ... appended so no entry is lost.
pub fn write_archive(cards: &[CardImage]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used = HashSet::with_capacity(cards.len());

    for card in cards {
        let entry = unique_entry_name(&card.stem, &mut used);
        writer.start_file(entry.as_str(), options)?;
        writer.write_all(&card.png)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// First free `<stem>[-n]-bizcard.png` name; records it as used
fn unique_entry_name(stem: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = format!("{}{}", stem, ENTRY_SUFFIX);
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{}-{}{}", stem, n, ENTRY_SUFFIX);
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Render cards for `list` concurrently and package them
pub async fn assemble(list: Vec<Employee>) -> Result<Vec<u8>> {
    let tasks = list.into_iter().map(|employee| {
        tokio::task::spawn_blocking(move || render_card(&employee))
    });

    // try_join_all keeps input order, so entry names are stable
    let cards = futures::future::try_join_all(tasks)
        .await
        .map_err(|e| Error::Internal(format!("card render task failed: {}", e)))?
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    debug!(cards = cards.len(), "Rendered cards");

    tokio::task::spawn_blocking(move || write_archive(&cards))
        .await
        .map_err(|e| Error::Internal(format!("archive task failed: {}", e)))?
}

/// Archive of every employee's card
///
/// Fails with `NotFound` when the directory is empty.
pub async fn assemble_all(pool: &SqlitePool) -> Result<Vec<u8>> {
    let list = employees::all(pool).await?;
    if list.is_empty() {
        return Err(Error::NotFound("No employees found".to_string()));
    }

    let count = list.len();
    let bytes = assemble(list).await?;
    info!(entries = count, bytes = bytes.len(), "Assembled QR archive");

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_unique_entry_names() {
        let mut used = HashSet::new();
        assert_eq!(unique_entry_name("Jane_Doe", &mut used), "Jane_Doe-bizcard.png");
        assert_eq!(unique_entry_name("Jane_Doe", &mut used), "Jane_Doe-2-bizcard.png");
        assert_eq!(unique_entry_name("Jane_Doe", &mut used), "Jane_Doe-3-bizcard.png");
        assert_eq!(unique_entry_name("Ann", &mut used), "Ann-bizcard.png");
    }

    #[test]
    fn test_suffix_skips_names_taken_by_real_stems() {
        let mut used = HashSet::new();
        unique_entry_name("A-2", &mut used);
        unique_entry_name("A", &mut used);
        assert_eq!(unique_entry_name("A", &mut used), "A-3-bizcard.png");
    }

    #[test]
    fn test_render_card_uses_safe_name() {
        let card = render_card(&Employee::new("R&D / Ops Lead", "ops@example.edu")).unwrap();
        assert_eq!(card.stem, "R&D___Ops_Lead");
        assert!(!card.png.is_empty());
    }

    #[test]
    fn test_write_archive_entries_are_pngs() {
        let cards = vec![
            render_card(&Employee::new("Jane Doe", "jane@example.edu")).unwrap(),
            render_card(&Employee::new("Madonna", "m@example.edu")).unwrap(),
        ];
        let bytes = write_archive(&cards).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut png = Vec::new();
            entry.read_to_end(&mut png).unwrap();
            assert!(image::load_from_memory(&png).is_ok());
        }
    }

    #[tokio::test]
    async fn test_assemble_keeps_colliding_entries() {
        let list = vec![
            Employee::new("Jane Doe", "a@example.edu"),
            Employee::new("Jane/Doe", "b@example.edu"),
        ];
        let names = entry_names(assemble(list).await.unwrap());
        assert_eq!(names, vec!["Jane_Doe-bizcard.png", "Jane_Doe-2-bizcard.png"]);
    }
}
