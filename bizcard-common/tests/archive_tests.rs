//! Archive assembly against a real store

use std::io::{Cursor, Read};

use bizcard_common::archive::assemble_all;
use bizcard_common::db::{init_database, upsert};
use bizcard_common::{Employee, Error};
use tempfile::TempDir;

#[tokio::test]
async fn test_empty_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bizcard.db")).await.unwrap();

    let result = assemble_all(&pool).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_one_png_entry_per_employee() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bizcard.db")).await.unwrap();

    let people = [
        ("Jane Doe", "jane@example.edu"),
        ("Madonna", "madonna@example.edu"),
        ("R/D Team", "rd@example.edu"),
        ("Li Wei", "li@example.edu"),
    ];
    for (name, email) in people {
        upsert(&pool, &Employee::new(name, email)).await.unwrap();
    }

    let bytes = assemble_all(&pool).await.unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    assert_eq!(archive.len(), people.len());

    let mut names = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        names.push(entry.name().to_string());

        let mut png = Vec::new();
        entry.read_to_end(&mut png).unwrap();
        let decoded = image::load_from_memory(&png).expect("entry should be a valid PNG");
        assert_eq!(decoded.width(), decoded.height());
    }

    // Ordered by name
    assert_eq!(
        names,
        vec![
            "Jane_Doe-bizcard.png",
            "Li_Wei-bizcard.png",
            "Madonna-bizcard.png",
            "R_D_Team-bizcard.png",
        ]
    );
}
