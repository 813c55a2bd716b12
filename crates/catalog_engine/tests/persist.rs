use std::fs;

use catalog_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_nested_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("out").join("vitamins");
    assert!(!nested.exists());
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn file_in_place_of_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("taken");
    fs::write(&file, "x").unwrap();
    assert!(matches!(
        ensure_output_dir(&file),
        Err(PersistError::OutputDir { .. })
    ));
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("media"));

    let first = writer.write("a.jpg", [1u8, 2, 3]).unwrap();
    assert_eq!(first.file_name().unwrap(), "a.jpg");
    assert_eq!(fs::read(&first).unwrap(), vec![1, 2, 3]);

    let second = writer.write("a.jpg", "text").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "text");

    let leftovers: Vec<_> = fs::read_dir(temp.path().join("media"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}
