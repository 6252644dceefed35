//! Integration tests for the TOML archive store

use grade_index::models::{Semester, Subject};
use grade_index::store::{SemesterStore, TomlStore};
use grade_index::Error;
use std::fs;
use tempfile::TempDir;

fn subject(name: &str, credits: i32, grade: &str, mandatory: bool) -> Subject {
    Subject::new(name, credits, grade, mandatory).expect("valid subject")
}

#[test]
fn test_missing_archive_opens_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TomlStore::open(dir.path().join("archive.toml")).expect("open");

    assert!(store.load_all_semesters().unwrap().is_empty());
    assert!(!store.path().exists(), "opening must not create the file");
}

#[test]
fn test_archive_survives_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("archive.toml");

    let mut store = TomlStore::open(&path).expect("open");
    let saved = store
        .save_semester(
            Semester::new(
                1,
                vec![
                    subject("Calculus 1", 6, "MS", true).with_code(Some("MAT0025".into())),
                    subject("Music", 4, "SS", false),
                ],
            )
            .unwrap()
            .with_declared(3, 10),
        )
        .expect("save");
    assert!(path.exists());

    let reopened = TomlStore::open(&path).expect("reopen");
    let loaded = reopened.load_all_semesters().unwrap();
    assert_eq!(loaded, vec![saved]);

    // declared drift is kept as written
    assert_eq!(loaded[0].declared_subject_count(), 3);
    assert_eq!(loaded[0].subject_count(), 2);
    assert_eq!(loaded[0].subjects()[0].code(), Some("MAT0025"));
}

#[test]
fn test_ids_continue_after_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("archive.toml");

    let mut store = TomlStore::open(&path).unwrap();
    store
        .save_semester(Semester::new(1, vec![subject("A", 4, "MM", true)]).unwrap())
        .unwrap();
    store.delete_semester(1).unwrap();

    let mut store = TomlStore::open(&path).unwrap();
    let next = store
        .save_semester(Semester::new(2, vec![subject("B", 4, "MM", true)]).unwrap())
        .unwrap();
    assert_eq!(next.id(), Some(2));
    assert_eq!(next.subjects()[0].id(), Some(2));
}

#[test]
fn test_subject_operations_are_persisted() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("archive.toml");

    let mut store = TomlStore::open(&path).unwrap();
    store
        .save_semester(Semester::new(1, vec![subject("A", 4, "MM", true)]).unwrap())
        .unwrap();
    let added = store
        .save_subject(subject("B", 2, "SS", false).with_semester_id(Some(1)))
        .unwrap();
    store
        .save_subject(added.clone().with_grade("MI"))
        .unwrap();

    let reopened = TomlStore::open(&path).unwrap();
    let semester = reopened.get_semester(1).unwrap();
    assert_eq!(semester.subject_count(), 2);
    assert_eq!(semester.declared_total_credits(), 6);
    assert_eq!(reopened.get_subject(added.id().unwrap()).unwrap().grade(), "MI");
}

#[test]
fn test_not_found_leaves_file_untouched() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("archive.toml");

    let mut store = TomlStore::open(&path).unwrap();
    store
        .save_semester(Semester::new(1, Vec::new()).unwrap())
        .unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(
        store.delete_semester(99),
        Err(Error::NotFound { entity: "semester", id: 99 })
    ));
    assert!(matches!(
        store.delete_subject(5),
        Err(Error::NotFound { entity: "subject", id: 5 })
    ));
    assert!(matches!(
        store.get_subject(5),
        Err(Error::NotFound { entity: "subject", .. })
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_corrupt_archive_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("archive.toml");
    fs::write(&path, "[[semester]]\nnumber = \"first\"\n").unwrap();

    assert!(matches!(
        TomlStore::open(&path),
        Err(Error::ArchiveParse(_))
    ));
}
