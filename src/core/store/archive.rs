//! TOML archive file backing a [`MemoryStore`]
//!
//! Layout:
//!
//! ```toml
//! next_semester_id = 3
//! next_subject_id = 5
//!
//! [[semester]]
//! id = 1
//! number = 1
//! subject_count = 2
//! total_credits = 10
//!
//! [[semester.subject]]
//! id = 1
//! name = "Calculus 1"
//! code = "MAT0025"
//! credits = 6
//! grade = "MS"
//! mandatory = true
//! ```
//!
//! `subject_count` and `total_credits` are the declared values and are stored
//! as given, so drift survives a round trip and can be reported on load.

use super::{MemoryStore, SemesterStore};
use crate::core::error::{Error, Result};
use crate::core::models::{Semester, Subject};
use logger::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Whole archive file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFile {
    /// Next id handed to a new semester
    #[serde(default)]
    pub next_semester_id: i64,
    /// Next id handed to a new subject
    #[serde(default)]
    pub next_subject_id: i64,
    /// Semester records in insertion order
    #[serde(default, rename = "semester")]
    pub semesters: Vec<SemesterRecord>,
}

/// Stored form of a [`Semester`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterRecord {
    /// Storage id
    pub id: i64,
    /// Sequence position
    pub number: u32,
    /// Declared subject count
    pub subject_count: usize,
    /// Declared credit total
    pub total_credits: i64,
    /// Subject records in enrollment order
    #[serde(default, rename = "subject")]
    pub subjects: Vec<SubjectRecord>,
}

/// Stored form of a [`Subject`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Storage id
    pub id: i64,
    /// Subject name
    pub name: String,
    /// Optional institutional code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Credit hours
    pub credits: i32,
    /// Grade label
    pub grade: String,
    /// Mandatory flag
    pub mandatory: bool,
}

impl SubjectRecord {
    fn from_subject(subject: &Subject) -> Self {
        Self {
            id: subject.id().unwrap_or_default(),
            name: subject.name().to_string(),
            code: subject.code().map(str::to_string),
            credits: subject.credits(),
            grade: subject.grade().to_string(),
            mandatory: subject.is_mandatory(),
        }
    }

    fn into_subject(self) -> Result<Subject> {
        Ok(Subject::new(self.name, self.credits, self.grade, self.mandatory)?
            .with_id(self.id)
            .with_code(self.code))
    }
}

impl SemesterRecord {
    fn from_semester(semester: &Semester) -> Self {
        Self {
            id: semester.id().unwrap_or_default(),
            number: semester.number(),
            subject_count: semester.declared_subject_count(),
            total_credits: semester.declared_total_credits(),
            subjects: semester
                .subjects()
                .iter()
                .map(SubjectRecord::from_subject)
                .collect(),
        }
    }

    fn into_semester(self) -> Result<Semester> {
        let subjects = self
            .subjects
            .into_iter()
            .map(SubjectRecord::into_subject)
            .collect::<Result<Vec<_>>>()?;
        Ok(Semester::new(self.number, subjects)?
            .with_declared(self.subject_count, self.total_credits)
            .with_id(self.id))
    }
}

impl ArchiveFile {
    /// Snapshot of a store
    #[must_use]
    pub fn from_store(store: &MemoryStore) -> Self {
        Self {
            next_semester_id: store.next_semester_id(),
            next_subject_id: store.next_subject_id(),
            semesters: store
                .semesters()
                .iter()
                .map(SemesterRecord::from_semester)
                .collect(),
        }
    }

    /// Rebuild a store from the archive contents.
    ///
    /// # Errors
    /// Returns an error if a record fails entity validation (blank subject
    /// name, semester number zero).
    pub fn into_store(self) -> Result<MemoryStore> {
        let semesters = self
            .semesters
            .into_iter()
            .map(SemesterRecord::into_semester)
            .collect::<Result<Vec<_>>>()?;
        Ok(MemoryStore::from_parts(
            semesters,
            self.next_semester_id,
            self.next_subject_id,
        ))
    }

    /// Parse archive text.
    ///
    /// # Errors
    /// Returns [`Error::ArchiveParse`] for malformed TOML or a schema mismatch.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Render archive text.
    ///
    /// # Errors
    /// Returns [`Error::ArchiveWrite`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// File-backed store. The whole file is read on open and rewritten after
/// every successful mutation; a failed write leaves the in-memory state as it was.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl TomlStore {
    /// Open the archive at `path`. A missing file is an empty archive.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file exists but cannot be read,
    /// [`Error::ArchiveParse`] if it is not a valid archive.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let memory = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            ArchiveFile::from_toml(&text)?.into_store()?
        } else {
            debug!("Archive {} not found, starting empty", path.display());
            MemoryStore::new()
        };
        debug!(
            "Opened archive {} with {} semesters",
            path.display(),
            memory.semesters().len()
        );
        Ok(Self { path, memory })
    }

    /// Path of the archive file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, memory: &MemoryStore) -> Result<()> {
        let io_err = |source: std::io::Error| Error::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = ArchiveFile::from_store(memory).to_toml()?;
        fs::write(&self.path, text).map_err(io_err)?;
        debug!("Archive written to {}", self.path.display());
        Ok(())
    }

    /// Apply `op` to a copy of the store, persist it, then commit.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut next = self.memory.clone();
        let out = op(&mut next)?;
        self.persist(&next)?;
        self.memory = next;
        Ok(out)
    }
}

impl SemesterStore for TomlStore {
    fn load_all_semesters(&self) -> Result<Vec<Semester>> {
        self.memory.load_all_semesters()
    }

    fn get_semester(&self, id: i64) -> Result<Semester> {
        self.memory.get_semester(id)
    }

    fn get_subject(&self, id: i64) -> Result<Subject> {
        self.memory.get_subject(id)
    }

    fn save_semester(&mut self, semester: Semester) -> Result<Semester> {
        self.mutate(|m| m.save_semester(semester))
    }

    fn save_subject(&mut self, subject: Subject) -> Result<Subject> {
        self.mutate(|m| m.save_subject(subject))
    }

    fn save_subject_reconciled(&mut self, subject: Subject) -> Result<Subject> {
        self.mutate(|m| m.save_subject_reconciled(subject))
    }

    fn delete_semester(&mut self, id: i64) -> Result<()> {
        self.mutate(|m| m.delete_semester(id))
    }

    fn delete_subject(&mut self, id: i64) -> Result<()> {
        self.mutate(|m| m.delete_subject(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
next_semester_id = 2
next_subject_id = 3

[[semester]]
id = 1
number = 1
subject_count = 3
total_credits = 10

[[semester.subject]]
id = 1
name = "Calculus 1"
code = "MAT0025"
credits = 6
grade = "MS"
mandatory = true

[[semester.subject]]
id = 2
name = "Music"
credits = 4
grade = "SS"
mandatory = false
"#;

    #[test]
    fn test_parse_sample_archive() {
        let store = ArchiveFile::from_toml(SAMPLE).unwrap().into_store().unwrap();
        let semesters = store.load_all_semesters().unwrap();

        assert_eq!(semesters.len(), 1);
        let semester = &semesters[0];
        assert_eq!(semester.id(), Some(1));
        assert_eq!(semester.declared_subject_count(), 3);
        assert_eq!(semester.subject_count(), 2);
        assert_eq!(semester.subjects()[0].code(), Some("MAT0025"));
        assert!(semester.subjects()[1].code().is_none());
        assert!(semester.subjects().iter().all(|s| s.semester_id() == Some(1)));
        assert_eq!(store.next_subject_id(), 3);
    }

    #[test]
    fn test_archive_text_round_trip_keeps_drift() {
        let archive = ArchiveFile::from_toml(SAMPLE).unwrap();
        let text = archive.to_toml().unwrap();
        let reparsed = ArchiveFile::from_toml(&text).unwrap();
        assert_eq!(archive, reparsed);
    }

    #[test]
    fn test_empty_archive() {
        let archive = ArchiveFile::from_toml("").unwrap();
        let store = archive.into_store().unwrap();
        assert!(store.semesters().is_empty());
        assert_eq!(store.next_semester_id(), 1);
    }

    #[test]
    fn test_invalid_records_rejected() {
        let bad = r#"
[[semester]]
id = 1
number = 0
subject_count = 0
total_credits = 0
"#;
        let result = ArchiveFile::from_toml(bad).unwrap().into_store();
        assert!(matches!(result, Err(Error::InvalidSemester(_))));

        assert!(matches!(
            ArchiveFile::from_toml("[[semester]]\nid = \"x\""),
            Err(Error::ArchiveParse(_))
        ));
    }
}
