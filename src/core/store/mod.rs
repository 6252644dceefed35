//! Semester storage
//!
//! The core reads and writes whole semester records through the
//! [`SemesterStore`] trait. Two implementations are provided:
//! [`MemoryStore`], which keeps everything in process, and
//! [`TomlStore`](archive::TomlStore), which mirrors a [`MemoryStore`] into a
//! TOML archive file after every mutation.

pub mod archive;

pub use archive::TomlStore;

use crate::core::consistency;
use crate::core::error::{Error, Result};
use crate::core::models::{Semester, Subject};
use logger::info;

/// Storage abstraction so the tracker can be exercised without a file.
pub trait SemesterStore {
    /// Every stored semester, with subjects, in insertion order.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn load_all_semesters(&self) -> Result<Vec<Semester>>;

    /// One stored semester.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no semester has this id.
    fn get_semester(&self, id: i64) -> Result<Semester>;

    /// One stored subject.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no subject has this id.
    fn get_subject(&self, id: i64) -> Result<Subject>;

    /// Create (no id) or update (id present) a semester; returns it with ids assigned.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when updating an id that is not stored.
    fn save_semester(&mut self, semester: Semester) -> Result<Semester>;

    /// Create (no id) or update (id present) a single subject inside the
    /// semester named by its `semester_id`. A subject whose `semester_id`
    /// changed is moved between semesters.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSubject`] without a `semester_id`, and
    /// [`Error::NotFound`] when the semester or subject id is not stored.
    fn save_subject(&mut self, subject: Subject) -> Result<Subject>;

    /// [`save_subject`](Self::save_subject), with the declared values of the
    /// semester it lands in recomputed in the same write.
    ///
    /// # Errors
    /// Same as [`save_subject`](Self::save_subject).
    fn save_subject_reconciled(&mut self, subject: Subject) -> Result<Subject>;

    /// Delete a semester and its subjects.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no semester has this id.
    fn delete_semester(&mut self, id: i64) -> Result<()>;

    /// Delete a subject from whichever semester owns it.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no subject has this id.
    fn delete_subject(&mut self, id: i64) -> Result<()>;
}

/// In-process store; ids come from one increasing counter per entity kind.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    semesters: Vec<Semester>,
    next_semester_id: i64,
    next_subject_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub const fn new() -> Self {
        Self {
            semesters: Vec::new(),
            next_semester_id: 1,
            next_subject_id: 1,
        }
    }

    /// Rebuild a store from already persisted semesters.
    ///
    /// Counters never go below one past the largest id present.
    #[must_use]
    pub fn from_parts(
        semesters: Vec<Semester>,
        next_semester_id: i64,
        next_subject_id: i64,
    ) -> Self {
        let max_semester = semesters.iter().filter_map(Semester::id).max().unwrap_or(0);
        let max_subject = semesters
            .iter()
            .flat_map(Semester::subjects)
            .filter_map(Subject::id)
            .max()
            .unwrap_or(0);
        Self {
            semesters,
            next_semester_id: next_semester_id.max(max_semester + 1),
            next_subject_id: next_subject_id.max(max_subject + 1),
        }
    }

    /// Stored semesters in insertion order
    #[must_use]
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Next id handed to a new semester
    #[must_use]
    pub const fn next_semester_id(&self) -> i64 {
        self.next_semester_id
    }

    /// Next id handed to a new subject
    #[must_use]
    pub const fn next_subject_id(&self) -> i64 {
        self.next_subject_id
    }

    fn take_semester_id(&mut self) -> i64 {
        let id = self.next_semester_id;
        self.next_semester_id += 1;
        id
    }

    fn take_subject_id(&mut self) -> i64 {
        let id = self.next_subject_id;
        self.next_subject_id += 1;
        id
    }

    fn semester_position(&self, id: i64) -> Result<usize> {
        self.semesters
            .iter()
            .position(|s| s.id() == Some(id))
            .ok_or(Error::NotFound {
                entity: "semester",
                id,
            })
    }

    fn subject_owner(&self, subject_id: i64) -> Result<usize> {
        self.semesters
            .iter()
            .position(|s| s.find_subject(subject_id).is_some())
            .ok_or(Error::NotFound {
                entity: "subject",
                id: subject_id,
            })
    }

    /// Give every id-less subject a fresh id.
    fn assign_subject_ids(&mut self, subjects: &[Subject]) -> Vec<Subject> {
        subjects
            .iter()
            .cloned()
            .map(|s| match s.id() {
                Some(_) => s,
                None => {
                    let id = self.take_subject_id();
                    s.with_id(id)
                }
            })
            .collect()
    }
}

impl SemesterStore for MemoryStore {
    fn load_all_semesters(&self) -> Result<Vec<Semester>> {
        Ok(self.semesters.clone())
    }

    fn get_semester(&self, id: i64) -> Result<Semester> {
        let pos = self.semester_position(id)?;
        Ok(self.semesters[pos].clone())
    }

    fn get_subject(&self, id: i64) -> Result<Subject> {
        let owner = self.subject_owner(id)?;
        self.semesters[owner]
            .find_subject(id)
            .cloned()
            .ok_or(Error::NotFound {
                entity: "subject",
                id,
            })
    }

    fn save_semester(&mut self, semester: Semester) -> Result<Semester> {
        if let Some(id) = semester.id() {
            let pos = self.semester_position(id)?;
            let stored = &self.semesters[pos];
            // Subject ids on an update must already belong to this semester.
            if let Some(foreign) = semester
                .subjects()
                .iter()
                .filter_map(Subject::id)
                .find(|sid| stored.find_subject(*sid).is_none())
            {
                return Err(Error::NotFound {
                    entity: "subject",
                    id: foreign,
                });
            }
            let subjects = self.assign_subject_ids(semester.subjects());
            let updated = semester.with_subjects(subjects);
            self.semesters[pos] = updated.clone();
            info!("Updated semester {id} (number {})", updated.number());
            return Ok(updated);
        }

        // A new record never reuses subject ids.
        let fresh: Vec<Subject> = semester
            .subjects()
            .iter()
            .cloned()
            .map(Subject::without_id)
            .collect();
        let subjects = self.assign_subject_ids(&fresh);
        let id = self.take_semester_id();
        let created = semester.with_subjects(subjects).with_id(id);
        self.semesters.push(created.clone());
        info!(
            "Created semester {id} (number {}, {} subjects)",
            created.number(),
            created.subject_count()
        );
        Ok(created)
    }

    fn save_subject(&mut self, subject: Subject) -> Result<Subject> {
        let semester_id = subject.semester_id().ok_or_else(|| {
            Error::InvalidSubject("subject must reference a semester".to_string())
        })?;
        let target = self.semester_position(semester_id)?;

        let Some(subject_id) = subject.id() else {
            let id = self.take_subject_id();
            let created = subject.with_id(id).with_semester_id(Some(semester_id));
            self.semesters[target] = self.semesters[target].clone().with_subject(created.clone());
            info!("Created subject {id} in semester {semester_id}");
            return Ok(created);
        };

        let owner = self.subject_owner(subject_id)?;
        let stored = subject.with_semester_id(Some(semester_id));
        if owner == target {
            self.semesters[target] = self.semesters[target]
                .clone()
                .with_replaced_subject(stored.clone())?;
            info!("Updated subject {subject_id}");
        } else {
            self.semesters[owner] = self.semesters[owner].clone().without_subject(subject_id)?;
            self.semesters[target] = self.semesters[target].clone().with_subject(stored.clone());
            info!("Moved subject {subject_id} to semester {semester_id}");
        }
        Ok(stored)
    }

    fn save_subject_reconciled(&mut self, subject: Subject) -> Result<Subject> {
        let saved = self.save_subject(subject)?;
        if let Some(semester_id) = saved.semester_id() {
            let pos = self.semester_position(semester_id)?;
            self.semesters[pos] = consistency::reconcile(&self.semesters[pos]);
        }
        Ok(saved)
    }

    fn delete_semester(&mut self, id: i64) -> Result<()> {
        let pos = self.semester_position(id)?;
        let removed = self.semesters.remove(pos);
        info!(
            "Deleted semester {id} (number {}) with {} subjects",
            removed.number(),
            removed.subject_count()
        );
        Ok(())
    }

    fn delete_subject(&mut self, id: i64) -> Result<()> {
        let owner = self.subject_owner(id)?;
        self.semesters[owner] = self.semesters[owner].clone().without_subject(id)?;
        info!("Deleted subject {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semester(number: u32, names: &[&str]) -> Semester {
        let subjects = names
            .iter()
            .map(|n| Subject::new(*n, 4, "MS", true).unwrap())
            .collect();
        Semester::new(number, subjects).unwrap()
    }

    #[test]
    fn test_save_assigns_ids() {
        let mut store = MemoryStore::new();
        let saved = store.save_semester(semester(1, &["A", "B"])).unwrap();

        assert_eq!(saved.id(), Some(1));
        let ids: Vec<_> = saved.subjects().iter().map(Subject::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert!(saved.subjects().iter().all(|s| s.semester_id() == Some(1)));

        let second = store.save_semester(semester(2, &["C"])).unwrap();
        assert_eq!(second.id(), Some(2));
        assert_eq!(second.subjects()[0].id(), Some(3));
        assert_eq!(store.load_all_semesters().unwrap().len(), 2);
    }

    #[test]
    fn test_update_existing_semester() {
        let mut store = MemoryStore::new();
        let saved = store.save_semester(semester(1, &["A"])).unwrap();

        let edited = saved
            .with_number(2)
            .unwrap()
            .with_subject(Subject::new("B", 2, "SS", false).unwrap());
        let updated = store.save_semester(edited).unwrap();

        assert_eq!(updated.id(), Some(1));
        assert_eq!(updated.number(), 2);
        assert_eq!(updated.subjects()[1].id(), Some(2));
        assert_eq!(store.get_semester(1).unwrap(), updated);
    }

    #[test]
    fn test_update_unknown_semester_is_not_found() {
        let mut store = MemoryStore::new();
        let ghost = semester(1, &["A"]).with_id(42);
        assert!(matches!(
            store.save_semester(ghost),
            Err(Error::NotFound { entity: "semester", id: 42 })
        ));
    }

    #[test]
    fn test_delete_semantics() {
        let mut store = MemoryStore::new();
        store.save_semester(semester(1, &["A", "B"])).unwrap();

        store.delete_subject(1).unwrap();
        let stored = store.get_semester(1).unwrap();
        assert_eq!(stored.subject_count(), 1);
        assert_eq!(stored.declared_subject_count(), 1);
        assert_eq!(stored.declared_total_credits(), 4);

        assert!(matches!(
            store.delete_subject(1),
            Err(Error::NotFound { entity: "subject", id: 1 })
        ));
        store.delete_semester(1).unwrap();
        assert!(matches!(
            store.delete_semester(1),
            Err(Error::NotFound { entity: "semester", id: 1 })
        ));
        assert!(store.load_all_semesters().unwrap().is_empty());
    }

    #[test]
    fn test_save_subject_creates_updates_and_moves() {
        let mut store = MemoryStore::new();
        store.save_semester(semester(1, &["A"])).unwrap();
        store.save_semester(semester(2, &[])).unwrap();

        let created = store
            .save_subject(
                Subject::new("New", 3, "MM", false)
                    .unwrap()
                    .with_semester_id(Some(1)),
            )
            .unwrap();
        assert_eq!(created.id(), Some(2));
        assert_eq!(store.get_semester(1).unwrap().declared_total_credits(), 7);

        let regraded = store
            .save_subject(store.get_subject(2).unwrap().with_grade("SS"))
            .unwrap();
        assert_eq!(regraded.grade(), "SS");
        assert_eq!(store.get_subject(2).unwrap().grade(), "SS");

        store
            .save_subject(store.get_subject(2).unwrap().with_semester_id(Some(2)))
            .unwrap();
        assert_eq!(store.get_semester(1).unwrap().subject_count(), 1);
        assert_eq!(store.get_semester(2).unwrap().subject_count(), 1);
        assert_eq!(store.get_subject(2).unwrap().semester_id(), Some(2));
    }

    #[test]
    fn test_save_subject_reconciled_clears_drift() {
        let mut store = MemoryStore::new();
        store
            .save_semester(semester(1, &["A"]).with_declared(4, 30))
            .unwrap();

        let created = store
            .save_subject_reconciled(
                Subject::new("B", 2, "MM", false)
                    .unwrap()
                    .with_semester_id(Some(1)),
            )
            .unwrap();
        let stored = store.get_semester(1).unwrap();

        assert_eq!(created.semester_id(), Some(1));
        assert_eq!(stored.declared_subject_count(), 2);
        assert_eq!(stored.declared_total_credits(), 6);
    }

    #[test]
    fn test_save_subject_requires_semester() {
        let mut store = MemoryStore::new();
        let orphan = Subject::new("Orphan", 2, "MM", true).unwrap();
        assert!(matches!(
            store.save_subject(orphan.clone()),
            Err(Error::InvalidSubject(_))
        ));
        assert!(matches!(
            store.save_subject(orphan.with_semester_id(Some(9))),
            Err(Error::NotFound { entity: "semester", id: 9 })
        ));
    }

    #[test]
    fn test_from_parts_repairs_counters() {
        let stored = semester(1, &["A"]).with_id(5);
        let stored = stored
            .clone()
            .with_subjects(vec![stored.subjects()[0].clone().with_id(8)]);
        let store = MemoryStore::from_parts(vec![stored], 1, 1);

        assert_eq!(store.next_semester_id(), 6);
        assert_eq!(store.next_subject_id(), 9);
    }
}
