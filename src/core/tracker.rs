//! Session facade over a [`SemesterStore`]
//!
//! The tracker owns the in-memory semester collection for one session. It
//! validates every semester on load (advisory only) and every semester about
//! to be persisted, where the [`ValidationPolicy`] decides whether drift is
//! reconciled first and whether remaining discrepancies block the write.

use crate::core::config::ValidationConfig;
use crate::core::consistency::{self, ValidationResult};
use crate::core::error::{Error, Result};
use crate::core::grade::GRADE_LABELS;
use crate::core::index::{self, AcademicIndices, SemesterBreakdown};
use crate::core::models::{Semester, Subject};
use crate::core::store::SemesterStore;
use logger::{debug, info, warn};

/// How validation findings are treated before a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Refuse to persist a semester with any discrepancy.
    pub strict: bool,
    /// Recompute declared values from the subject list before persisting.
    pub reconcile_on_save: bool,
}

impl ValidationPolicy {
    /// Policy described by the `[validation]` config section.
    #[must_use]
    pub const fn from_config(config: &ValidationConfig) -> Self {
        Self {
            strict: config.strict,
            reconcile_on_save: config.reconcile_on_save,
        }
    }
}

/// Loaded semester history plus the store it came from.
#[derive(Debug)]
pub struct Tracker<S: SemesterStore> {
    store: S,
    policy: ValidationPolicy,
    semesters: Vec<Semester>,
}

impl<S: SemesterStore> Tracker<S> {
    /// Load every semester from `store` and report discrepancies.
    ///
    /// Findings on load are logged as warnings and never fail the load, so
    /// inconsistent data can still be inspected and reconciled.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(store: S, policy: ValidationPolicy) -> Result<Self> {
        let semesters = store.load_all_semesters()?;
        for semester in &semesters {
            log_findings(&consistency::check(semester));
        }
        debug!("Tracker opened with {} semesters", semesters.len());
        Ok(Self {
            store,
            policy,
            semesters,
        })
    }

    /// Semesters of this session, in storage order
    #[must_use]
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Active policy
    #[must_use]
    pub const fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Consume the tracker, returning the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Both indices over the loaded history.
    ///
    /// # Errors
    /// See [`index::compute_indices`].
    pub fn compute_indices(&self) -> Result<AcademicIndices> {
        index::compute_indices(&self.semesters)
    }

    /// Per-semester figures over the loaded history.
    ///
    /// # Errors
    /// See [`index::semester_breakdown`].
    pub fn breakdown(&self) -> Result<Vec<SemesterBreakdown>> {
        index::semester_breakdown(&self.semesters)
    }

    /// Validation results for every loaded semester.
    #[must_use]
    pub fn validate_all(&self) -> Vec<ValidationResult> {
        self.semesters.iter().map(consistency::check).collect()
    }

    /// A loaded semester by storage id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if it is not part of the session.
    pub fn semester(&self, id: i64) -> Result<&Semester> {
        self.semesters
            .iter()
            .find(|s| s.id() == Some(id))
            .ok_or(Error::NotFound {
                entity: "semester",
                id,
            })
    }

    /// Create or update a semester after applying the policy.
    ///
    /// # Errors
    /// Returns [`Error::ConsistencyMismatch`] in strict mode, or any store error.
    pub fn save_semester(&mut self, semester: Semester) -> Result<Semester> {
        let prepared = self.prepare(semester)?;
        let saved = self.store.save_semester(prepared)?;
        self.refresh()?;
        Ok(saved)
    }

    /// Create, update, or move a single subject after applying the policy to
    /// the semester it ends up in.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSubject`] without a `semester_id`,
    /// [`Error::ConsistencyMismatch`] in strict mode, or any store error.
    pub fn save_subject(&mut self, subject: Subject) -> Result<Subject> {
        let semester_id = subject.semester_id().ok_or_else(|| {
            Error::InvalidSubject("subject must reference a semester".to_string())
        })?;
        let target = self.store.get_semester(semester_id)?;
        let prospective = match subject.id() {
            Some(id) if target.find_subject(id).is_some() => {
                target.with_replaced_subject(subject.clone())?
            }
            _ => target.with_subject(subject.clone()),
        };
        self.prepare(prospective)?;

        let saved = if self.policy.reconcile_on_save {
            self.store.save_subject_reconciled(subject)?
        } else {
            self.store.save_subject(subject)?
        };
        self.refresh()?;
        Ok(saved)
    }

    /// Delete a semester and its subjects.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the id is not stored.
    pub fn delete_semester(&mut self, id: i64) -> Result<()> {
        self.store.delete_semester(id)?;
        self.refresh()
    }

    /// Delete a subject.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the id is not stored.
    pub fn delete_subject(&mut self, id: i64) -> Result<()> {
        self.store.delete_subject(id)?;
        self.refresh()
    }

    /// Overwrite a stored semester's declared values from its subject list.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the id is not stored.
    pub fn reconcile_semester(&mut self, id: i64) -> Result<Semester> {
        let current = self.store.get_semester(id)?;
        let fixed = self.store.save_semester(consistency::reconcile(&current))?;
        info!(
            "Reconciled semester {id}: {} subjects, {} credits",
            fixed.declared_subject_count(),
            fixed.declared_total_credits()
        );
        self.refresh()?;
        Ok(fixed)
    }

    /// Apply the policy to a semester about to be written.
    fn prepare(&self, semester: Semester) -> Result<Semester> {
        let mut findings = consistency::check(&semester);
        let semester = if self.policy.reconcile_on_save && findings.has_summary_drift() {
            debug!("Reconciling semester {} before save", semester.number());
            let fixed = consistency::reconcile(&semester);
            findings = consistency::check(&fixed);
            fixed
        } else {
            semester
        };

        if findings.is_consistent() {
            return Ok(semester);
        }
        if self.policy.strict {
            return Err(Error::ConsistencyMismatch {
                semester: findings.semester,
                discrepancies: findings.discrepancies,
            });
        }
        log_findings(&findings);
        Ok(semester)
    }

    fn refresh(&mut self) -> Result<()> {
        self.semesters = self.store.load_all_semesters()?;
        Ok(())
    }
}

/// Validate a semester without a session.
#[must_use]
pub fn validate_semester(semester: &Semester) -> ValidationResult {
    consistency::check(semester)
}

/// Grade labels accepted on input, highest weight first.
#[must_use]
pub const fn grade_labels() -> &'static [&'static str] {
    &GRADE_LABELS
}

fn log_findings(result: &ValidationResult) {
    for discrepancy in &result.discrepancies {
        warn!("Semester {}: {discrepancy}", result.semester);
    }
}
