//! Semester model

use super::Subject;
use crate::core::error::{Error, Result};

/// Semesters past this position are weighted as if they were this one.
pub const SENIORITY_CAP: u32 = 6;

/// A semester and the subjects taken in it.
///
/// The declared subject count and credit total are the summary values the
/// archive stores next to the subject list. They are expected to mirror the
/// list but are not forced to; see [`crate::core::consistency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semester {
    id: Option<i64>,
    number: u32,
    declared_subject_count: usize,
    declared_total_credits: i64,
    subjects: Vec<Subject>,
}

impl Semester {
    /// Create a semester whose declared values are derived from `subjects`
    ///
    /// # Arguments
    /// * `number` - Position in the institutional sequence (1 for the first semester)
    /// * `subjects` - Subjects in enrollment order
    ///
    /// # Errors
    /// Returns [`Error::InvalidSemester`] when `number` is zero.
    pub fn new(number: u32, subjects: Vec<Subject>) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidSemester(
                "semester number must be positive".to_string(),
            ));
        }
        let declared_subject_count = subjects.len();
        let declared_total_credits = credit_sum(&subjects);
        Ok(Self {
            id: None,
            number,
            declared_subject_count,
            declared_total_credits,
            subjects,
        })
    }

    /// Copy with caller-supplied declared values, which may disagree with the subject list.
    #[must_use]
    pub fn with_declared(mut self, subject_count: usize, total_credits: i64) -> Self {
        self.declared_subject_count = subject_count;
        self.declared_total_credits = total_credits;
        self
    }

    /// Storage id, absent until persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// Institutional sequence position
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Seniority weight used by the overall index: the number capped at [`SENIORITY_CAP`].
    #[must_use]
    pub fn seniority(&self) -> u32 {
        self.number.min(SENIORITY_CAP)
    }

    /// Subject count as declared by the caller or the archive
    #[must_use]
    pub const fn declared_subject_count(&self) -> usize {
        self.declared_subject_count
    }

    /// Credit total as declared by the caller or the archive
    #[must_use]
    pub const fn declared_total_credits(&self) -> i64 {
        self.declared_total_credits
    }

    /// Subjects in enrollment order
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Actual number of subjects.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Actual credit total over the subject list.
    #[must_use]
    pub fn total_credits(&self) -> i64 {
        credit_sum(&self.subjects)
    }

    /// Look up a subject by storage id.
    #[must_use]
    pub fn find_subject(&self, subject_id: i64) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id() == Some(subject_id))
    }

    /// Copy with the storage id set; every subject's back-reference follows.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self.subjects = self
            .subjects
            .into_iter()
            .map(|s| s.with_semester_id(Some(id)))
            .collect();
        self
    }

    /// Copy with a different sequence position.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSemester`] when `number` is zero.
    pub fn with_number(mut self, number: u32) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidSemester(
                "semester number must be positive".to_string(),
            ));
        }
        self.number = number;
        Ok(self)
    }

    /// Copy with the subject list replaced and the declared values left as they were.
    #[must_use]
    pub fn with_subjects(mut self, subjects: Vec<Subject>) -> Self {
        let id = self.id;
        self.subjects = subjects
            .into_iter()
            .map(|s| s.with_semester_id(id))
            .collect();
        self
    }

    /// Copy with `subject` appended. The declared values move by the same amount.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.declared_subject_count = self.declared_subject_count.saturating_add(1);
        self.declared_total_credits = self
            .declared_total_credits
            .saturating_add(i64::from(subject.credits()));
        self.subjects.push(subject.with_semester_id(self.id));
        self
    }

    /// Copy with the subject carrying `subject.id()` replaced by `subject`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no subject in this semester has that id.
    pub fn with_replaced_subject(mut self, subject: Subject) -> Result<Self> {
        let subject_id = subject.id().ok_or_else(|| {
            Error::InvalidSubject("cannot replace a subject without an id".to_string())
        })?;
        let slot = self
            .subjects
            .iter_mut()
            .find(|s| s.id() == Some(subject_id))
            .ok_or(Error::NotFound {
                entity: "subject",
                id: subject_id,
            })?;
        self.declared_total_credits = self
            .declared_total_credits
            .saturating_add(i64::from(subject.credits()) - i64::from(slot.credits()));
        *slot = subject.with_semester_id(self.id);
        Ok(self)
    }

    /// Copy with the subject carrying `subject_id` removed.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no subject in this semester has that id.
    pub fn without_subject(mut self, subject_id: i64) -> Result<Self> {
        let pos = self
            .subjects
            .iter()
            .position(|s| s.id() == Some(subject_id))
            .ok_or(Error::NotFound {
                entity: "subject",
                id: subject_id,
            })?;
        let removed = self.subjects.remove(pos);
        self.declared_subject_count = self.declared_subject_count.saturating_sub(1);
        self.declared_total_credits = self
            .declared_total_credits
            .saturating_sub(i64::from(removed.credits()));
        Ok(self)
    }
}

/// Credit total widened so any list of `i32` credits sums without overflow.
fn credit_sum(subjects: &[Subject]) -> i64 {
    subjects.iter().map(|s| i64::from(s.credits())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(name: &str, credits: i32) -> Subject {
        Subject::new(name, credits, "MM", true).unwrap()
    }

    #[test]
    fn test_semester_creation_derives_declared_values() {
        let semester = Semester::new(1, vec![subject("Calculus", 6), subject("Physics", 4)]).unwrap();

        assert_eq!(semester.number(), 1);
        assert_eq!(semester.declared_subject_count(), 2);
        assert_eq!(semester.declared_total_credits(), 10);
        assert_eq!(semester.subject_count(), 2);
        assert_eq!(semester.total_credits(), 10);
        assert!(semester.id().is_none());
    }

    #[test]
    fn test_zero_number_rejected() {
        assert!(matches!(
            Semester::new(0, Vec::new()),
            Err(Error::InvalidSemester(_))
        ));
    }

    #[test]
    fn test_seniority_is_capped() {
        let third = Semester::new(3, Vec::new()).unwrap();
        let ninth = Semester::new(9, Vec::new()).unwrap();
        assert_eq!(third.seniority(), 3);
        assert_eq!(ninth.seniority(), SENIORITY_CAP);
    }

    #[test]
    fn test_with_id_propagates_back_reference() {
        let semester = Semester::new(2, vec![subject("Algebra", 4)])
            .unwrap()
            .with_id(11);

        assert_eq!(semester.id(), Some(11));
        assert_eq!(semester.subjects()[0].semester_id(), Some(11));

        let semester = semester.with_subject(subject("Logic", 2));
        assert_eq!(semester.subjects()[1].semester_id(), Some(11));
    }

    #[test]
    fn test_declared_values_follow_subject_edits() {
        let semester = Semester::new(1, vec![subject("A", 4).with_id(1)])
            .unwrap()
            .with_subject(subject("B", 2).with_id(2));
        assert_eq!(semester.declared_subject_count(), 2);
        assert_eq!(semester.declared_total_credits(), 6);

        let semester = semester
            .with_replaced_subject(subject("B", 6).with_id(2))
            .unwrap();
        assert_eq!(semester.declared_total_credits(), 10);

        let semester = semester.without_subject(1).unwrap();
        assert_eq!(semester.declared_subject_count(), 1);
        assert_eq!(semester.declared_total_credits(), 6);
        assert_eq!(semester.subjects()[0].name(), "B");
    }

    #[test]
    fn test_explicit_drift_is_preserved() {
        let semester = Semester::new(1, vec![subject("A", 4)])
            .unwrap()
            .with_declared(3, 20)
            .with_subject(subject("B", 2));

        assert_eq!(semester.declared_subject_count(), 4);
        assert_eq!(semester.declared_total_credits(), 22);
        assert_eq!(semester.subject_count(), 2);
        assert_eq!(semester.total_credits(), 6);
    }

    #[test]
    fn test_missing_subject_is_not_found() {
        let semester = Semester::new(1, vec![subject("A", 4).with_id(1)]).unwrap();
        assert!(matches!(
            semester.clone().without_subject(99),
            Err(Error::NotFound { entity: "subject", id: 99 })
        ));
        assert!(matches!(
            semester.with_replaced_subject(subject("X", 1).with_id(42)),
            Err(Error::NotFound { entity: "subject", id: 42 })
        ));
    }

    #[test]
    fn test_extreme_credits_do_not_overflow() {
        let semester = Semester::new(1, vec![subject("A", i32::MAX), subject("B", 1)]).unwrap();
        let expected = i64::from(i32::MAX) + 1;
        assert_eq!(semester.total_credits(), expected);
        assert_eq!(semester.declared_total_credits(), expected);

        let semester = semester
            .with_declared(2, i64::MAX)
            .with_subject(subject("C", i32::MAX));
        assert_eq!(semester.declared_total_credits(), i64::MAX);

        let semester = Semester::new(1, vec![subject("D", i32::MIN), subject("E", -1)]).unwrap();
        assert_eq!(semester.total_credits(), i64::from(i32::MIN) - 1);
    }

    #[test]
    fn test_find_subject() {
        let semester = Semester::new(1, vec![subject("A", 4).with_id(5)]).unwrap();
        assert_eq!(semester.find_subject(5).map(Subject::name), Some("A"));
        assert!(semester.find_subject(6).is_none());
    }
}
