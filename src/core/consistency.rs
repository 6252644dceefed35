//! Declared-versus-actual consistency checks for semesters
//!
//! A semester stores a declared subject count and credit total next to its
//! subject list. Nothing forces the two to agree, so this module inspects
//! them and can produce a corrected copy. Subject-level problems that keep a
//! subject out of the indices (non-positive credits, unknown grade labels) are
//! reported as well.

use crate::core::grade;
use crate::core::models::Semester;
use serde::Serialize;
use std::fmt;

/// One problem found in a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Discrepancy {
    /// `declared_subject_count` differs from the length of the subject list.
    SubjectCountMismatch {
        /// Declared value
        declared: usize,
        /// Actual value
        actual: usize,
    },
    /// `declared_total_credits` differs from the sum of subject credits.
    TotalCreditsMismatch {
        /// Declared value
        declared: i64,
        /// Actual value
        actual: i64,
    },
    /// A subject has zero or negative credits.
    NonPositiveCredits {
        /// Subject name
        subject: String,
        /// Recorded credits
        credits: i32,
    },
    /// A subject carries a grade label outside the vocabulary.
    UnrecognizedGrade {
        /// Subject name
        subject: String,
        /// Recorded label
        label: String,
    },
}

impl Discrepancy {
    /// Whether the discrepancy concerns the declared summary values
    /// (and can therefore be fixed by [`reconcile`]).
    #[must_use]
    pub const fn is_summary_drift(&self) -> bool {
        matches!(
            self,
            Self::SubjectCountMismatch { .. } | Self::TotalCreditsMismatch { .. }
        )
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubjectCountMismatch { declared, actual } => {
                write!(f, "declared {declared} subjects, found {actual}")
            }
            Self::TotalCreditsMismatch { declared, actual } => {
                write!(f, "declared {declared} credits, found {actual}")
            }
            Self::NonPositiveCredits { subject, credits } => {
                write!(f, "subject '{subject}' has non-positive credits ({credits})")
            }
            Self::UnrecognizedGrade { subject, label } => {
                write!(f, "subject '{subject}' has unrecognized grade '{label}'")
            }
        }
    }
}

/// Outcome of [`check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Number of the inspected semester
    pub semester: u32,
    /// Problems found, summary drift first
    pub discrepancies: Vec<Discrepancy>,
}

impl ValidationResult {
    /// True when nothing was found.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }

    /// True when the declared summary values disagree with the subject list.
    #[must_use]
    pub fn has_summary_drift(&self) -> bool {
        self.discrepancies.iter().any(Discrepancy::is_summary_drift)
    }
}

/// Inspect a semester. Pure, never mutates.
#[must_use]
pub fn check(semester: &Semester) -> ValidationResult {
    let mut discrepancies = Vec::new();

    let actual_count = semester.subject_count();
    if semester.declared_subject_count() != actual_count {
        discrepancies.push(Discrepancy::SubjectCountMismatch {
            declared: semester.declared_subject_count(),
            actual: actual_count,
        });
    }

    let actual_credits = semester.total_credits();
    if semester.declared_total_credits() != actual_credits {
        discrepancies.push(Discrepancy::TotalCreditsMismatch {
            declared: semester.declared_total_credits(),
            actual: actual_credits,
        });
    }

    for subject in semester.subjects().iter().filter(|s| !s.is_eligible()) {
        if subject.credits() <= 0 {
            discrepancies.push(Discrepancy::NonPositiveCredits {
                subject: subject.name().to_string(),
                credits: subject.credits(),
            });
        }
        if !grade::is_recognized(subject.grade()) {
            discrepancies.push(Discrepancy::UnrecognizedGrade {
                subject: subject.name().to_string(),
                label: subject.grade().to_string(),
            });
        }
    }

    ValidationResult {
        semester: semester.number(),
        discrepancies,
    }
}

/// Corrected copy of `semester` with the declared values recomputed from the subject list.
#[must_use]
pub fn reconcile(semester: &Semester) -> Semester {
    semester
        .clone()
        .with_declared(semester.subject_count(), semester.total_credits())
}
