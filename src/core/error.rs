//! Error types shared by the grade-index core

use crate::core::consistency::Discrepancy;
use std::path::PathBuf;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the grade scale, the index calculator, the
/// consistency policy and the semester archive.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Grade label outside the fixed vocabulary.
    #[error("unrecognized grade '{0}' (expected one of SS, MS, MM, MI, II, SR)")]
    UnrecognizedGrade(String),

    /// No subject carries any weight for the requested index.
    #[error("insufficient data to compute the {index} index")]
    NoData {
        /// Which index could not be computed (`overall` or `elective`).
        index: &'static str,
    },

    /// A subject with negative credits reached the calculator.
    #[error("subject '{subject}' has negative credits ({credits})")]
    InvalidCredits {
        /// Subject name.
        subject: String,
        /// Offending credit value.
        credits: i32,
    },

    /// Declared counters diverge from the subject list (strict mode only).
    #[error("semester {semester} is inconsistent: {}", join_discrepancies(.discrepancies))]
    ConsistencyMismatch {
        /// Semester number.
        semester: u32,
        /// Everything the validator reported.
        discrepancies: Vec<Discrepancy>,
    },

    /// No stored record with this id.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind (`semester` or `subject`).
        entity: &'static str,
        /// Requested id.
        id: i64,
    },

    /// Subject constructor validation failed.
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    /// Semester constructor validation failed.
    #[error("invalid semester: {0}")]
    InvalidSemester(String),

    /// Archive file could not be read or written.
    #[error("archive I/O error on {path}: {source}")]
    Io {
        /// Archive path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Archive file is not valid TOML for the archive schema.
    #[error("failed to parse archive: {0}")]
    ArchiveParse(#[from] toml::de::Error),

    /// Archive could not be serialized.
    #[error("failed to serialize archive: {0}")]
    ArchiveWrite(#[from] toml::ser::Error),
}

impl Error {
    /// Whether the error means "nothing to compute yet" rather than bad data.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

fn join_discrepancies(discrepancies: &[Discrepancy]) -> String {
    discrepancies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_lists_every_discrepancy() {
        let err = Error::ConsistencyMismatch {
            semester: 2,
            discrepancies: vec![
                Discrepancy::SubjectCountMismatch {
                    declared: 2,
                    actual: 3,
                },
                Discrepancy::TotalCreditsMismatch {
                    declared: 10,
                    actual: 12,
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("semester 2 is inconsistent"));
        assert!(msg.contains("declared 2 subjects, found 3"));
        assert!(msg.contains("declared 10 credits, found 12"));
    }

    #[test]
    fn test_no_data_flag() {
        assert!(Error::NoData { index: "overall" }.is_no_data());
        assert!(!Error::UnrecognizedGrade("A".to_string()).is_no_data());
    }
}
