//! Shared library for `GradeIndex`
//!
//! Records semesters and the subjects taken in them, checks each semester's
//! declared summary against its subject list, and computes the overall and
//! elective performance indices.

pub mod core;

pub use crate::core::error::{Error, Result};
pub use crate::core::get_version;
pub use crate::core::index::{compute_indices, AcademicIndices};
pub use crate::core::tracker::{grade_labels, validate_semester, Tracker, ValidationPolicy};
pub use crate::core::{config, consistency, error, grade, index, models, report, store, tracker};
