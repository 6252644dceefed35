//! Report generation module for semester histories
//!
//! Renders the semester tables, consistency findings and the index summary as
//! plain text (the console layout) or Markdown.

pub mod formats;

use crate::core::consistency::{self, ValidationResult};
use crate::core::error::{Error, Result};
use crate::core::index::{self, AcademicIndices, SemesterBreakdown};
use crate::core::models::Semester;
use std::fs;
use std::path::Path;

pub use formats::{MarkdownReporter, ReportFormat, TextReporter};

/// Data context for report generation
///
/// Everything a renderer needs, computed once. Index failures are kept as
/// messages so a report can still be produced for an incomplete history.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Semesters in storage order
    pub semesters: &'a [Semester],
    /// Both indices, or the reason they could not be computed
    pub indices: std::result::Result<AcademicIndices, String>,
    /// Per-semester figures in `semesters` order; empty when a subject cannot be weighted
    pub breakdown: Vec<SemesterBreakdown>,
    /// Validation result per semester, same order as `semesters`
    pub validations: Vec<ValidationResult>,
}

impl<'a> ReportContext<'a> {
    /// Build a context over a semester history
    #[must_use]
    pub fn new(semesters: &'a [Semester]) -> Self {
        Self {
            semesters,
            indices: index::compute_indices(semesters).map_err(|e| e.to_string()),
            breakdown: index::semester_breakdown(semesters).unwrap_or_default(),
            validations: semesters.iter().map(consistency::check).collect(),
        }
    }

    /// Total subjects across the history
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.semesters.iter().map(Semester::subject_count).sum()
    }

    /// Total credits across the history
    #[must_use]
    pub fn total_credits(&self) -> i64 {
        self.semesters.iter().map(Semester::total_credits).sum()
    }

    /// Number of semesters with at least one discrepancy
    #[must_use]
    pub fn inconsistent_count(&self) -> usize {
        self.validations
            .iter()
            .filter(|v| !v.is_consistent())
            .count()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the report content as a string
    fn render(&self, ctx: &ReportContext) -> String;

    /// Render the report and write it to a file
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be written
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(output_path, self.render(ctx)).map_err(|source| Error::Io {
            path: output_path.to_path_buf(),
            source,
        })
    }
}

/// English ordinal of a semester number ("1st", "2nd", "11th")
#[must_use]
pub fn ordinal(number: u32) -> String {
    let suffix = match (number % 10, number % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{number}{suffix}")
}

/// Header line of a semester section
#[must_use]
pub fn semester_heading(semester: &Semester) -> String {
    let plural = if semester.subject_count() == 1 { "" } else { "s" };
    format!(
        "{} semester - {} subject{plural} ({} credits)",
        ordinal(semester.number()),
        semester.subject_count(),
        semester.total_credits()
    )
}

/// Generator for a format
#[must_use]
pub fn reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Text => Box::new(TextReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
    }
}
