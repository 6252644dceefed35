//! Academic performance indices
//!
//! Two weighted averages of grade weights are computed over a semester history:
//!
//! - the **overall index** weights every subject by its credit load and by the
//!   seniority of its semester (semester number capped at
//!   [`SENIORITY_CAP`](crate::core::models::SENIORITY_CAP)),
//! - the **elective index** averages elective subjects only
//!   (`mandatory == false`), weighted by credit load alone.
//!
//! Credit load is expressed as a fraction of a reference 15-credit course load.
//! Both functions are pure and independent of input order up to float rounding.

use crate::core::error::{Error, Result};
use crate::core::models::{Semester, Subject};
use logger::debug;
use serde::Serialize;

/// Reference course load used to normalize credit hours.
pub const REFERENCE_CREDIT_LOAD: f64 = 15.0;

/// Both indices, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcademicIndices {
    /// Credit- and seniority-weighted average over all subjects
    pub overall: f64,
    /// Credit-weighted average over elective subjects
    pub elective: f64,
}

/// Per-semester figures used when displaying a history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterBreakdown {
    /// Semester number
    pub number: u32,
    /// Seniority weight applied by the overall index
    pub seniority: u32,
    /// Actual number of subjects
    pub subject_count: usize,
    /// Actual credit total
    pub total_credits: i64,
    /// Credit-weighted average of the semester alone; `None` without weight
    pub average: Option<f64>,
}

/// Running weighted sum.
#[derive(Debug, Default, Clone, Copy)]
struct WeightedSum {
    numerator: f64,
    denominator: f64,
}

impl WeightedSum {
    fn add(&mut self, grade_weight: u8, weight: f64) {
        self.numerator += f64::from(grade_weight) * weight;
        self.denominator += weight;
    }

    fn average(self) -> Option<f64> {
        (self.denominator > 0.0).then(|| self.numerator / self.denominator)
    }
}

/// Credit weight of a subject, rejecting negative credits.
fn credit_weight(subject: &Subject) -> Result<f64> {
    if subject.credits() < 0 {
        return Err(Error::InvalidCredits {
            subject: subject.name().to_string(),
            credits: subject.credits(),
        });
    }
    Ok(f64::from(subject.credits()) / REFERENCE_CREDIT_LOAD)
}

/// Compute the overall index.
///
/// Each subject contributes `weight_of(grade) * credits / 15 * min(number, 6)`;
/// the result is the sum of contributions divided by the sum of
/// `credits / 15 * min(number, 6)`.
///
/// # Errors
///
/// - [`Error::UnrecognizedGrade`] if any subject has a grade outside the vocabulary
/// - [`Error::InvalidCredits`] if any subject has negative credits
/// - [`Error::NoData`] if there are no subjects or the total weight is zero
pub fn overall_index(semesters: &[Semester]) -> Result<f64> {
    let mut sum = WeightedSum::default();

    for semester in semesters {
        let seniority = f64::from(semester.seniority());
        for subject in semester.subjects() {
            let grade_weight = subject.grade_weight()?;
            sum.add(grade_weight, credit_weight(subject)? * seniority);
        }
    }

    debug!(
        "overall index: numerator={:.6} denominator={:.6}",
        sum.numerator, sum.denominator
    );
    sum.average().ok_or(Error::NoData { index: "overall" })
}

/// Compute the elective index.
///
/// Only subjects with `mandatory == false` are considered, and no seniority
/// weighting is applied: the result is
/// `sum(credits / 15 * weight_of(grade)) / sum(credits / 15)`.
///
/// # Errors
///
/// - [`Error::UnrecognizedGrade`] if an elective subject has a grade outside the vocabulary
/// - [`Error::InvalidCredits`] if an elective subject has negative credits
/// - [`Error::NoData`] if there are no elective subjects or their total weight is zero
pub fn elective_index(semesters: &[Semester]) -> Result<f64> {
    let mut sum = WeightedSum::default();

    for subject in semesters
        .iter()
        .flat_map(Semester::subjects)
        .filter(|s| !s.is_mandatory())
    {
        let grade_weight = subject.grade_weight()?;
        sum.add(grade_weight, credit_weight(subject)?);
    }

    debug!(
        "elective index: numerator={:.6} denominator={:.6}",
        sum.numerator, sum.denominator
    );
    sum.average().ok_or(Error::NoData { index: "elective" })
}

/// Compute both indices. Fails as a whole if either one fails.
///
/// # Errors
///
/// Propagates the first error from [`overall_index`] or [`elective_index`].
pub fn compute_indices(semesters: &[Semester]) -> Result<AcademicIndices> {
    let overall = overall_index(semesters)?;
    let elective = elective_index(semesters)?;
    Ok(AcademicIndices { overall, elective })
}

/// Per-semester summary for display.
///
/// # Errors
///
/// Returns [`Error::UnrecognizedGrade`] or [`Error::InvalidCredits`] for the
/// first subject that cannot be weighted.
pub fn semester_breakdown(semesters: &[Semester]) -> Result<Vec<SemesterBreakdown>> {
    semesters
        .iter()
        .map(|semester| {
            let mut sum = WeightedSum::default();
            for subject in semester.subjects() {
                sum.add(subject.grade_weight()?, credit_weight(subject)?);
            }
            Ok(SemesterBreakdown {
                number: semester.number(),
                seniority: semester.seniority(),
                subject_count: semester.subject_count(),
                total_credits: semester.total_credits(),
                average: sum.average(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(credits: i32, grade: &str, mandatory: bool) -> Subject {
        Subject::new("Subject", credits, grade, mandatory).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weighted_sum_without_weight_is_none() {
        assert!(WeightedSum::default().average().is_none());
    }

    #[test]
    fn test_overall_index_uses_seniority() {
        // Semester 1: SS with 4 credits; semester 2: II with 4 credits.
        let history = vec![
            Semester::new(1, vec![subject(4, "SS", true)]).unwrap(),
            Semester::new(2, vec![subject(4, "II", true)]).unwrap(),
        ];
        // (5*1 + 1*2) / (1 + 2)
        assert!(close(overall_index(&history).unwrap(), 7.0 / 3.0));
    }

    #[test]
    fn test_negative_credits_rejected() {
        let history = vec![Semester::new(1, vec![subject(-4, "SS", false)]).unwrap()];
        assert!(matches!(
            overall_index(&history),
            Err(Error::InvalidCredits { credits: -4, .. })
        ));
        assert!(matches!(
            elective_index(&history),
            Err(Error::InvalidCredits { credits: -4, .. })
        ));
    }

    #[test]
    fn test_zero_credit_only_history_is_no_data() {
        let history = vec![Semester::new(1, vec![subject(0, "SS", false)]).unwrap()];
        assert!(matches!(
            overall_index(&history),
            Err(Error::NoData { index: "overall" })
        ));
        assert!(matches!(
            elective_index(&history),
            Err(Error::NoData { index: "elective" })
        ));
    }

    #[test]
    fn test_elective_index_skips_unknown_grade_on_mandatory() {
        let history = vec![Semester::new(
            1,
            vec![subject(4, "??", true), subject(2, "MS", false)],
        )
        .unwrap()];
        assert!(close(elective_index(&history).unwrap(), 4.0));
        assert!(matches!(
            overall_index(&history),
            Err(Error::UnrecognizedGrade(_))
        ));
    }

    #[test]
    fn test_compute_indices_has_no_partial_results() {
        let history = vec![Semester::new(1, vec![subject(4, "SS", true)]).unwrap()];
        assert!(matches!(
            compute_indices(&history),
            Err(Error::NoData { index: "elective" })
        ));
    }

    #[test]
    fn test_breakdown_per_semester() {
        let history = vec![
            Semester::new(1, vec![subject(4, "SS", true), subject(2, "MI", false)]).unwrap(),
            Semester::new(8, Vec::new()).unwrap(),
        ];
        let rows = semester_breakdown(&history).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_credits, 6);
        assert!(close(rows[0].average.unwrap(), 24.0 / 6.0));
        assert_eq!(rows[1].seniority, 6);
        assert!(rows[1].average.is_none());
    }
}
