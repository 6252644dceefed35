//! Grade scale: categorical grade labels and their numeric weights

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every recognized grade label, from highest to lowest weight.
pub const GRADE_LABELS: [&str; 6] = ["SS", "MS", "MM", "MI", "II", "SR"];

/// A recognized grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Superior (5)
    SS,
    /// Medium-superior (4)
    MS,
    /// Medium (3)
    MM,
    /// Medium-inferior (2)
    MI,
    /// Inferior (1)
    II,
    /// No performance (0)
    SR,
}

impl Grade {
    /// All grades, from highest to lowest weight.
    pub const ALL: [Self; 6] = [Self::SS, Self::MS, Self::MM, Self::MI, Self::II, Self::SR];

    /// Numeric weight of the grade, in `0..=5`.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::SS => 5,
            Self::MS => 4,
            Self::MM => 3,
            Self::MI => 2,
            Self::II => 1,
            Self::SR => 0,
        }
    }

    /// The label as stored and displayed.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SS => "SS",
            Self::MS => "MS",
            Self::MM => "MM",
            Self::MI => "MI",
            Self::II => "II",
            Self::SR => "SR",
        }
    }
}

impl FromStr for Grade {
    type Err = Error;

    /// Labels are case-sensitive: `ss` is not a grade.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SS" => Ok(Self::SS),
            "MS" => Ok(Self::MS),
            "MM" => Ok(Self::MM),
            "MI" => Ok(Self::MI),
            "II" => Ok(Self::II),
            "SR" => Ok(Self::SR),
            other => Err(Error::UnrecognizedGrade(other.to_string())),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weight of a grade label.
///
/// # Errors
///
/// Returns [`Error::UnrecognizedGrade`] when `label` is not in [`GRADE_LABELS`].
pub fn weight_of(label: &str) -> Result<u8> {
    label.parse::<Grade>().map(Grade::weight)
}

/// Whether `label` belongs to the grade vocabulary.
#[must_use]
pub fn is_recognized(label: &str) -> bool {
    GRADE_LABELS.contains(&label)
}
