//! Subject model

use crate::core::error::{Error, Result};
use crate::core::grade::{self, Grade};

/// One course taken in a semester.
///
/// Values are immutable: every `with_*` method returns a modified copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: Option<i64>,
    code: Option<String>,
    name: String,
    credits: i32,
    grade: String,
    mandatory: bool,
    semester_id: Option<i64>,
}

impl Subject {
    /// Create a new, not yet persisted subject
    ///
    /// # Arguments
    /// * `name` - Subject name (must not be blank)
    /// * `credits` - Credit hours; non-positive values are accepted and flagged by validation
    /// * `grade` - Grade label; labels outside the vocabulary are accepted and flagged by validation
    /// * `mandatory` - `true` for mandatory subjects, `false` for electives
    ///
    /// # Errors
    /// Returns [`Error::InvalidSubject`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        credits: i32,
        grade: impl Into<String>,
        mandatory: bool,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidSubject("name must not be empty".to_string()));
        }
        Ok(Self {
            id: None,
            code: None,
            name,
            credits,
            grade: grade.into().trim().to_string(),
            mandatory,
            semester_id: None,
        })
    }

    /// Storage id, absent until persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// Institutional subject code, if known.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Subject name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Credit hours
    #[must_use]
    pub const fn credits(&self) -> i32 {
        self.credits
    }

    /// Grade label as recorded
    #[must_use]
    pub fn grade(&self) -> &str {
        &self.grade
    }

    /// Whether the subject is mandatory (as opposed to elective)
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Id of the owning semester, for lookups only.
    #[must_use]
    pub const fn semester_id(&self) -> Option<i64> {
        self.semester_id
    }

    /// Parsed grade.
    ///
    /// # Errors
    /// Returns [`Error::UnrecognizedGrade`] for labels outside the vocabulary.
    pub fn parsed_grade(&self) -> Result<Grade> {
        self.grade.parse()
    }

    /// Numeric weight of the recorded grade.
    ///
    /// # Errors
    /// Returns [`Error::UnrecognizedGrade`] for labels outside the vocabulary.
    pub fn grade_weight(&self) -> Result<u8> {
        grade::weight_of(&self.grade)
    }

    /// Whether this subject satisfies the requirements for index computation.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.credits > 0 && grade::is_recognized(&self.grade)
    }

    /// Copy with the storage id set.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy with the storage id cleared.
    #[must_use]
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Copy with the code replaced; blank codes become absent.
    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self
    }

    /// Copy with a different name.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSubject`] when the name is blank.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidSubject("name must not be empty".to_string()));
        }
        self.name = name;
        Ok(self)
    }

    /// Copy with different credit hours.
    #[must_use]
    pub const fn with_credits(mut self, credits: i32) -> Self {
        self.credits = credits;
        self
    }

    /// Copy with a different grade label.
    #[must_use]
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into().trim().to_string();
        self
    }

    /// Copy with the mandatory flag changed.
    #[must_use]
    pub const fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Copy with the owning semester back-reference changed.
    #[must_use]
    pub const fn with_semester_id(mut self, semester_id: Option<i64>) -> Self {
        self.semester_id = semester_id;
        self
    }
}
