//! Data models for `grade-index`

pub mod semester;
pub mod subject;

pub use semester::{Semester, SENIORITY_CAP};
pub use subject::Subject;
