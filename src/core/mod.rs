//! Core module: domain model, index computation, storage and reporting

pub mod config;
pub mod consistency;
pub mod error;
pub mod grade;
pub mod index;
pub mod models;
pub mod report;
pub mod store;
pub mod tracker;

/// Returns the current version of the `GradeIndex` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
