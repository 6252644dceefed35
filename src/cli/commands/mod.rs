//! CLI command handlers for `GradeIndex`.
//!
//! Each command is implemented in its own submodule. Handlers print `✓` lines
//! on success and exit with status 1 after printing a `✗` line on failure.

pub mod config;
pub mod grades;
pub mod index;
pub mod report;
pub mod semester;
pub mod subject;

use grade_index::config::Config;
use grade_index::store::TomlStore;
use grade_index::{Error, Tracker, ValidationPolicy};
use logger::{debug, error};

/// Print a failure, log it, and exit.
pub fn fail(context: &str, err: &Error) -> ! {
    error!("{context}: {err}");
    eprintln!("✗ {context}: {err}");
    std::process::exit(1);
}

/// Open the configured archive and load it into a tracker.
pub fn open_tracker(config: &Config) -> Tracker<TomlStore> {
    let path = config.archive_path();
    debug!("Using archive {}", path.display());
    let policy = ValidationPolicy::from_config(&config.validation);
    TomlStore::open(path)
        .and_then(|store| Tracker::open(store, policy))
        .unwrap_or_else(|e| fail("Failed to open archive", &e))
}
