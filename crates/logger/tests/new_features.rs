//! Tests for the verbose printer and file logging.

use logger::{enable_verbose, error, info, set_level, verbose, warn, Level};

#[cfg(feature = "verbose")]
#[test]
fn verbose_respects_runtime_flag() {
    verbose!("This should not appear");

    enable_verbose();
    assert!(logger::is_verbose_enabled());
    verbose!("This should appear: verbose test {}", 42);
    logger::disable_verbose();
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_captures_tagged_messages() {
    use logger::{close_file_logging, init_file_logging};
    use std::fs;

    let log_path = std::env::temp_dir().join(format!("gradeindex_logger_{}.log", std::process::id()));
    let _ = fs::remove_file(&log_path);

    set_level(Level::Info);
    assert!(init_file_logging(&log_path));

    info!("Test info message");
    warn!("Test warning message");
    error!("Test error message");

    #[cfg(feature = "verbose")]
    {
        enable_verbose();
        verbose!("This verbose message should NOT be in the file");
    }

    close_file_logging();

    let contents = fs::read_to_string(&log_path).expect("Failed to read log file");
    assert!(contents.contains("[INFO] Test info message"));
    assert!(contents.contains("[WARN] Test warning message"));
    assert!(contents.contains("[ERROR] Test error message"));
    assert!(!contents.contains("verbose message"));

    let _ = fs::remove_file(&log_path);
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_fails_for_missing_directory() {
    let path = std::path::Path::new("/nonexistent-dir-for-gradeindex/log.txt");
    assert!(!logger::init_file_logging(path));
}
