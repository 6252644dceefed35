//! Report command handler
//!
//! Renders the whole semester history with its index summary, either to
//! stdout, to an explicit file, or into the configured reports directory.

use super::{fail, open_tracker};
use grade_index::config::Config;
use grade_index::report::{self, ReportContext, ReportFormat};
use logger::info;
use std::path::{Path, PathBuf};

/// Base name of reports written with `--save`
const REPORT_FILE_STEM: &str = "grade-report";

/// Run the report command.
///
/// # Arguments
/// * `format` - Output format
/// * `output` - Explicit output path; stdout when `None` and `save` is false
/// * `save` - Write into `paths.reports_dir` instead of stdout
/// * `config` - Loaded configuration
pub fn run(format: ReportFormat, output: Option<&Path>, save: bool, config: &Config) {
    let tracker = open_tracker(config);
    let ctx = ReportContext::new(tracker.semesters());
    let generator = report::reporter(format);

    let target: Option<PathBuf> = output.map(Path::to_path_buf).or_else(|| {
        save.then(|| {
            PathBuf::from(&config.paths.reports_dir)
                .join(format!("{REPORT_FILE_STEM}.{}", format.extension()))
        })
    });

    match target {
        Some(path) => {
            if let Err(e) = generator.generate(&ctx, &path) {
                fail("Failed to write report", &e);
            }
            info!("{format} report written to {}", path.display());
            println!("✓ Report generated: {}", path.display());
        }
        None => print!("{}", generator.render(&ctx)),
    }
}
