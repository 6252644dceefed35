//! Index command handler

use super::{fail, open_tracker};
use grade_index::config::Config;
use logger::{info, verbose};

/// Compute and print both indices with four decimals
pub fn run(config: &Config) {
    let tracker = open_tracker(config);
    verbose!("Computing indices over {} semesters", tracker.semesters().len());

    match tracker.compute_indices() {
        Ok(indices) => {
            info!(
                "Indices computed: overall={:.4} elective={:.4}",
                indices.overall, indices.elective
            );
            println!("Overall index:  {:.4}", indices.overall);
            println!("Elective index: {:.4}", indices.elective);
        }
        Err(e) => fail("Cannot compute indices", &e),
    }
}
