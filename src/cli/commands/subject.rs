//! Subject command handlers

use super::{fail, open_tracker};
use crate::args::SubjectSubcommand;
use grade_index::config::Config;
use grade_index::models::Subject;
use grade_index::store::{SemesterStore, TomlStore};
use grade_index::{Error, Tracker};

/// Dispatch subject subcommands
pub fn run(subcommand: SubjectSubcommand, config: &Config) {
    match subcommand {
        SubjectSubcommand::Add {
            semester,
            name,
            credits,
            grade,
            elective,
            code,
        } => {
            let subject = Subject::new(name, credits, grade, !elective)
                .map(|s| s.with_code(code).with_semester_id(Some(semester)))
                .unwrap_or_else(|e| fail("Invalid subject", &e));
            save(&mut open_tracker(config), subject, "Added");
        }
        SubjectSubcommand::Update {
            id,
            name,
            credits,
            grade,
            mandatory,
            code,
            semester,
        } => {
            let mut tracker = open_tracker(config);
            let stored = tracker
                .store()
                .get_subject(id)
                .unwrap_or_else(|e| fail("Cannot update subject", &e));
            let updated = apply_changes(
                stored,
                Changes {
                    name,
                    credits,
                    grade,
                    mandatory,
                    code,
                    semester,
                },
            )
            .unwrap_or_else(|e| fail("Invalid subject", &e));
            save(&mut tracker, updated, "Updated");
        }
        SubjectSubcommand::Delete { id } => {
            let mut tracker = open_tracker(config);
            if let Err(e) = tracker.delete_subject(id) {
                fail("Failed to delete subject", &e);
            }
            println!("✓ Deleted subject {id}");
        }
    }
}

/// Field edits requested by `subject update`
#[derive(Debug, Default)]
struct Changes {
    name: Option<String>,
    credits: Option<i32>,
    grade: Option<String>,
    mandatory: Option<bool>,
    code: Option<String>,
    semester: Option<i64>,
}

fn apply_changes(subject: Subject, changes: Changes) -> Result<Subject, Error> {
    let mut subject = match changes.name {
        Some(name) => subject.with_name(name)?,
        None => subject,
    };
    if let Some(credits) = changes.credits {
        subject = subject.with_credits(credits);
    }
    if let Some(grade) = changes.grade {
        subject = subject.with_grade(grade);
    }
    if let Some(mandatory) = changes.mandatory {
        subject = subject.with_mandatory(mandatory);
    }
    if let Some(code) = changes.code {
        subject = subject.with_code(Some(code));
    }
    if let Some(semester) = changes.semester {
        subject = subject.with_semester_id(Some(semester));
    }
    Ok(subject)
}

fn save(tracker: &mut Tracker<TomlStore>, subject: Subject, verb: &str) {
    match tracker.save_subject(subject) {
        Ok(saved) => println!(
            "✓ {verb} subject {} '{}' in semester {}",
            saved.id().unwrap_or_default(),
            saved.name(),
            saved.semester_id().unwrap_or_default()
        ),
        Err(e) => fail("Failed to save subject", &e),
    }
}
