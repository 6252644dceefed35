//! Semester command handlers

use super::{fail, open_tracker};
use crate::args::{parse_grade, parse_kind, SemesterSubcommand, SubjectSpec};
use grade_index::config::Config;
use grade_index::consistency::ValidationResult;
use grade_index::models::{Semester, Subject};
use grade_index::report::{semester_heading, TextReporter};
use grade_index::{grade_labels, validate_semester, Error};
use logger::{info, warn};
use std::io::{self, BufRead, Write};

/// Dispatch semester subcommands
pub fn run(subcommand: SemesterSubcommand, config: &Config) {
    match subcommand {
        SemesterSubcommand::List => handle_list(config),
        SemesterSubcommand::Add {
            number,
            subjects,
            declared_count,
            declared_credits,
        } => handle_add(config, number, subjects, declared_count, declared_credits),
        SemesterSubcommand::Delete { id } => handle_delete(config, id),
        SemesterSubcommand::Check { id } => handle_check(config, id),
        SemesterSubcommand::Reconcile { id } => handle_reconcile(config, id),
    }
}

fn handle_list(config: &Config) {
    let tracker = open_tracker(config);
    if tracker.semesters().is_empty() {
        println!("No semesters recorded.");
        return;
    }
    for semester in tracker.semesters() {
        println!(
            "[{}] {}",
            semester.id().unwrap_or_default(),
            semester_heading(semester)
        );
        for subject in semester.subjects() {
            println!(
                "  #{} {}",
                subject.id().unwrap_or_default(),
                subject.name()
            );
        }
        print!("{}", TextReporter::semester_table(semester));
        println!();
    }
}

fn build_subject(spec: SubjectSpec) -> Result<Subject, Error> {
    Ok(Subject::new(spec.name, spec.credits, spec.grade, spec.mandatory)?.with_code(spec.code))
}

fn handle_add(
    config: &Config,
    number: u32,
    specs: Vec<SubjectSpec>,
    declared_count: Option<usize>,
    declared_credits: Option<i64>,
) {
    let specs = if specs.is_empty() {
        let stdin = io::stdin();
        match prompt_subjects(&mut stdin.lock(), &mut io::stdout()) {
            Ok(specs) => specs,
            Err(e) => {
                eprintln!("✗ Failed to read subjects: {e}");
                std::process::exit(1);
            }
        }
    } else {
        specs
    };

    let semester = specs
        .into_iter()
        .map(build_subject)
        .collect::<Result<Vec<_>, _>>()
        .and_then(|subjects| Semester::new(number, subjects))
        .unwrap_or_else(|e| fail("Invalid semester", &e));
    let count = declared_count.unwrap_or_else(|| semester.subject_count());
    let credits = declared_credits.unwrap_or_else(|| semester.total_credits());
    let semester = semester.with_declared(count, credits);

    let mut tracker = open_tracker(config);
    match tracker.save_semester(semester) {
        Ok(saved) => {
            info!("Semester {} saved", saved.number());
            println!(
                "✓ Saved semester {} with id {}",
                saved.number(),
                saved.id().unwrap_or_default()
            );
            report_findings(&validate_semester(&saved));
        }
        Err(e) => fail("Failed to save semester", &e),
    }
}

fn handle_delete(config: &Config, id: i64) {
    let mut tracker = open_tracker(config);
    if let Err(e) = tracker.delete_semester(id) {
        fail("Failed to delete semester", &e);
    }
    println!("✓ Deleted semester {id}");
}

fn handle_check(config: &Config, id: Option<i64>) {
    let tracker = open_tracker(config);
    let results: Vec<ValidationResult> = match id {
        Some(id) => match tracker.semester(id) {
            Ok(semester) => vec![validate_semester(semester)],
            Err(e) => fail("Cannot check semester", &e),
        },
        None => tracker.validate_all(),
    };

    if results.is_empty() {
        println!("No semesters recorded.");
        return;
    }
    for result in &results {
        if result.is_consistent() {
            println!("✓ Semester {} is consistent", result.semester);
        } else {
            report_findings(result);
        }
    }
}

fn handle_reconcile(config: &Config, id: i64) {
    let mut tracker = open_tracker(config);
    match tracker.reconcile_semester(id) {
        Ok(fixed) => println!(
            "✓ Semester {} now declares {} subjects and {} credits",
            fixed.number(),
            fixed.declared_subject_count(),
            fixed.declared_total_credits()
        ),
        Err(e) => fail("Failed to reconcile semester", &e),
    }
}

fn report_findings(result: &ValidationResult) {
    for discrepancy in &result.discrepancies {
        warn!("Semester {}: {discrepancy}", result.semester);
        eprintln!("✗ Semester {}: {discrepancy}", result.semester);
    }
}

/// Ask for one value until `parse` accepts it. `None` on end of input.
fn ask<R, W, T>(
    input: &mut R,
    output: &mut W,
    question: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> io::Result<Option<T>>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{question}")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match parse(line.trim()) {
            Ok(value) => return Ok(Some(value)),
            Err(msg) => writeln!(output, "  {msg}")?,
        }
    }
}

/// Read subjects interactively until a blank name or end of input.
pub fn prompt_subjects<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Vec<SubjectSpec>> {
    let labels = grade_labels().join("/");
    let mut specs = Vec::new();

    loop {
        let Some(name) = ask(input, output, "Subject name (blank to finish): ", |s| {
            Ok(s.to_string())
        })?
        else {
            break;
        };
        if name.is_empty() {
            break;
        }
        let Some(credits) = ask(input, output, "Credits: ", |s| {
            s.parse::<i32>().map_err(|_| format!("invalid credits '{s}'"))
        })?
        else {
            break;
        };
        let Some(grade) = ask(input, output, &format!("Grade ({labels}): "), parse_grade)? else {
            break;
        };
        let Some(mandatory) = ask(input, output, "Mandatory or elective? (m/e): ", parse_kind)?
        else {
            break;
        };
        let Some(code) = ask(input, output, "Code (optional): ", |s| Ok(s.to_string()))? else {
            break;
        };

        specs.push(SubjectSpec {
            name,
            credits,
            grade,
            mandatory,
            code: (!code.is_empty()).then_some(code),
        });
    }

    Ok(specs)
}
