//! Plain text report generator
//!
//! One boxed table per semester with centered cells, followed by any
//! discrepancies and the index summary. This is also what the CLI prints.

use crate::core::models::{Semester, Subject};
use crate::core::report::{semester_heading, ReportContext, ReportGenerator};
use std::fmt::Write;

const HEADERS: [&str; 5] = ["Name", "Code", "Credits", "Grade", "Type"];

/// Plain text report generator
pub struct TextReporter;

impl TextReporter {
    /// Create a new text reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn cells(subject: &Subject) -> [String; 5] {
        [
            subject.name().to_string(),
            subject.code().unwrap_or("-").to_string(),
            subject.credits().to_string(),
            subject.grade().to_string(),
            if subject.is_mandatory() {
                "Mandatory".to_string()
            } else {
                "Elective".to_string()
            },
        ]
    }

    fn widths(rows: &[[String; 5]]) -> [usize; 5] {
        let mut widths = HEADERS.map(str::len);
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths.map(|w| w + 2)
    }

    fn separator(widths: &[usize; 5]) -> String {
        let mut line = String::from("+");
        for width in widths {
            line.push_str(&"-".repeat(*width));
            line.push('+');
        }
        line
    }

    fn row<S: AsRef<str>>(widths: &[usize; 5], cells: &[S]) -> String {
        let mut line = String::from("|");
        for (width, cell) in widths.iter().zip(cells) {
            let _ = write!(line, "{:^width$}|", cell.as_ref(), width = *width);
        }
        line
    }

    /// Render one semester table
    #[must_use]
    pub fn semester_table(semester: &Semester) -> String {
        let rows: Vec<[String; 5]> = semester.subjects().iter().map(Self::cells).collect();
        let widths = Self::widths(&rows);
        let separator = Self::separator(&widths);

        let mut out = String::new();
        let _ = writeln!(out, "{separator}");
        let _ = writeln!(out, "{}", Self::row(&widths, &HEADERS));
        let _ = writeln!(out, "{separator}");
        for row in &rows {
            let _ = writeln!(out, "{}", Self::row(&widths, row));
        }
        if !rows.is_empty() {
            let _ = writeln!(out, "{separator}");
        }
        out
    }

    /// Render the index summary lines
    #[must_use]
    pub fn summary(ctx: &ReportContext) -> String {
        match &ctx.indices {
            Ok(indices) => format!(
                "Overall index:  {:.4}\nElective index: {:.4}\n",
                indices.overall, indices.elective
            ),
            Err(reason) => format!("Indices unavailable: {reason}\n"),
        }
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TextReporter {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();

        if ctx.semesters.is_empty() {
            out.push_str("No semesters recorded.\n\n");
        }

        let sections = ctx.semesters.iter().zip(&ctx.validations).enumerate();
        for (i, (semester, validation)) in sections {
            let _ = writeln!(out, "{}", semester_heading(semester));
            out.push_str(&Self::semester_table(semester));
            // breakdown rows follow semester order, or are absent altogether
            if let Some(average) = ctx.breakdown.get(i).and_then(|row| row.average) {
                let _ = writeln!(out, "  Semester average: {average:.4}");
            }
            for discrepancy in &validation.discrepancies {
                let _ = writeln!(out, "  ! {discrepancy}");
            }
            out.push('\n');
        }

        out.push_str(&Self::summary(ctx));
        out
    }
}
