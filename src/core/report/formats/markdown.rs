//! Markdown report generator
//!
//! Fills the embedded template with the index summary, a per-semester
//! overview and one table per semester.

use crate::core::report::{semester_heading, ReportContext, ReportGenerator};
use std::fmt::Write;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let (overall, elective, note) = match &ctx.indices {
            Ok(indices) => (
                format!("{:.4}", indices.overall),
                format!("{:.4}", indices.elective),
                String::new(),
            ),
            Err(reason) => ("-".to_string(), "-".to_string(), format!("> ⚠️ {reason}")),
        };

        fill_template(
            MARKDOWN_TEMPLATE,
            &[
                ("semester_count", ctx.semesters.len().to_string()),
                ("subject_count", ctx.subject_count().to_string()),
                ("total_credits", ctx.total_credits().to_string()),
                ("overall_index", overall),
                ("elective_index", elective),
                ("index_note", note),
                ("semester_summary", Self::generate_summary_table(ctx)),
                ("semester_tables", Self::generate_semester_tables(ctx)),
                ("consistency", Self::generate_consistency(ctx)),
            ],
        )
    }

    /// Generate the semester overview table
    fn generate_summary_table(ctx: &ReportContext) -> String {
        if ctx.breakdown.is_empty() {
            return "_No weighted semesters._\n".to_string();
        }

        let mut table = String::new();
        table.push_str("| Semester | Seniority | Subjects | Credits | Average |\n");
        table.push_str("|---|---|---|---|---|\n");
        for row in &ctx.breakdown {
            let average = row
                .average
                .map_or_else(|| "-".to_string(), |a| format!("{a:.4}"));
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {average} |",
                row.number, row.seniority, row.subject_count, row.total_credits
            );
        }
        table
    }

    /// Generate one subject table per semester
    fn generate_semester_tables(ctx: &ReportContext) -> String {
        if ctx.semesters.is_empty() {
            return "_No semesters recorded._\n".to_string();
        }

        let mut out = String::new();
        for semester in ctx.semesters {
            let _ = writeln!(out, "### {}\n", semester_heading(semester));
            out.push_str("| Name | Code | Credits | Grade | Type |\n");
            out.push_str("|---|---|---|---|---|\n");
            for subject in semester.subjects() {
                let kind = if subject.is_mandatory() {
                    "Mandatory"
                } else {
                    "Elective"
                };
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {kind} |",
                    escape_cell(subject.name()),
                    subject.code().map_or_else(|| "-".to_string(), escape_cell),
                    subject.credits(),
                    subject.grade()
                );
            }
            out.push('\n');
        }
        out
    }

    /// Generate the discrepancy list
    fn generate_consistency(ctx: &ReportContext) -> String {
        if ctx.inconsistent_count() == 0 {
            return "✅ All semesters match their declared values.\n".to_string();
        }

        let mut out = String::new();
        for validation in ctx.validations.iter().filter(|v| !v.is_consistent()) {
            for discrepancy in &validation.discrepancies {
                let _ = writeln!(out, "- Semester {}: {discrepancy}", validation.semester);
            }
        }
        out
    }
}

/// Replace every `{{key}}` in one pass; substituted text is never rescanned.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, end + 2))
        });
        match value {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &after[consumed..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape a table cell so user text cannot break the row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &ReportContext) -> String {
        self.render_template(ctx)
    }
}
