//! CLI argument definitions for `GradeIndex`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use grade_index::config::ConfigOverrides;
use grade_index::grade;
use grade_index::report::ReportFormat;
use logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Subject given on the command line as `NAME:CREDITS:GRADE[:mandatory|elective][:CODE]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSpec {
    /// Subject name
    pub name: String,
    /// Credit hours
    pub credits: i32,
    /// Grade label, already checked against the vocabulary
    pub grade: String,
    /// Mandatory flag (defaults to mandatory)
    pub mandatory: bool,
    /// Optional subject code
    pub code: Option<String>,
}

/// Parse a mandatory/elective marker.
pub fn parse_kind(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "m" | "mandatory" | "true" | "yes" | "y" => Ok(true),
        "e" | "elective" | "false" | "no" | "n" => Ok(false),
        other => Err(format!("expected 'mandatory' or 'elective', got '{other}'")),
    }
}

/// Check a grade label against the vocabulary at the input boundary.
pub fn parse_grade(value: &str) -> Result<String, String> {
    let label = value.trim();
    if grade::is_recognized(label) {
        Ok(label.to_string())
    } else {
        Err(format!(
            "unknown grade '{label}' (expected one of {})",
            grade::GRADE_LABELS.join(", ")
        ))
    }
}

impl FromStr for SubjectSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if !(3..=5).contains(&parts.len()) {
            return Err(format!(
                "expected NAME:CREDITS:GRADE[:mandatory|elective][:CODE], got '{s}'"
            ));
        }
        let name = parts[0].trim();
        if name.is_empty() {
            return Err("subject name must not be empty".to_string());
        }
        let credits = parts[1]
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("invalid credits '{}'", parts[1]))?;
        let grade = parse_grade(parts[2])?;
        let mandatory = parts.get(3).map_or(Ok(true), |kind| parse_kind(kind))?;
        let code = parts
            .get(4)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            name: name.to_string(),
            credits,
            grade,
            mandatory,
            code,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `archive`, `strict`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum SemesterSubcommand {
    /// List every semester with its subjects.
    List,
    /// Record a new semester.
    ///
    /// Without any --subject the subjects are asked for interactively.
    Add {
        /// Position in the semester sequence (1 for the first semester)
        #[arg(long, value_name = "N")]
        number: u32,

        /// Subject as NAME:CREDITS:GRADE[:mandatory|elective][:CODE] (repeatable)
        #[arg(long = "subject", value_name = "SPEC")]
        subjects: Vec<SubjectSpec>,

        /// Declared subject count, when it should differ from the subjects given
        #[arg(long, value_name = "COUNT")]
        declared_count: Option<usize>,

        /// Declared credit total, when it should differ from the subjects given
        #[arg(long, value_name = "CREDITS")]
        declared_credits: Option<i64>,
    },
    /// Delete a semester and all of its subjects.
    Delete {
        /// Semester id
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Compare declared counts and credits with the subject lists.
    Check {
        /// Semester id; all semesters when omitted
        #[arg(value_name = "ID")]
        id: Option<i64>,
    },
    /// Overwrite a semester's declared values from its subjects.
    Reconcile {
        /// Semester id
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubjectSubcommand {
    /// Add a subject to a semester.
    Add {
        /// Semester id
        #[arg(long, value_name = "ID")]
        semester: i64,
        /// Subject name
        #[arg(long)]
        name: String,
        /// Credit hours
        #[arg(long, allow_hyphen_values = true)]
        credits: i32,
        /// Grade label (SS, MS, MM, MI, II, SR)
        #[arg(long, value_parser = parse_grade)]
        grade: String,
        /// Mark the subject as elective
        #[arg(long)]
        elective: bool,
        /// Subject code
        #[arg(long)]
        code: Option<String>,
    },
    /// Change fields of a stored subject.
    Update {
        /// Subject id
        #[arg(value_name = "ID")]
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New credit hours
        #[arg(long, allow_hyphen_values = true)]
        credits: Option<i32>,
        /// New grade label
        #[arg(long, value_parser = parse_grade)]
        grade: Option<String>,
        /// Mandatory flag (true/false)
        #[arg(long, value_parser = BoolishValueParser::new())]
        mandatory: Option<bool>,
        /// New subject code (empty string clears it)
        #[arg(long)]
        code: Option<String>,
        /// Move the subject to another semester
        #[arg(long, value_name = "ID")]
        semester: Option<i64>,
    },
    /// Delete a subject.
    Delete {
        /// Subject id
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Show the grade labels and their weights.
    Grades,
    /// Manage semesters.
    Semester {
        #[command(subcommand)]
        subcommand: SemesterSubcommand,
    },
    /// Manage single subjects.
    Subject {
        #[command(subcommand)]
        subcommand: SubjectSubcommand,
    },
    /// Compute the overall and elective indices.
    Index,
    /// Render the full history with indices.
    Report {
        /// Report format: text (txt) or markdown (md)
        #[arg(short, long, value_name = "FORMAT", default_value = "text", value_parser = ReportFormat::from_str)]
        format: ReportFormat,

        /// Output file path (prints to stdout when omitted)
        #[arg(short, long, value_name = "FILE", conflicts_with = "save")]
        output: Option<PathBuf>,

        /// Write the report into the configured reports directory
        #[arg(long)]
        save: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradeindex",
    about = "Academic performance index tracker",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Use this archive file instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Refuse to save semesters with discrepancies (this run only)
    #[arg(long)]
    pub strict: bool,

    /// Reconcile declared values before saving (this run only)
    #[arg(long)]
    pub reconcile: bool,

    /// Override the reports directory
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `--strict` and `--reconcile` only ever switch their setting on; leaving
    /// them out keeps the configured value.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            archive: self
                .archive
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            strict: self.strict.then_some(true),
            reconcile_on_save: self.reconcile.then_some(true),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
