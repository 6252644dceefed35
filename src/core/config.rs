//! Configuration module for `GradeIndex`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to [`Config::get_gradeindex_dir`] in path values
const DIR_VARIABLE: &str = "$GRADE_INDEX";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`]
pub const CONFIG_KEYS: [&str; 7] = [
    "level",
    "file",
    "verbose",
    "archive",
    "strict",
    "reconcile_on_save",
    "reports_dir",
];

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the TOML archive holding the semester history
    #[serde(default)]
    pub archive: String,
}

/// Validation policy applied before semesters are persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Refuse to save semesters with discrepancies
    #[serde(default)]
    pub strict: bool,
    /// Recompute declared counts and credits before saving
    #[serde(default)]
    pub reconcile_on_save: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override archive path
    pub archive: Option<String>,
    /// Override strict validation
    pub strict: Option<bool>,
    /// Override reconcile-on-save
    pub reconcile_on_save: Option<bool>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

impl Config {
    /// Get the `$GRADE_INDEX` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradeindex`
    /// - macOS: `~/Library/Application Support/gradeindex`
    /// - Windows: `%APPDATA%\gradeindex`
    #[must_use]
    pub fn get_gradeindex_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradeindex")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// filled in, so upgrading picks up new settings without touching existing ones.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }
        if self.storage.archive.is_empty() && !defaults.storage.archive.is_empty() {
            self.storage.archive.clone_from(&defaults.storage.archive);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for the current run only; nothing is written to disk.
    /// Only non-`None` values replace config values.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     strict: Some(true),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(archive) = &overrides.archive {
            self.storage.archive.clone_from(archive);
        }

        if let Some(strict) = overrides.strict {
            self.validation.strict = strict;
        }
        if let Some(reconcile) = overrides.reconcile_on_save {
            self.validation.reconcile_on_save = reconcile;
        }

        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_gradeindex_dir`](Self::get_gradeindex_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradeindex_dir().join(CONFIG_FILE_NAME)
    }

    /// Archive path as a [`PathBuf`]
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.archive)
    }

    /// Expand `$GRADE_INDEX` in a string
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let expanded = Config::expand_variables("$GRADE_INDEX/archive.toml");
    /// // "/home/user/.config/gradeindex/archive.toml"
    /// ```
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradeindex_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Path values have `$GRADE_INDEX` expanded. Missing fields use their serde
    /// defaults (empty strings or false).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.storage.archive = Self::expand_variables(&config.storage.archive);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// - Debug: `DefaultCLIConfigDebug.toml`
    /// - Release: `DefaultCLIConfigRelease.toml`
    ///
    /// Falls back to an empty config if the embedded file fails to parse;
    /// the unit tests keep both files parseable.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_default()
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from
    ///   defaults and saves the merged result
    /// - On first run: creates the config directory and writes the defaults
    ///
    /// Falls back to defaults if anything goes wrong while reading.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(mut config) = Self::load_from(&config_file) {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                return config;
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Load configuration from an explicit file, without merging defaults
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to an explicit file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config cannot be serialized to TOML
    /// - The parent directory cannot be created
    /// - The file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys are listed in [`CONFIG_KEYS`]; `reconcile-on-save` and
    /// `reports-dir` are accepted as aliases.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "archive" => Some(self.storage.archive.clone()),
            "strict" => Some(self.validation.strict.to_string()),
            "reconcile_on_save" | "reconcile-on-save" => {
                Some(self.validation.reconcile_on_save.to_string())
            }
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Boolean keys (`verbose`, `strict`, `reconcile_on_save`) take "true" or
    /// "false". Path values may include `$GRADE_INDEX`.
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or a boolean value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "archive" => self.storage.archive = Self::expand_variables(value),
            "strict" => self.validation.strict = parse_bool(key, value)?,
            "reconcile_on_save" | "reconcile-on-save" => {
                self.validation.reconcile_on_save = parse_bool(key, value)?;
            }
            "reports_dir" | "reports-dir" => {
                self.paths.reports_dir = Self::expand_variables(value);
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "archive" => self.storage.archive.clone_from(&defaults.storage.archive),
            "strict" => self.validation.strict = defaults.validation.strict,
            "reconcile_on_save" | "reconcile-on-save" => {
                self.validation.reconcile_on_save = defaults.validation.reconcile_on_save;
            }
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[storage]")?;
        writeln!(f, "  archive = \"{}\"", self.storage.archive)?;

        writeln!(f, "\n[validation]")?;
        writeln!(f, "  strict = {}", self.validation.strict)?;
        writeln!(f, "  reconcile_on_save = {}", self.validation.reconcile_on_save)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        for text in [
            include_str!("../assets/DefaultCLIConfigDebug.toml"),
            include_str!("../assets/DefaultCLIConfigRelease.toml"),
        ] {
            let config = Config::from_toml(text).unwrap();
            assert!(!config.logging.level.is_empty());
            assert!(!config.storage.archive.is_empty());
            assert!(!config.storage.archive.contains(DIR_VARIABLE));
        }
    }

    #[test]
    fn test_every_key_round_trips() {
        let config = Config::from_defaults();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_boolean_keys_reject_garbage() {
        let mut config = Config::default();
        assert!(config.set("strict", "yes").is_err());
        config.set("reconcile-on-save", "true").unwrap();
        assert!(config.validation.reconcile_on_save);
    }
}
