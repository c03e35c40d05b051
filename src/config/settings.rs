//! User settings for checkwriter
//!
//! Manages print preferences, the default print profile name, and the
//! auto-increment check-number cursor.

use serde::{Deserialize, Serialize};

use super::paths::CheckwriterPaths;
use crate::error::CheckwriterError;
use crate::print::PrintMode;

/// Commit granularity for batch printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMode {
    /// One check per print unit
    #[default]
    Standard,
    /// Up to three checks per physical sheet; the sheet is the commit unit
    ThreeUp,
}

/// User settings for checkwriter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default print mode when none is given on the command line
    #[serde(default)]
    pub print_mode: PrintMode,

    /// Default commit granularity for batches
    #[serde(default)]
    pub commit_mode: CommitMode,

    /// Whether check numbers are assigned automatically
    #[serde(default = "default_auto_number")]
    pub auto_number: bool,

    /// Next check number the auto-increment cursor will assign
    #[serde(default = "default_next_check_number")]
    pub next_check_number: u32,

    /// Name of the active print profile (informational, attached to
    /// committed transactions)
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether initial setup has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_auto_number() -> bool {
    true
}

fn default_next_check_number() -> u32 {
    1001
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            print_mode: PrintMode::default(),
            commit_mode: CommitMode::default(),
            auto_number: default_auto_number(),
            next_check_number: default_next_check_number(),
            profile: default_profile(),
            currency_symbol: default_currency(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CheckwriterPaths) -> Result<Self, CheckwriterError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CheckwriterError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CheckwriterError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet; let the caller decide when to persist.
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CheckwriterPaths) -> Result<(), CheckwriterError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CheckwriterError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| CheckwriterError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.commit_mode, CommitMode::Standard);
        assert!(settings.auto_number);
        assert_eq!(settings.next_check_number, 1001);
        assert_eq!(settings.profile, "default");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckwriterPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.commit_mode = CommitMode::ThreeUp;
        settings.next_check_number = 2001;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.commit_mode, CommitMode::ThreeUp);
        assert_eq!(loaded.next_check_number, 2001);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckwriterPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.next_check_number, 1001);
    }
}
