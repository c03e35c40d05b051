//! Path management for checkwriter
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `CHECKWRITER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory via the `directories` crate
//!    (`~/.config/checkwriter` on Linux, `%APPDATA%\checkwriter` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::CheckwriterError;

/// Manages all paths used by checkwriter
#[derive(Debug, Clone)]
pub struct CheckwriterPaths {
    /// Base directory for all checkwriter data
    base_dir: PathBuf,
}

impl CheckwriterPaths {
    /// Create a new CheckwriterPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CheckwriterError> {
        let base_dir = if let Ok(custom) = std::env::var("CHECKWRITER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            let dirs = BaseDirs::new().ok_or_else(|| {
                CheckwriterError::Config("Could not determine home directory".into())
            })?;
            dirs.config_dir().join("checkwriter")
        };

        Ok(Self { base_dir })
    }

    /// Create CheckwriterPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to ledgers.json
    pub fn ledgers_file(&self) -> PathBuf {
        self.data_dir().join("ledgers.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to gl_codes.json (learned GL code descriptions)
    pub fn gl_codes_file(&self) -> PathBuf {
        self.data_dir().join("gl_codes.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), CheckwriterError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            CheckwriterError::Io(format!("Failed to create base directory: {}", e))
        })?;

        std::fs::create_dir_all(self.data_dir()).map_err(|e| {
            CheckwriterError::Io(format!("Failed to create data directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if checkwriter has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckwriterPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.ledgers_file(), temp_dir.path().join("data/ledgers.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckwriterPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
