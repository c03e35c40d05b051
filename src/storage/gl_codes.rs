//! Learned GL code descriptions
//!
//! A small key-value store that remembers the description last seen for
//! each GL code, so later entries can be pre-filled. Purely an enrichment;
//! losing this file never affects ledger correctness.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CheckwriterError;

use super::file_io::{read_json, write_json_atomic};

/// Repository for learned GL code descriptions
pub struct GlCodeRepository {
    path: PathBuf,
    data: RwLock<HashMap<String, String>>,
}

impl GlCodeRepository {
    /// Create a new GL code repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load learned codes from disk
    pub fn load(&self) -> Result<(), CheckwriterError> {
        let file_data: HashMap<String, String> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data;
        Ok(())
    }

    /// Save learned codes to disk
    pub fn save(&self) -> Result<(), CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(&self.path, &*data)
    }

    /// Record a code/description pair, overwriting any earlier description
    pub fn insert(&self, code: &str, description: &str) -> Result<(), CheckwriterError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(code.to_string(), description.to_string());
        Ok(())
    }

    /// Look up the learned description for a code
    pub fn get(&self, code: &str) -> Result<Option<String>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(code).cloned())
    }

    /// Count learned codes
    pub fn count(&self) -> Result<usize, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
