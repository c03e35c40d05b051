//! Ledger repository for JSON storage
//!
//! Manages loading and saving ledgers to ledgers.json. Older data files
//! carried a stored `balance` field per ledger; it is accepted on load and
//! discarded, since balances are always derived from the transaction log.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CheckwriterError;
use crate::models::{Ledger, LedgerId};

use super::file_io::{read_json, write_json_atomic};

/// On-disk ledger record, including the legacy stored balance
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerRecord {
    #[serde(flatten)]
    ledger: Ledger,

    /// Legacy duck-typed balance field; never trusted, never written back
    #[serde(default, skip_serializing)]
    balance: Option<serde_json::Value>,
}

/// Serializable ledger data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerData {
    ledgers: Vec<LedgerRecord>,
}

/// Repository for ledger persistence
pub struct LedgerRepository {
    path: PathBuf,
    data: RwLock<HashMap<LedgerId, Ledger>>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load ledgers from disk, discarding any legacy stored balance
    pub fn load(&self) -> Result<(), CheckwriterError> {
        let file_data: LedgerData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in file_data.ledgers {
            if record.balance.is_some() {
                debug!(ledger = %record.ledger.name, "discarding legacy stored balance");
            }
            data.insert(record.ledger.id, record.ledger);
        }

        Ok(())
    }

    /// Save ledgers to disk
    pub fn save(&self) -> Result<(), CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut ledgers: Vec<_> = data
            .values()
            .cloned()
            .map(|ledger| LedgerRecord {
                ledger,
                balance: None,
            })
            .collect();
        ledgers.sort_by(|a, b| a.ledger.name.to_lowercase().cmp(&b.ledger.name.to_lowercase()));

        write_json_atomic(&self.path, &LedgerData { ledgers })
    }

    /// Get a ledger by ID
    pub fn get(&self, id: LedgerId) -> Result<Option<Ledger>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all ledgers, sorted by name
    pub fn get_all(&self) -> Result<Vec<Ledger>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut ledgers: Vec<_> = data.values().cloned().collect();
        ledgers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(ledgers)
    }

    /// Get a ledger by name (trimmed, case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Ledger>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|l| l.name_matches(name)).cloned())
    }

    /// Check if a ledger name is taken, optionally excluding one ledger
    pub fn name_exists(
        &self,
        name: &str,
        exclude: Option<LedgerId>,
    ) -> Result<bool, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .any(|l| l.name_matches(name) && Some(l.id) != exclude))
    }

    /// Insert or update a ledger
    pub fn upsert(&self, ledger: Ledger) -> Result<(), CheckwriterError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(ledger.id, ledger);
        Ok(())
    }

    /// Delete a ledger, returning it if it existed
    pub fn delete(&self, id: LedgerId) -> Result<Option<Ledger>, CheckwriterError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    /// Count ledgers
    pub fn count(&self) -> Result<usize, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
