//! Transaction repository for JSON storage
//!
//! Manages the append-only transaction log in transactions.json, with a
//! per-ledger index for balance folds and register queries.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CheckwriterError;
use crate::models::{LedgerId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a per-ledger index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: ledger_id -> transaction_ids
    by_ledger: RwLock<HashMap<LedgerId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_ledger: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the ledger index
    pub fn load(&self) -> Result<(), CheckwriterError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_ledger = self
            .by_ledger
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_ledger.clear();

        for txn in file_data.transactions {
            by_ledger.entry(txn.ledger_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk in commit order
    pub fn save(&self) -> Result<(), CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transactions)
    }

    /// Get transactions for a ledger in commit order
    pub fn get_by_ledger(&self, ledger_id: LedgerId) -> Result<Vec<Transaction>, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_ledger = self
            .by_ledger
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_ledger.get(&ledger_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(transactions)
    }

    /// Insert a transaction
    ///
    /// Committed transactions are immutable, so this is append-only in
    /// practice; re-inserting the same id replaces it for load/save cycles.
    pub fn upsert(&self, txn: Transaction) -> Result<(), CheckwriterError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_ledger = self
            .by_ledger
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_ledger.get_mut(&old.ledger_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_ledger.entry(txn.ledger_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, CheckwriterError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_ledger = self
            .by_ledger
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            if let Some(ids) = by_ledger.get_mut(&txn.ledger_id) {
                ids.retain(|&tid| tid != id);
            }
        }
        Ok(removed)
    }

    /// Delete every transaction for a ledger (cascade), returning the count
    pub fn delete_by_ledger(&self, ledger_id: LedgerId) -> Result<usize, CheckwriterError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_ledger = self
            .by_ledger
            .write()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = by_ledger.remove(&ledger_id).unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if data.remove(&id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, CheckwriterError> {
        let data = self
            .data
            .read()
            .map_err(|e| CheckwriterError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
