//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// A ledger was created by admin action
    CreateLedger,
    /// A batch or single-check run merged ledgers/transactions into the store
    Commit,
    /// A single transaction was deleted
    DeleteTransaction,
    /// A ledger and all its transactions were deleted
    DeleteLedger,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::CreateLedger => write!(f, "CREATE_LEDGER"),
            Operation::Commit => write!(f, "COMMIT"),
            Operation::DeleteTransaction => write!(f, "DELETE_TRANSACTION"),
            Operation::DeleteLedger => write!(f, "DELETE_LEDGER"),
        }
    }
}

/// One line in the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation happened
    pub timestamp: DateTime<Utc>,

    /// What happened
    pub operation: Operation,

    /// Human-readable summary, e.g. "2 ledgers, 5 transactions"
    pub summary: String,
}

impl AuditEntry {
    /// Create an entry stamped with the current time
    pub fn new(operation: Operation, summary: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            summary: summary.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Commit.to_string(), "COMMIT");
        assert_eq!(Operation::DeleteLedger.to_string(), "DELETE_LEDGER");
    }

    #[test]
    fn test_entry_serialization() {
        let entry = AuditEntry::new(Operation::Commit, "1 ledger, 3 transactions");
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.operation, Operation::Commit);
        assert_eq!(parsed.summary, "1 ledger, 3 transactions");
    }
}
