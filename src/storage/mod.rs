//! Storage layer for checkwriter
//!
//! Provides JSON file storage with atomic writes and in-memory indexes.
//! All mutation of the ledger list and transaction log is funneled through
//! the repositories here via the service layer; nothing else touches the
//! data files.

pub mod file_io;
pub mod gl_codes;
pub mod ledgers;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use gl_codes::GlCodeRepository;
pub use ledgers::LedgerRepository;
pub use transactions::TransactionRepository;

use crate::audit::{AuditLogger, Operation};
use crate::config::paths::CheckwriterPaths;
use crate::error::CheckwriterError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: CheckwriterPaths,
    pub ledgers: LedgerRepository,
    pub transactions: TransactionRepository,
    pub gl_codes: GlCodeRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: CheckwriterPaths) -> Result<Self, CheckwriterError> {
        paths.ensure_directories()?;

        Ok(Self {
            ledgers: LedgerRepository::new(paths.ledgers_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            gl_codes: GlCodeRepository::new(paths.gl_codes_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &CheckwriterPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), CheckwriterError> {
        self.ledgers.load()?;
        self.transactions.load()?;
        self.gl_codes.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), CheckwriterError> {
        self.ledgers.save()?;
        self.transactions.save()?;
        self.gl_codes.save()?;
        Ok(())
    }

    /// Write an audit entry
    pub fn log_audit(&self, operation: Operation, summary: impl Into<String>) {
        self.audit.log(operation, summary);
    }

    /// Access the audit logger (read-back for the config command)
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }
}
