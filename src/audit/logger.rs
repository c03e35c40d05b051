//! Append-only audit logger
//!
//! Writes one JSON object per line to audit.log. Logging failures are
//! reported but never block the operation being audited.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

use crate::error::CheckwriterError;

use super::entry::{AuditEntry, Operation};

/// Appends audit entries to a JSON-lines file
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    /// Create a logger writing to the given path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry
    pub fn log(&self, operation: Operation, summary: impl Into<String>) {
        let entry = AuditEntry::new(operation, summary);
        if let Err(e) = self.append(&entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }

    fn append(&self, entry: &AuditEntry) -> Result<(), CheckwriterError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CheckwriterError::Io(format!("Failed to create audit dir: {}", e)))?;
        }

        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CheckwriterError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", line)
            .map_err(|e| CheckwriterError::Io(format!("Failed to write audit log: {}", e)))?;
        Ok(())
    }

    /// Read back all entries (used by tests and the config command)
    pub fn read_all(&self) -> Result<Vec<AuditEntry>, CheckwriterError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| CheckwriterError::Io(format!("Failed to read audit log: {}", e)))?;

        let mut entries = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            entries.push(serde_json::from_str(line)?);
        }
        Ok(entries)
    }
}
