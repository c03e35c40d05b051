//! Audit logging
//!
//! Every store mutation (commit, delete, cascade delete) gets a line in an
//! append-only audit.log, separate from diagnostic tracing output.

pub mod entry;
pub mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
