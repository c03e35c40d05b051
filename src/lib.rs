//! checkwriter - check printing with derived ledger balances
//!
//! This library implements a check-printing application whose register is
//! an append-only transaction log. Ledger balances are never stored; they
//! are derived from a starting balance plus the signed sum of committed
//! transactions, so the data files cannot drift out of reconciliation.
//!
//! Printing is the one irreversible side effect. The batch pipeline prints
//! each commit unit (a check, or a three-up sheet) first and appends to the
//! register only after the print adapter confirms success; a failed unit is
//! reverted whole.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (money, ledgers, transactions, pending items)
//! - `storage`: JSON file storage with atomic writes
//! - `audit`: Append-only audit log of mutations
//! - `print`: The print boundary (render units, adapters, the failure oracle)
//! - `services`: Business logic (balance derivation, batch and single
//!   controllers, queue loading)
//! - `cli`: Command handlers

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod print;
pub mod services;
pub mod storage;

pub use error::{CheckwriterError, CheckwriterResult};
