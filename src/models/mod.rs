//! Core data models for checkwriter
//!
//! This module contains the data structures that represent the domain:
//! ledgers, transactions, pending queue items, and money.

pub mod ids;
pub mod ledger;
pub mod money;
pub mod pending;
pub mod transaction;

pub use ids::{LedgerId, TransactionId};
pub use ledger::Ledger;
pub use money::Money;
pub use pending::PendingItem;
pub use transaction::{LedgerSnapshot, SheetSlot, Transaction, TransactionKind};
