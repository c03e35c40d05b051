//! Service layer for checkwriter
//!
//! Business logic over the storage layer: balance derivation and the
//! atomic commit, the transaction builder, the batch and single
//! print-and-record controllers, queue loading, and GL code learning.

pub mod batch;
pub mod builder;
pub mod gl;
pub mod import;
pub mod ledger;
pub mod single;

pub use batch::{
    BatchCanceller, BatchController, BatchHandle, BatchOptions, BatchProgress, BatchSummary,
};
pub use builder::{TransactionBuilder, TransactionDraft};
pub use gl::{GlCodeLearner, StoredGlLearner};
pub use import::{QueueLoadResult, QueueLoader, RowError};
pub use ledger::{LedgerService, LedgerSummary};
pub use single::SingleController;
