//! Transaction model
//!
//! An immutable, append-only record of a check (debit) or deposit (credit)
//! against a ledger, carrying the balance snapshot captured at commit time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{LedgerId, TransactionId};
use super::money::Money;

/// Whether a transaction debits or credits its ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// A printed check; subtracts from the ledger balance
    Check,
    /// A deposit; adds to the ledger balance
    Deposit,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Check => write!(f, "Check"),
            Self::Deposit => write!(f, "Deposit"),
        }
    }
}

/// Position of a check on a three-up sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetSlot {
    Top,
    Middle,
    Bottom,
}

impl SheetSlot {
    /// Slot for the nth check on a sheet (0-based)
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Top),
            1 => Some(Self::Middle),
            2 => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// The `{previous, amount, new}` balance triple captured when a transaction
/// is committed
///
/// This is a point-in-time record for display and audit. Deleting an
/// earlier transaction changes later derived balances but never rewrites
/// these stored snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Ledger balance immediately before this transaction
    pub previous_balance: Money,
    /// The (positive) transaction amount
    pub transaction_amount: Money,
    /// Ledger balance immediately after this transaction
    pub new_balance: Money,
}

/// A committed check or deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Check or deposit
    pub kind: TransactionKind,

    /// The ledger this transaction belongs to
    pub ledger_id: LedgerId,

    /// Which print profile produced it (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Transaction date (as printed on the check)
    pub date: NaiveDate,

    /// Payee for checks, description for deposits
    pub payee: String,

    /// Amount; always positive, the kind carries the sign
    pub amount: Money,

    /// Memo line
    #[serde(default)]
    pub memo: String,

    /// Optional GL code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gl_code: Option<String>,

    /// Optional GL description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gl_description: Option<String>,

    /// Printed check number, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<u32>,

    /// Position on the physical sheet for three-up records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_slot: Option<SheetSlot>,

    /// When the transaction was committed
    pub created_at: DateTime<Utc>,

    /// Ledger balance immediately after this transaction in commit order
    pub balance_after: Money,

    /// Balance triple captured at commit time
    pub snapshot: LedgerSnapshot,
}

impl Transaction {
    /// The amount with its sign applied: positive for deposits, negative
    /// for checks
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Check => -self.amount,
        }
    }

    /// Verify the snapshot arithmetic
    ///
    /// A violation here is a programming error, not a user-facing failure.
    pub fn snapshot_consistent(&self) -> bool {
        let expected = self.snapshot.previous_balance + self.signed_amount();
        self.snapshot.new_balance == expected
            && self.snapshot.transaction_amount == self.amount
            && self.balance_after == self.snapshot.new_balance
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.payee,
            self.amount
        )
    }
}
