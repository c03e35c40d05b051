//! Pending queue items
//!
//! A pending item is a transaction-to-be: it carries a free-text ledger
//! name instead of a resolved id, and has no id, timestamp, or balance
//! snapshot until its print unit succeeds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::TransactionKind;

/// A queued check or deposit awaiting print-and-record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingItem {
    /// Check or deposit
    pub kind: TransactionKind,

    /// Free-text ledger name, resolved at processing time
    pub ledger_name: String,

    /// Transaction date
    pub date: NaiveDate,

    /// Payee for checks, description for deposits
    pub payee: String,

    /// Amount (must be positive to pass validation)
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

    /// Explicit check number; overrides auto-numbering when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<u32>,

    /// Which print profile this item came from (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl PendingItem {
    /// Create a pending check
    pub fn check(
        ledger_name: impl Into<String>,
        date: NaiveDate,
        payee: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            kind: TransactionKind::Check,
            ledger_name: ledger_name.into(),
            date,
            payee: payee.into(),
            amount,
            memo: String::new(),
            gl_code: None,
            gl_description: None,
            check_number: None,
            profile: None,
        }
    }

    /// Create a pending deposit
    pub fn deposit(
        ledger_name: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            ledger_name: ledger_name.into(),
            ..Self::check("", date, description, amount)
        }
    }

    /// Set the memo line
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Set GL code and description
    pub fn with_gl(mut self, code: impl Into<String>, description: impl Into<String>) -> Self {
        self.gl_code = Some(code.into());
        self.gl_description = Some(description.into());
        self
    }
}
