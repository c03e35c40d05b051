//! Transaction builder
//!
//! Turns a raw pending item plus a working balance into a committable
//! transaction draft, and resolves free-text ledger names against the
//! working set (store ledgers plus anything staged earlier in the run).

use tracing::info;

use crate::error::{CheckwriterError, CheckwriterResult};
use crate::models::{
    Ledger, LedgerId, LedgerSnapshot, Money, PendingItem, SheetSlot, Transaction, TransactionId,
    TransactionKind,
};
use crate::print::CheckFace;

/// An unpersisted transaction shell
///
/// Everything a [`Transaction`] has except the id and timestamp, which are
/// assigned only when the draft's print unit succeeds.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub ledger_id: LedgerId,
    /// Canonical ledger name, carried for rendering only
    pub ledger_name: String,
    pub profile: Option<String>,
    pub date: chrono::NaiveDate,
    pub payee: String,
    pub amount: Money,
    pub memo: String,
    pub gl_code: Option<String>,
    pub gl_description: Option<String>,
    pub check_number: Option<u32>,
    pub sheet_slot: Option<SheetSlot>,
    pub balance_after: Money,
    pub snapshot: LedgerSnapshot,
}

impl TransactionDraft {
    /// Promote the draft to a committed transaction, assigning its id and
    /// timestamp
    pub fn finalize(self) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            kind: self.kind,
            ledger_id: self.ledger_id,
            profile: self.profile,
            date: self.date,
            payee: self.payee,
            amount: self.amount,
            memo: self.memo,
            gl_code: self.gl_code,
            gl_description: self.gl_description,
            check_number: self.check_number,
            sheet_slot: self.sheet_slot,
            created_at: chrono::Utc::now(),
            balance_after: self.balance_after,
            snapshot: self.snapshot,
        }
    }

    /// The printable face for this draft
    pub fn face(&self) -> CheckFace {
        CheckFace {
            kind: self.kind,
            slot: self.sheet_slot,
            check_number: self.check_number,
            date: self.date,
            payee: self.payee.clone(),
            amount: self.amount,
            amount_words: self.amount.to_written_words(),
            memo: self.memo.clone(),
            ledger_name: self.ledger_name.clone(),
        }
    }
}

/// Validates and normalizes pending items into committable drafts
pub struct TransactionBuilder;

impl TransactionBuilder {
    /// Check whether a pending item can be built at all
    ///
    /// Failures here are the "skip silently" class: the caller drops the
    /// item without consuming a check number or touching any balance.
    pub fn validate(item: &PendingItem) -> CheckwriterResult<()> {
        if !item.amount.is_positive() {
            return Err(CheckwriterError::Validation(format!(
                "amount must be positive, got {}",
                item.amount
            )));
        }

        if item.payee.trim().is_empty() {
            let field = match item.kind {
                TransactionKind::Check => "payee",
                TransactionKind::Deposit => "description",
            };
            return Err(CheckwriterError::Validation(format!("{} is required", field)));
        }

        if item.ledger_name.trim().is_empty() {
            return Err(CheckwriterError::Validation("ledger name is required".into()));
        }

        Ok(())
    }

    /// Resolve a free-text ledger name to an id
    ///
    /// The name is trimmed once, then matched case-insensitively against
    /// `existing` (store ledgers plus ledgers staged earlier in the run)
    /// and then against `staged`. No fuzzy matching: internal whitespace
    /// differences produce distinct ledgers. If nothing matches, a new
    /// ledger with a zero starting balance is pushed onto `staged`.
    pub fn resolve_ledger<'a, I>(
        name: &str,
        existing: I,
        staged: &mut Vec<Ledger>,
    ) -> CheckwriterResult<LedgerId>
    where
        I: IntoIterator<Item = &'a Ledger>,
    {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CheckwriterError::Validation("ledger name is required".into()));
        }

        for ledger in existing {
            if ledger.name_matches(trimmed) {
                return Ok(ledger.id);
            }
        }

        if let Some(ledger) = staged.iter().find(|l| l.name_matches(trimmed)) {
            return Ok(ledger.id);
        }

        let ledger = Ledger::new(trimmed);
        let id = ledger.id;
        info!(name = %trimmed, "staging new ledger");
        staged.push(ledger);
        Ok(id)
    }

    /// Build a committable draft and the updated running balance
    ///
    /// `running_balance` is the working balance for this item's ledger
    /// within the current run; the returned balance is what the next item
    /// against the same ledger must chain from, even though nothing has
    /// been committed yet.
    pub fn build(
        item: &PendingItem,
        ledger_id: LedgerId,
        ledger_name: &str,
        running_balance: Money,
        check_number: Option<u32>,
    ) -> CheckwriterResult<(TransactionDraft, Money)> {
        Self::validate(item)?;

        let new_balance = match item.kind {
            TransactionKind::Deposit => running_balance + item.amount,
            TransactionKind::Check => running_balance - item.amount,
        };

        let number = match item.kind {
            TransactionKind::Check => item.check_number.or(check_number),
            TransactionKind::Deposit => None,
        };

        let draft = TransactionDraft {
            kind: item.kind,
            ledger_id,
            ledger_name: ledger_name.to_string(),
            profile: item.profile.clone(),
            date: item.date,
            payee: item.payee.trim().to_string(),
            amount: item.amount,
            memo: item.memo.clone(),
            gl_code: item.gl_code.clone(),
            gl_description: item.gl_description.clone(),
            check_number: number,
            sheet_slot: None,
            balance_after: new_balance,
            snapshot: LedgerSnapshot {
                previous_balance: running_balance,
                transaction_amount: item.amount,
                new_balance,
            },
        };

        Ok((draft, new_balance))
    }
}
