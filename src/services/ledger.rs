//! Ledger service
//!
//! Balance derivation and the atomic commit that appends a batch's staged
//! ledgers and finalized transactions to the store in one step. Deletion
//! is the exact inverse of recording: removing a transaction restores the
//! derived balance the ledger had before it was committed.

use tracing::{debug, info};

use crate::audit::Operation;
use crate::error::{CheckwriterError, CheckwriterResult};
use crate::models::{Ledger, LedgerId, Money, Transaction, TransactionId};
use crate::storage::Storage;

/// A ledger together with its derived balance
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    pub ledger: Ledger,
    pub balance: Money,
    pub transaction_count: usize,
}

/// Service for ledger queries and the commit/delete mutations
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The ledger's current balance: starting balance plus the signed sum
    /// of its transactions
    pub fn derived_balance(&self, id: LedgerId) -> CheckwriterResult<Money> {
        let ledger = self
            .storage
            .ledgers
            .get(id)?
            .ok_or_else(|| CheckwriterError::ledger_not_found(id.to_string()))?;

        let transactions = self.storage.transactions.get_by_ledger(id)?;
        let delta: Money = transactions.iter().map(|t| t.signed_amount()).sum();
        Ok(ledger.starting_balance + delta)
    }

    /// All ledgers with their derived balances, sorted by name
    pub fn list(&self) -> CheckwriterResult<Vec<LedgerSummary>> {
        let mut summaries = Vec::new();
        for ledger in self.storage.ledgers.get_all()? {
            let transactions = self.storage.transactions.get_by_ledger(ledger.id)?;
            let delta: Money = transactions.iter().map(|t| t.signed_amount()).sum();
            summaries.push(LedgerSummary {
                balance: ledger.starting_balance + delta,
                transaction_count: transactions.len(),
                ledger,
            });
        }
        Ok(summaries)
    }

    /// Look a ledger up by id string or name
    pub fn find(&self, name_or_id: &str) -> CheckwriterResult<Ledger> {
        if let Ok(id) = name_or_id.parse::<LedgerId>() {
            if let Some(ledger) = self.storage.ledgers.get(id)? {
                return Ok(ledger);
            }
        }

        self.storage
            .ledgers
            .get_by_name(name_or_id)?
            .ok_or_else(|| CheckwriterError::ledger_not_found(name_or_id.trim()))
    }

    /// Create a ledger with an explicit starting balance
    pub fn create(&self, name: &str, starting_balance: Money) -> CheckwriterResult<Ledger> {
        let ledger = Ledger::with_starting_balance(name.trim(), starting_balance);
        ledger
            .validate()
            .map_err(|e| CheckwriterError::Validation(e.to_string()))?;

        if self.storage.ledgers.name_exists(&ledger.name, None)? {
            return Err(CheckwriterError::Duplicate {
                entity_type: "Ledger",
                identifier: ledger.name,
            });
        }

        self.storage.ledgers.upsert(ledger.clone())?;
        self.storage.ledgers.save()?;
        self.storage.log_audit(
            Operation::CreateLedger,
            format!("{} ({})", ledger.name, ledger.starting_balance),
        );
        info!(ledger = %ledger.name, "created ledger");
        Ok(ledger)
    }

    /// Update a ledger's starting balance
    ///
    /// The derived balance moves by the same delta; committed snapshots
    /// are historical records and are left alone.
    pub fn set_starting_balance(
        &self,
        id: LedgerId,
        starting_balance: Money,
    ) -> CheckwriterResult<Ledger> {
        let mut ledger = self
            .storage
            .ledgers
            .get(id)?
            .ok_or_else(|| CheckwriterError::ledger_not_found(id.to_string()))?;

        ledger.starting_balance = starting_balance;
        ledger.updated_at = chrono::Utc::now();
        self.storage.ledgers.upsert(ledger.clone())?;
        self.storage.ledgers.save()?;
        Ok(ledger)
    }

    /// Append a completed batch to the store in one step
    ///
    /// Staged ledgers and finalized transactions land together; both files
    /// are rewritten atomically so a reader never sees a transaction whose
    /// ledger does not exist.
    pub fn commit(
        &self,
        new_ledgers: Vec<Ledger>,
        new_transactions: Vec<Transaction>,
    ) -> CheckwriterResult<()> {
        if new_ledgers.is_empty() && new_transactions.is_empty() {
            debug!("nothing to commit");
            return Ok(());
        }

        for txn in &new_transactions {
            debug_assert!(
                txn.snapshot_consistent(),
                "inconsistent snapshot for {}",
                txn.id
            );
        }

        let ledger_count = new_ledgers.len();
        let txn_count = new_transactions.len();

        for ledger in new_ledgers {
            ledger
                .validate()
                .map_err(|e| CheckwriterError::Validation(e.to_string()))?;
            self.storage.ledgers.upsert(ledger)?;
        }
        for txn in new_transactions {
            self.storage.transactions.upsert(txn)?;
        }

        self.storage.ledgers.save()?;
        self.storage.transactions.save()?;

        self.storage.log_audit(
            Operation::Commit,
            format!("{} transactions, {} new ledgers", txn_count, ledger_count),
        );
        info!(transactions = txn_count, ledgers = ledger_count, "committed batch");
        Ok(())
    }

    /// Look a transaction up by id
    ///
    /// Accepts the full UUID or the short `txn-`-prefixed form that
    /// listings display; a short form must match exactly one transaction.
    pub fn find_transaction(&self, identifier: &str) -> CheckwriterResult<Transaction> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<TransactionId>() {
            if let Some(txn) = self.storage.transactions.get(id)? {
                return Ok(txn);
            }
        }

        let prefix = identifier
            .strip_prefix("txn-")
            .unwrap_or(identifier)
            .to_lowercase();
        if prefix.is_empty() {
            return Err(CheckwriterError::transaction_not_found(identifier));
        }

        let mut matches: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_uuid().to_string().starts_with(&prefix))
            .collect();

        if matches.len() > 1 {
            return Err(CheckwriterError::Validation(format!(
                "Transaction id '{}' is ambiguous ({} matches); use more characters",
                identifier,
                matches.len()
            )));
        }
        matches
            .pop()
            .ok_or_else(|| CheckwriterError::transaction_not_found(identifier))
    }

    /// Remove a transaction, restoring the ledger's derived balance
    pub fn delete_transaction(&self, id: TransactionId) -> CheckwriterResult<Transaction> {
        let removed = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| CheckwriterError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.save()?;
        self.storage.log_audit(
            Operation::DeleteTransaction,
            format!("{} {} {}", removed.id, removed.payee, removed.amount),
        );
        info!(transaction = %removed.id, "deleted transaction");
        Ok(removed)
    }

    /// Remove a ledger and every transaction recorded against it
    pub fn delete_ledger(&self, id: LedgerId) -> CheckwriterResult<(Ledger, usize)> {
        let removed = self
            .storage
            .ledgers
            .delete(id)?
            .ok_or_else(|| CheckwriterError::ledger_not_found(id.to_string()))?;

        let cascade = self.storage.transactions.delete_by_ledger(id)?;
        self.storage.ledgers.save()?;
        self.storage.transactions.save()?;
        self.storage.log_audit(
            Operation::DeleteLedger,
            format!("{} ({} transactions)", removed.name, cascade),
        );
        info!(ledger = %removed.name, transactions = cascade, "deleted ledger");
        Ok((removed, cascade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CheckwriterPaths;
    use crate::models::{PendingItem, TransactionKind};
    use crate::services::builder::TransactionBuilder;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckwriterPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn committed_check(
        service: &LedgerService,
        ledger: &Ledger,
        amount_cents: i64,
    ) -> Transaction {
        let item =
            PendingItem::check(ledger.name.as_str(), date(), "Acme Co", Money::from_cents(amount_cents));
        let running = service.derived_balance(ledger.id).unwrap();
        let (draft, _) =
            TransactionBuilder::build(&item, ledger.id, &ledger.name, running, None).unwrap();
        let txn = draft.finalize();
        service.commit(Vec::new(), vec![txn.clone()]).unwrap();
        txn
    }

    #[test]
    fn test_create_and_duplicate() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        service.create("Operating", Money::from_cents(100000)).unwrap();
        let err = service.create("  operating ", Money::zero()).unwrap_err();
        assert!(matches!(err, CheckwriterError::Duplicate { .. }));
    }

    #[test]
    fn test_derived_balance_folds_transactions() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::from_cents(100000)).unwrap();
        committed_check(&service, &ledger, 10000);

        let deposit =
            PendingItem::deposit(ledger.name.as_str(), date(), "Refund", Money::from_cents(2500));
        let running = service.derived_balance(ledger.id).unwrap();
        let (draft, _) =
            TransactionBuilder::build(&deposit, ledger.id, &ledger.name, running, None).unwrap();
        service.commit(Vec::new(), vec![draft.finalize()]).unwrap();

        // 1000.00 - 100.00 + 25.00
        assert_eq!(service.derived_balance(ledger.id).unwrap().cents(), 92500);
    }

    #[test]
    fn test_delete_transaction_is_exact_inverse() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::from_cents(50000)).unwrap();
        let before = service.derived_balance(ledger.id).unwrap();

        let txn = committed_check(&service, &ledger, 12345);
        assert_eq!(
            service.derived_balance(ledger.id).unwrap(),
            before - Money::from_cents(12345)
        );

        service.delete_transaction(txn.id).unwrap();
        assert_eq!(service.derived_balance(ledger.id).unwrap(), before);
    }

    #[test]
    fn test_delete_earlier_transaction_keeps_snapshots() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::from_cents(100000)).unwrap();
        let first = committed_check(&service, &ledger, 10000);
        let second = committed_check(&service, &ledger, 20000);

        service.delete_transaction(first.id).unwrap();

        // Derived balance reflects the deletion.
        assert_eq!(service.derived_balance(ledger.id).unwrap().cents(), 80000);

        // The later transaction's stored snapshot is untouched.
        let stored = storage.transactions.get(second.id).unwrap().unwrap();
        assert_eq!(stored.snapshot.previous_balance.cents(), 90000);
        assert_eq!(stored.snapshot.new_balance.cents(), 70000);
    }

    #[test]
    fn test_delete_ledger_cascades() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::zero()).unwrap();
        committed_check(&service, &ledger, 100);
        committed_check(&service, &ledger, 200);

        let (removed, cascade) = service.delete_ledger(ledger.id).unwrap();
        assert_eq!(removed.id, ledger.id);
        assert_eq!(cascade, 2);
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert!(service.derived_balance(ledger.id).is_err());
    }

    #[test]
    fn test_commit_lands_ledgers_and_transactions_together() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let staged = Ledger::new("Implicit Fund");
        let item = PendingItem::check("Implicit Fund", date(), "Acme Co", Money::from_cents(5000));
        let (draft, _) =
            TransactionBuilder::build(&item, staged.id, &staged.name, Money::zero(), None).unwrap();

        service.commit(vec![staged.clone()], vec![draft.finalize()]).unwrap();

        assert!(storage.ledgers.get(staged.id).unwrap().is_some());
        assert_eq!(service.derived_balance(staged.id).unwrap().cents(), -5000);

        // Check kinds may overdraw; negative balances are recorded as-is.
        let summaries = service.list().unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].balance.is_negative());
    }

    #[test]
    fn test_set_starting_balance_moves_derived() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::zero()).unwrap();
        committed_check(&service, &ledger, 1000);

        service
            .set_starting_balance(ledger.id, Money::from_cents(100000))
            .unwrap();
        assert_eq!(service.derived_balance(ledger.id).unwrap().cents(), 99000);
    }

    #[test]
    fn test_find_transaction_by_displayed_id() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::from_cents(50000)).unwrap();
        let txn = committed_check(&service, &ledger, 12345);

        // The short form shown in listings resolves back to the transaction.
        let shown = txn.id.to_string();
        assert!(shown.starts_with("txn-"));
        assert_eq!(service.find_transaction(&shown).unwrap().id, txn.id);

        // The full UUID and the bare prefix work too.
        let full = txn.id.as_uuid().to_string();
        assert_eq!(service.find_transaction(&full).unwrap().id, txn.id);
        assert_eq!(service.find_transaction(&full[..8]).unwrap().id, txn.id);

        // Deletion round-trips through the displayed form.
        let found = service.find_transaction(&shown).unwrap();
        service.delete_transaction(found.id).unwrap();
        assert!(service.find_transaction(&shown).unwrap_err().is_not_found());
        assert_eq!(
            service.derived_balance(ledger.id).unwrap(),
            Money::from_cents(50000)
        );
    }

    #[test]
    fn test_find_transaction_rejects_ambiguous_prefix() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::zero()).unwrap();
        for suffix in ["0001", "0002"] {
            let item =
                PendingItem::check(ledger.name.as_str(), date(), "Acme Co", Money::from_cents(100));
            let (draft, _) =
                TransactionBuilder::build(&item, ledger.id, &ledger.name, Money::zero(), None)
                    .unwrap();
            let mut txn = draft.finalize();
            let raw = format!("aaaaaaaa-0000-4000-8000-00000000{}", suffix);
            txn.id = TransactionId::from(uuid::Uuid::parse_str(&raw).unwrap());
            service.commit(Vec::new(), vec![txn]).unwrap();
        }

        let err = service.find_transaction("txn-aaaaaaaa").unwrap_err();
        assert!(matches!(err, CheckwriterError::Validation(_)));
        assert!(service.find_transaction("missing1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = test_storage();
        let service = LedgerService::new(&storage);

        let ledger = service.create("Operating", Money::zero()).unwrap();
        assert_eq!(service.find("operating").unwrap().id, ledger.id);
        assert_eq!(
            service.find(&ledger.id.as_uuid().to_string()).unwrap().id,
            ledger.id
        );
        assert!(service.find("missing").unwrap_err().is_not_found());
    }
}
