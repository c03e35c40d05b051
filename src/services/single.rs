//! Single print-and-record
//!
//! The one-off path for printing a single check or recording a single
//! deposit outside a batch. Same contract as the batch pipeline: print
//! first, commit only on confirmed success, with the failure surfaced as
//! an error instead of an oracle prompt.

use std::sync::Arc;

use tracing::info;

use crate::error::{CheckwriterError, CheckwriterResult};
use crate::models::{Money, PendingItem, Transaction, TransactionKind};
use crate::print::{PrintAdapter, PrintMode, PrintOutcome, RenderUnit};
use crate::storage::Storage;

use super::builder::TransactionBuilder;
use super::gl::GlCodeLearner;
use super::ledger::LedgerService;

/// Prints and records one item at a time
pub struct SingleController {
    storage: Arc<Storage>,
    printer: Arc<dyn PrintAdapter>,
    learner: Option<Arc<dyn GlCodeLearner>>,
}

impl SingleController {
    pub fn new(storage: Arc<Storage>, printer: Arc<dyn PrintAdapter>) -> Self {
        Self {
            storage,
            printer,
            learner: None,
        }
    }

    /// Attach a GL code learner, fed after a successful commit
    pub fn with_learner(mut self, learner: Arc<dyn GlCodeLearner>) -> Self {
        self.learner = Some(learner);
        self
    }

    /// Print one item and commit it on success
    ///
    /// `auto_number` is the cursor value to assign when the item is a
    /// check without an explicit number; pass `None` to leave it unnumbered.
    pub async fn record(
        &self,
        item: &PendingItem,
        print_mode: &PrintMode,
        auto_number: Option<u32>,
    ) -> CheckwriterResult<Transaction> {
        TransactionBuilder::validate(item)?;

        let known = self.storage.ledgers.get_all()?;
        let mut staged = Vec::new();
        let ledger_id =
            TransactionBuilder::resolve_ledger(&item.ledger_name, known.iter(), &mut staged)?;

        let service = LedgerService::new(&self.storage);
        let (ledger_name, running) = match known.iter().find(|l| l.id == ledger_id) {
            Some(ledger) => (ledger.name.clone(), service.derived_balance(ledger_id)?),
            None => match staged.first() {
                Some(ledger) => (ledger.name.clone(), ledger.starting_balance),
                None => {
                    return Err(CheckwriterError::Batch(format!(
                        "unresolved ledger {}",
                        ledger_id
                    )))
                }
            },
        };

        let number = match item.kind {
            TransactionKind::Check => auto_number,
            TransactionKind::Deposit => None,
        };
        let (draft, _) =
            TransactionBuilder::build(item, ledger_id, &ledger_name, running, number)?;

        let unit = RenderUnit::Single(draft.face());
        let outcome = match self.printer.submit(&unit, print_mode).await {
            Ok(outcome) => outcome,
            Err(e) => PrintOutcome::failed(e.to_string()),
        };
        if !outcome.success {
            return Err(CheckwriterError::Print(outcome.error_message()));
        }

        let txn = draft.finalize();
        service.commit(staged, vec![txn.clone()])?;

        if let Some(learner) = &self.learner {
            if let (Some(code), Some(description)) = (&txn.gl_code, &txn.gl_description) {
                learner.observe(code, description);
            }
        }

        info!(payee = %txn.payee, amount = %txn.amount, "recorded {}", txn.kind);
        Ok(txn)
    }

    /// Record a deposit without any print step
    ///
    /// Deposits have no paper side effect, so the commit is unconditional.
    pub fn record_deposit(
        &self,
        ledger_name: &str,
        date: chrono::NaiveDate,
        description: &str,
        amount: Money,
        memo: &str,
    ) -> CheckwriterResult<Transaction> {
        let item = PendingItem::deposit(ledger_name, date, description, amount).with_memo(memo);
        TransactionBuilder::validate(&item)?;

        let known = self.storage.ledgers.get_all()?;
        let mut staged = Vec::new();
        let ledger_id =
            TransactionBuilder::resolve_ledger(&item.ledger_name, known.iter(), &mut staged)?;

        let service = LedgerService::new(&self.storage);
        let (name, running) = match known.iter().find(|l| l.id == ledger_id) {
            Some(ledger) => (ledger.name.clone(), service.derived_balance(ledger_id)?),
            None => match staged.first() {
                Some(ledger) => (ledger.name.clone(), ledger.starting_balance),
                None => {
                    return Err(CheckwriterError::Batch(format!(
                        "unresolved ledger {}",
                        ledger_id
                    )))
                }
            },
        };

        let (draft, _) = TransactionBuilder::build(&item, ledger_id, &name, running, None)?;
        let txn = draft.finalize();
        service.commit(staged, vec![txn.clone()])?;
        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CheckwriterPaths;
    use crate::print::{ConsolePrinter, PrintMode};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct FailingPrinter;

    #[async_trait]
    impl PrintAdapter for FailingPrinter {
        async fn submit(
            &self,
            _unit: &RenderUnit,
            _mode: &PrintMode,
        ) -> CheckwriterResult<PrintOutcome> {
            Ok(PrintOutcome::failed("device offline"))
        }
    }

    fn test_storage() -> (TempDir, Arc<Storage>) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckwriterPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, Arc::new(storage))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_record_commits_on_success() {
        let (_temp_dir, storage) = test_storage();
        LedgerService::new(&storage)
            .create("Operating", Money::from_cents(100000))
            .unwrap();

        let controller = SingleController::new(storage.clone(), Arc::new(ConsolePrinter::new()));
        let item = PendingItem::check("operating", date(), "Acme Co", Money::from_cents(10000));

        // Save to a file so the test stays quiet about real devices.
        let out = _temp_dir.path().join("check.txt");
        let mode = PrintMode::SavePdf { path: out };
        let txn = controller.record(&item, &mode, Some(2001)).await.unwrap();

        assert_eq!(txn.check_number, Some(2001));
        assert_eq!(txn.snapshot.previous_balance.cents(), 100000);
        assert_eq!(storage.transactions.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_failure_commits_nothing() {
        let (_temp_dir, storage) = test_storage();
        LedgerService::new(&storage)
            .create("Operating", Money::from_cents(100000))
            .unwrap();

        let controller = SingleController::new(storage.clone(), Arc::new(FailingPrinter));
        let item = PendingItem::check("Operating", date(), "Acme Co", Money::from_cents(10000));

        let err = controller
            .record(&item, &PrintMode::Interactive, Some(2001))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckwriterError::Print(_)));
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_stages_implicit_ledger() {
        let (_temp_dir, storage) = test_storage();
        let controller = SingleController::new(storage.clone(), Arc::new(ConsolePrinter::new()));

        let out = _temp_dir.path().join("check.txt");
        let mode = PrintMode::SavePdf { path: out };
        let item = PendingItem::check("Fresh Fund", date(), "Acme Co", Money::from_cents(100));
        controller.record(&item, &mode, None).await.unwrap();

        assert!(storage.ledgers.get_by_name("Fresh Fund").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_record_deposit_skips_print() {
        let (_temp_dir, storage) = test_storage();
        let ledger = LedgerService::new(&storage)
            .create("Operating", Money::from_cents(1000))
            .unwrap();

        // A printer that would fail any print attempt.
        let controller = SingleController::new(storage.clone(), Arc::new(FailingPrinter));
        let txn = controller
            .record_deposit("Operating", date(), "March rent", Money::from_cents(5000), "")
            .unwrap();

        assert_eq!(txn.check_number, None);
        assert_eq!(
            LedgerService::new(&storage)
                .derived_balance(ledger.id)
                .unwrap()
                .cents(),
            6000
        );
    }
}
