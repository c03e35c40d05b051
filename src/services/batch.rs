//! Batch print-and-record pipeline
//!
//! Processes a queue of pending items as a sequence of commit units: one
//! check per unit in standard mode, up to three checks per physical sheet
//! in three-up mode. Each unit is printed first and recorded only after
//! the adapter confirms success; a failed unit is reverted whole, so the
//! transaction log never contains a record whose paper never printed.
//!
//! Within a run, balances chain through an in-memory working set so a
//! later item sees the effect of an earlier confirmed unit without any
//! intermediate disk write; the store is appended to once, at the end.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CommitMode;
use crate::error::{CheckwriterError, CheckwriterResult};
use crate::models::{
    Ledger, LedgerId, Money, PendingItem, SheetSlot, Transaction, TransactionKind,
};
use crate::print::{
    ConfirmationOracle, FailureContext, FailureDecision, PrintAdapter, PrintMode, PrintOutcome,
    RenderUnit,
};
use crate::storage::Storage;

use super::builder::{TransactionBuilder, TransactionDraft};
use super::gl::GlCodeLearner;
use super::ledger::LedgerService;

/// Per-run options
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Commit granularity: per check or per sheet
    pub mode: CommitMode,
    /// Whether the run assigns check numbers from the cursor
    pub auto_number: bool,
    /// First number the cursor will assign
    pub start_number: u32,
    /// How the adapter should deliver each unit
    pub print_mode: PrintMode,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: CommitMode::Standard,
            auto_number: true,
            start_number: 1001,
            print_mode: PrintMode::Interactive,
        }
    }
}

/// Live counters published while a batch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchProgress {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchProgress {
    fn new(total: usize) -> Self {
        Self {
            processed: 0,
            failed: 0,
            total,
        }
    }
}

/// Final accounting for a finished batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Items committed
    pub processed: usize,
    /// Items in units that printed unsuccessfully
    pub failed: usize,
    /// Items the batch was started with
    pub total: usize,
    /// Whether the run stopped early (abort decision or cancellation)
    pub cancelled: bool,
    /// Where the auto-number cursor landed, when auto-numbering was on
    pub next_check_number: Option<u32>,
}

/// Clonable cancellation trigger for a running batch
#[derive(Clone)]
pub struct BatchCanceller(Arc<AtomicBool>);

impl BatchCanceller {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Handle to a running batch
pub struct BatchHandle {
    cancelled: Arc<AtomicBool>,
    progress: watch::Receiver<BatchProgress>,
    task: JoinHandle<CheckwriterResult<BatchSummary>>,
}

impl BatchHandle {
    /// Request cancellation; honored at the next unit boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// A trigger that can cancel the batch from another task
    pub fn canceller(&self) -> BatchCanceller {
        BatchCanceller(self.cancelled.clone())
    }

    /// Subscribe to progress updates
    pub fn progress(&self) -> watch::Receiver<BatchProgress> {
        self.progress.clone()
    }

    /// Wait for the batch to finish
    pub async fn result(self) -> CheckwriterResult<BatchSummary> {
        self.task
            .await
            .map_err(|e| CheckwriterError::Batch(format!("batch task failed: {}", e)))?
    }
}

/// Working set accumulated across confirmed units
struct RunState {
    /// Ledgers loaded from the store at the start of the run
    known: Vec<Ledger>,
    /// Implicit ledgers staged by confirmed units
    staged: Vec<Ledger>,
    /// Working balance per ledger touched so far
    balances: HashMap<LedgerId, Money>,
    /// Finalized transactions from confirmed units
    committed: Vec<Transaction>,
    processed: usize,
    failed: usize,
    /// Next auto-assigned check number
    cursor: u32,
}

/// Drives batches of pending items through print-then-record
#[derive(Clone)]
pub struct BatchController {
    storage: Arc<Storage>,
    printer: Arc<dyn PrintAdapter>,
    oracle: Arc<dyn ConfirmationOracle>,
    learner: Option<Arc<dyn GlCodeLearner>>,
}

impl BatchController {
    pub fn new(
        storage: Arc<Storage>,
        printer: Arc<dyn PrintAdapter>,
        oracle: Arc<dyn ConfirmationOracle>,
    ) -> Self {
        Self {
            storage,
            printer,
            oracle,
            learner: None,
        }
    }

    /// Attach a GL code learner, fed after a successful final commit
    pub fn with_learner(mut self, learner: Arc<dyn GlCodeLearner>) -> Self {
        self.learner = Some(learner);
        self
    }

    /// Start processing a queue on a background task
    pub fn enqueue(&self, items: Vec<PendingItem>, options: BatchOptions) -> BatchHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, rx) = watch::channel(BatchProgress::new(items.len()));

        let controller = self.clone();
        let flag = cancelled.clone();
        let task = tokio::spawn(async move { controller.run(items, options, flag, tx).await });

        BatchHandle {
            cancelled,
            progress: rx,
            task,
        }
    }

    async fn run(
        self,
        items: Vec<PendingItem>,
        options: BatchOptions,
        cancelled: Arc<AtomicBool>,
        progress: watch::Sender<BatchProgress>,
    ) -> CheckwriterResult<BatchSummary> {
        let total = items.len();
        info!(total, mode = ?options.mode, "starting batch");

        let mut state = RunState {
            known: self.storage.ledgers.get_all()?,
            staged: Vec::new(),
            balances: HashMap::new(),
            committed: Vec::new(),
            processed: 0,
            failed: 0,
            cursor: options.start_number,
        };

        // The loop result is held until after the merge: units already
        // confirmed printed must reach the log even when a later storage
        // read fails mid-run.
        let loop_result = self
            .process_units(&items, &options, &cancelled, &progress, &mut state)
            .await;

        self.finish_run(state, loop_result, options.auto_number, total)
    }

    /// Assemble, print, and tentatively commit units until the queue is
    /// exhausted, the run is cancelled, or the operator aborts
    ///
    /// Returns whether the run stopped early.
    async fn process_units(
        &self,
        items: &[PendingItem],
        options: &BatchOptions,
        cancelled: &AtomicBool,
        progress: &watch::Sender<BatchProgress>,
        state: &mut RunState,
    ) -> CheckwriterResult<bool> {
        let total = items.len();
        let unit_size = match options.mode {
            CommitMode::Standard => 1,
            CommitMode::ThreeUp => 3,
        };

        let mut idx = 0;
        let mut stopped_early = false;

        while idx < total {
            if cancelled.load(Ordering::SeqCst) {
                info!(remaining = total - idx, "batch cancelled");
                stopped_early = true;
                break;
            }

            // Assemble one unit from the next valid items. Items that fail
            // validation are consumed without consuming a check number,
            // touching a balance, or counting as failed.
            let mut unit_staged: Vec<Ledger> = Vec::new();
            let mut unit_balances: HashMap<LedgerId, Money> = HashMap::new();
            let mut drafts: Vec<TransactionDraft> = Vec::new();
            let mut auto_assigned: u32 = 0;

            while drafts.len() < unit_size && idx < total {
                let item = &items[idx];
                idx += 1;

                if let Err(e) = TransactionBuilder::validate(item) {
                    debug!(payee = %item.payee, error = %e, "skipping invalid item");
                    continue;
                }

                let ledger_id = TransactionBuilder::resolve_ledger(
                    &item.ledger_name,
                    state.known.iter().chain(state.staged.iter()),
                    &mut unit_staged,
                )?;
                let ledger = Self::working_ledger(&state, &unit_staged, ledger_id)
                    .ok_or_else(|| {
                        CheckwriterError::Batch(format!("unresolved ledger {}", ledger_id))
                    })?
                    .clone();

                let running = if let Some(balance) = unit_balances.get(&ledger_id) {
                    *balance
                } else if let Some(balance) = state.balances.get(&ledger_id) {
                    *balance
                } else if state.known.iter().any(|l| l.id == ledger_id) {
                    let transactions = self.storage.transactions.get_by_ledger(ledger_id)?;
                    let delta: Money = transactions.iter().map(|t| t.signed_amount()).sum();
                    ledger.starting_balance + delta
                } else {
                    ledger.starting_balance
                };

                let uses_cursor = options.auto_number
                    && item.kind == TransactionKind::Check
                    && item.check_number.is_none();
                let number = if uses_cursor {
                    Some(state.cursor + auto_assigned)
                } else {
                    None
                };

                let (mut draft, new_balance) =
                    TransactionBuilder::build(item, ledger_id, &ledger.name, running, number)?;
                if uses_cursor {
                    auto_assigned += 1;
                }
                if options.mode == CommitMode::ThreeUp {
                    draft.sheet_slot = SheetSlot::from_index(drafts.len());
                }

                unit_balances.insert(ledger_id, new_balance);
                drafts.push(draft);
            }

            // A window of invalid items produces no unit and no print call.
            if drafts.is_empty() {
                continue;
            }

            let faces: Vec<_> = drafts.iter().map(|d| d.face()).collect();
            let unit = match options.mode {
                CommitMode::ThreeUp => RenderUnit::Sheet(faces),
                CommitMode::Standard => match faces.into_iter().next() {
                    Some(face) => RenderUnit::Single(face),
                    None => continue,
                },
            };

            debug!(label = %unit.label(), "printing unit");
            let outcome = match self.printer.submit(&unit, &options.print_mode).await {
                Ok(outcome) => outcome,
                Err(e) => PrintOutcome::failed(e.to_string()),
            };

            if outcome.success {
                // Fold the unit's tentative effects into the run state.
                state.staged.append(&mut unit_staged);
                for (id, balance) in unit_balances {
                    state.balances.insert(id, balance);
                }
                state.processed += drafts.len();
                state.cursor += auto_assigned;
                for draft in drafts {
                    state.committed.push(draft.finalize());
                }
            } else {
                // Revert the unit whole: balances, staged ledgers, and any
                // auto-assigned numbers are dropped, so the next unit (if
                // the run continues) sees the pre-unit state.
                let error = outcome.error_message();
                warn!(label = %unit.label(), error = %error, "print failed");
                state.failed += drafts.len();

                let context = FailureContext {
                    label: unit.label(),
                    error,
                };
                if self.oracle.ask_continue_or_abort(&context).await == FailureDecision::Abort {
                    cancelled.store(true, Ordering::SeqCst);
                    stopped_early = true;
                    let _ = progress.send(BatchProgress {
                        processed: state.processed,
                        failed: state.failed,
                        total,
                    });
                    break;
                }
            }

            let _ = progress.send(BatchProgress {
                processed: state.processed,
                failed: state.failed,
                total,
            });
        }

        Ok(stopped_early)
    }

    /// One append of everything confirmed so far, whether the run
    /// completed, was cancelled, aborted, or stopped with an error
    fn finish_run(
        &self,
        state: RunState,
        loop_result: CheckwriterResult<bool>,
        auto_number: bool,
        total: usize,
    ) -> CheckwriterResult<BatchSummary> {
        let gl_pairs: Vec<(String, String)> = state
            .committed
            .iter()
            .filter_map(|t| match (&t.gl_code, &t.gl_description) {
                (Some(code), Some(description)) => Some((code.clone(), description.clone())),
                _ => None,
            })
            .collect();

        let processed = state.processed;
        let failed = state.failed;
        let cursor = state.cursor;

        let merged = LedgerService::new(&self.storage).commit(state.staged, state.committed);
        if merged.is_ok() {
            if let Some(learner) = &self.learner {
                for (code, description) in &gl_pairs {
                    learner.observe(code, description);
                }
            }
        }

        let stopped_early = match (loop_result, merged) {
            (Ok(stopped_early), Ok(())) => stopped_early,
            (Ok(_), Err(merge_err)) => return Err(merge_err),
            (Err(loop_err), merged) => {
                if let Err(merge_err) = merged {
                    warn!(error = %merge_err, "failed to merge confirmed units");
                }
                return Err(loop_err);
            }
        };

        let summary = BatchSummary {
            processed,
            failed,
            total,
            cancelled: stopped_early,
            next_check_number: auto_number.then_some(cursor),
        };
        info!(
            processed = summary.processed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "batch finished"
        );
        Ok(summary)
    }

    fn working_ledger<'b>(
        state: &'b RunState,
        unit_staged: &'b [Ledger],
        id: LedgerId,
    ) -> Option<&'b Ledger> {
        state
            .known
            .iter()
            .chain(state.staged.iter())
            .chain(unit_staged.iter())
            .find(|l| l.id == id)
    }
}
