//! Batch CLI command
//!
//! Loads a queue file and runs it through the batch print-and-record
//! pipeline. Ctrl-C requests cancellation, which is honored at the next
//! unit boundary; everything already confirmed stays committed.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::warn;

use crate::config::{CheckwriterPaths, CommitMode, Settings};
use crate::error::{CheckwriterError, CheckwriterResult};
use crate::print::{ConsoleOracle, ConsolePrinter};
use crate::services::{BatchController, BatchOptions, QueueLoader, StoredGlLearner};
use crate::storage::Storage;

use super::resolve_print_mode;

/// Arguments for running a batch queue
#[derive(Args)]
pub struct BatchArgs {
    /// Queue file (CSV: kind,ledger,date,payee,amount[,memo,check_number,...])
    pub file: PathBuf,
    /// Commit per three-check sheet instead of per check
    #[arg(long)]
    pub three_up: bool,
    /// First check number for this run (default: the saved cursor)
    #[arg(long)]
    pub start_number: Option<u32>,
    /// Leave checks unnumbered unless the queue gives explicit numbers
    #[arg(long)]
    pub no_auto_number: bool,
    /// Render to a file instead of printing
    #[arg(long, value_name = "PATH")]
    pub save_pdf: Option<PathBuf>,
    /// Print straight to a named device without a dialog
    #[arg(long, value_name = "DEVICE")]
    pub silent: Option<String>,
}

/// Handle the batch command
pub async fn handle_batch_command(
    storage: Arc<Storage>,
    paths: &CheckwriterPaths,
    settings: &mut Settings,
    args: BatchArgs,
) -> CheckwriterResult<()> {
    let loaded = QueueLoader::from_path(&args.file)?;
    for error in &loaded.errors {
        eprintln!("  line {}: {}", error.line, error.message);
    }
    if loaded.items.is_empty() {
        return Err(CheckwriterError::Import(format!(
            "No usable items in {}",
            args.file.display()
        )));
    }
    println!(
        "Loaded {} items from {} ({} rows skipped)",
        loaded.items.len(),
        args.file.display(),
        loaded.errors.len()
    );

    let mode = if args.three_up {
        CommitMode::ThreeUp
    } else {
        settings.commit_mode
    };
    let auto_number = settings.auto_number && !args.no_auto_number;
    let options = BatchOptions {
        mode,
        auto_number,
        start_number: args.start_number.unwrap_or(settings.next_check_number),
        print_mode: resolve_print_mode(args.save_pdf, args.silent, settings),
    };

    let learner = Arc::new(StoredGlLearner::new(storage.clone()));
    let controller = BatchController::new(
        storage,
        Arc::new(ConsolePrinter::new()),
        Arc::new(ConsoleOracle::new()),
    )
    .with_learner(learner);

    let handle = controller.enqueue(loaded.items, options);

    let canceller = handle.canceller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancellation requested; finishing the current unit...");
            canceller.cancel();
        }
    });

    let mut progress = handle.progress();
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let p = *progress.borrow();
            eprintln!("  {}/{} processed, {} failed", p.processed, p.total, p.failed);
        }
    });

    let summary = handle.result().await?;

    println!();
    println!("Batch finished:");
    println!("  Processed: {}", summary.processed);
    println!("  Failed:    {}", summary.failed);
    if summary.cancelled {
        println!("  Stopped early; committed units are recorded.");
    }

    if let Some(next) = summary.next_check_number {
        if next != settings.next_check_number {
            settings.next_check_number = next;
            if let Err(e) = settings.save(paths) {
                warn!(error = %e, "failed to persist check-number cursor");
            }
        }
        println!("  Next check number: {}", next);
    }

    Ok(())
}
