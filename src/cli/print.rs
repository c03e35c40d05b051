//! Print-check CLI command
//!
//! The single print-and-record path: one check, printed first, recorded
//! only after the adapter confirms success.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::config::{CheckwriterPaths, Settings};
use crate::error::CheckwriterResult;
use crate::models::PendingItem;
use crate::print::ConsolePrinter;
use crate::services::{SingleController, StoredGlLearner};
use crate::storage::Storage;

use super::{parse_amount_arg, parse_date_arg, resolve_print_mode};

/// Arguments for printing a single check
#[derive(Args)]
pub struct PrintCheckArgs {
    /// Ledger name (created implicitly if unknown)
    pub ledger: String,
    /// Payee
    pub payee: String,
    /// Amount (e.g., "125.00")
    pub amount: String,
    /// Check date (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Memo line
    #[arg(short, long, default_value = "")]
    pub memo: String,
    /// Explicit check number (skips the auto-number cursor)
    #[arg(short, long)]
    pub number: Option<u32>,
    /// GL code
    #[arg(long)]
    pub gl_code: Option<String>,
    /// GL description
    #[arg(long)]
    pub gl_description: Option<String>,
    /// Render to a file instead of printing
    #[arg(long, value_name = "PATH")]
    pub save_pdf: Option<PathBuf>,
    /// Print straight to a named device without a dialog
    #[arg(long, value_name = "DEVICE")]
    pub silent: Option<String>,
}

/// Handle the print-check command
pub async fn handle_print_check(
    storage: Arc<Storage>,
    paths: &CheckwriterPaths,
    settings: &mut Settings,
    args: PrintCheckArgs,
) -> CheckwriterResult<()> {
    let amount = parse_amount_arg(&args.amount)?;
    let date = parse_date_arg(args.date.as_deref())?;

    let mut item = PendingItem::check(args.ledger.as_str(), date, args.payee.as_str(), amount)
        .with_memo(args.memo.as_str());
    item.check_number = args.number;
    item.profile = Some(settings.profile.clone());
    if let (Some(code), Some(description)) = (&args.gl_code, &args.gl_description) {
        item = item.with_gl(code.as_str(), description.as_str());
    } else {
        item.gl_code = args.gl_code.clone();
    }

    let print_mode = resolve_print_mode(args.save_pdf, args.silent, settings);
    let auto_number = (settings.auto_number && args.number.is_none())
        .then_some(settings.next_check_number);

    let learner = Arc::new(StoredGlLearner::new(storage.clone()));
    let controller = SingleController::new(storage, Arc::new(ConsolePrinter::new()))
        .with_learner(learner);

    let txn = controller.record(&item, &print_mode, auto_number).await?;

    println!("Printed and recorded check to {}: {}", txn.payee, txn.amount);
    if let Some(number) = txn.check_number {
        println!("  Check number: {}", number);
    }
    println!("  Balance: {} -> {}", txn.snapshot.previous_balance, txn.snapshot.new_balance);
    println!("  ID: {}", txn.id);

    // Advance the cursor only when this check consumed it.
    if auto_number.is_some() && txn.check_number == auto_number {
        settings.next_check_number += 1;
        settings.save(paths)?;
    }

    Ok(())
}
