//! Transaction CLI commands
//!
//! Register listing, deposits (which have no print step), and deletion.

use std::sync::Arc;

use clap::Subcommand;

use crate::error::CheckwriterResult;
use crate::print::ConsolePrinter;
use crate::services::{LedgerService, SingleController};
use crate::storage::Storage;

use super::{parse_amount_arg, parse_date_arg};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        /// Filter by ledger name or ID
        #[arg(short, long)]
        ledger: Option<String>,
        /// Number of transactions to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Record a deposit
    Deposit {
        /// Ledger name (created implicitly if unknown)
        ledger: String,
        /// Amount (e.g., "1500.00")
        amount: String,
        /// Deposit description
        description: String,
        /// Transaction date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Memo
        #[arg(short, long, default_value = "")]
        memo: String,
    },
    /// Delete a transaction, restoring the ledger's derived balance
    Delete {
        /// Transaction ID (full UUID or the short form shown in listings)
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Arc<Storage>,
    cmd: TransactionCommands,
) -> CheckwriterResult<()> {
    let service = LedgerService::new(storage);

    match cmd {
        TransactionCommands::List { ledger, limit } => {
            let transactions = match ledger {
                Some(name) => {
                    let found = service.find(&name)?;
                    let mut txns = storage.transactions.get_by_ledger(found.id)?;
                    txns.reverse();
                    txns
                }
                None => storage.transactions.get_all()?,
            };

            if transactions.is_empty() {
                println!("No transactions recorded.");
                return Ok(());
            }

            println!(
                "{:<12} {:<12} {:<8} {:<8} {:<25} {:>12}",
                "ID", "DATE", "KIND", "NO.", "PAYEE", "AMOUNT"
            );
            for txn in transactions.iter().take(limit) {
                println!(
                    "{:<12} {:<12} {:<8} {:<8} {:<25} {:>12}",
                    txn.id.to_string(),
                    txn.date.format("%Y-%m-%d").to_string(),
                    txn.kind.to_string(),
                    txn.check_number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".into()),
                    txn.payee,
                    txn.signed_amount().to_string()
                );
            }
        }

        TransactionCommands::Deposit {
            ledger,
            amount,
            description,
            date,
            memo,
        } => {
            let amount = parse_amount_arg(&amount)?;
            let date = parse_date_arg(date.as_deref())?;

            let controller = SingleController::new(storage.clone(), Arc::new(ConsolePrinter::new()));
            let txn = controller.record_deposit(&ledger, date, &description, amount, &memo)?;

            println!("Recorded deposit: {} {}", txn.payee, txn.amount);
            println!("  Balance: {} -> {}", txn.snapshot.previous_balance, txn.snapshot.new_balance);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::Delete { id } => {
            let found = service.find_transaction(&id)?;
            let removed = service.delete_transaction(found.id)?;
            let balance = service.derived_balance(removed.ledger_id)?;

            println!("Deleted {}: {} {}", removed.kind, removed.payee, removed.amount);
            println!("  Ledger balance is now {}", balance);
        }
    }

    Ok(())
}
