//! Ledger CLI commands

use clap::Subcommand;

use crate::error::{CheckwriterError, CheckwriterResult};
use crate::services::LedgerService;
use crate::storage::Storage;

use super::parse_amount_arg;

/// Ledger subcommands
#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Create a new ledger
    Create {
        /// Ledger name
        name: String,
        /// Starting balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },
    /// List all ledgers with derived balances
    List,
    /// Show a ledger and its recent transactions
    Show {
        /// Ledger name or ID
        ledger: String,
        /// Number of transactions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Set a ledger's starting balance
    SetBalance {
        /// Ledger name or ID
        ledger: String,
        /// New starting balance
        balance: String,
    },
    /// Delete a ledger and all its transactions
    Delete {
        /// Ledger name or ID
        ledger: String,
        /// Delete even when the ledger has transactions
        #[arg(long)]
        force: bool,
    },
}

/// Handle a ledger command
pub fn handle_ledger_command(storage: &Storage, cmd: LedgerCommands) -> CheckwriterResult<()> {
    let service = LedgerService::new(storage);

    match cmd {
        LedgerCommands::Create { name, balance } => {
            let starting_balance = parse_amount_arg(&balance)?;
            let ledger = service.create(&name, starting_balance)?;

            println!("Created ledger: {}", ledger.name);
            println!("  Starting balance: {}", ledger.starting_balance);
            println!("  ID: {}", ledger.id);
        }

        LedgerCommands::List => {
            let summaries = service.list()?;
            if summaries.is_empty() {
                println!("No ledgers yet. Create one with 'checkwriter ledger create <name>'.");
                return Ok(());
            }

            println!("{:<30} {:>14} {:>8}", "LEDGER", "BALANCE", "TXNS");
            for summary in &summaries {
                println!(
                    "{:<30} {:>14} {:>8}",
                    summary.ledger.name,
                    summary.balance.to_string(),
                    summary.transaction_count
                );
            }
        }

        LedgerCommands::Show { ledger, limit } => {
            let found = service.find(&ledger)?;
            let balance = service.derived_balance(found.id)?;
            let transactions = storage.transactions.get_by_ledger(found.id)?;

            println!("Ledger: {}", found.name);
            println!("  ID: {}", found.id);
            println!("  Starting balance: {}", found.starting_balance);
            println!("  Current balance:  {}", balance);
            println!("  Transactions: {}", transactions.len());
            if !found.notes.is_empty() {
                println!("  Notes: {}", found.notes);
            }

            if !transactions.is_empty() {
                println!();
                println!(
                    "{:<12} {:<8} {:<8} {:<25} {:>12} {:>14}",
                    "DATE", "KIND", "NO.", "PAYEE", "AMOUNT", "BALANCE"
                );
                for txn in transactions.iter().rev().take(limit) {
                    println!(
                        "{:<12} {:<8} {:<8} {:<25} {:>12} {:>14}",
                        txn.date.format("%Y-%m-%d").to_string(),
                        txn.kind.to_string(),
                        txn.check_number
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "-".into()),
                        txn.payee,
                        txn.signed_amount().to_string(),
                        txn.balance_after.to_string()
                    );
                }
            }
        }

        LedgerCommands::SetBalance { ledger, balance } => {
            let found = service.find(&ledger)?;
            let starting_balance = parse_amount_arg(&balance)?;
            let updated = service.set_starting_balance(found.id, starting_balance)?;
            let derived = service.derived_balance(updated.id)?;

            println!("Updated ledger: {}", updated.name);
            println!("  Starting balance: {}", updated.starting_balance);
            println!("  Current balance:  {}", derived);
        }

        LedgerCommands::Delete { ledger, force } => {
            let found = service.find(&ledger)?;
            let transactions = storage.transactions.get_by_ledger(found.id)?;

            if !transactions.is_empty() && !force {
                return Err(CheckwriterError::Validation(format!(
                    "Ledger '{}' has {} transactions. Use --force to delete them too.",
                    found.name,
                    transactions.len()
                )));
            }

            let (removed, cascade) = service.delete_ledger(found.id)?;
            println!("Deleted ledger: {} ({} transactions)", removed.name, cascade);
        }
    }

    Ok(())
}
