//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Each submodule
//! owns one command family; shared argument parsing helpers live here.

pub mod batch;
pub mod ledger;
pub mod print;
pub mod transaction;

pub use batch::{handle_batch_command, BatchArgs};
pub use ledger::{handle_ledger_command, LedgerCommands};
pub use print::{handle_print_check, PrintCheckArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{CheckwriterError, CheckwriterResult};
use crate::models::Money;
use crate::print::PrintMode;

/// Parse a date argument, defaulting to today
pub(crate) fn parse_date_arg(date: Option<&str>) -> CheckwriterResult<NaiveDate> {
    match date {
        None => Ok(chrono::Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            CheckwriterError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD.", raw))
        }),
    }
}

/// Parse an amount argument
pub(crate) fn parse_amount_arg(amount: &str) -> CheckwriterResult<Money> {
    Money::parse(amount).map_err(|e| {
        CheckwriterError::Validation(format!(
            "Invalid amount: '{}'. Use format like '125.00' or '125'. Error: {}",
            amount, e
        ))
    })
}

/// Pick the print mode from command-line flags, falling back to settings
pub(crate) fn resolve_print_mode(
    save_pdf: Option<PathBuf>,
    silent: Option<String>,
    settings: &Settings,
) -> PrintMode {
    if let Some(path) = save_pdf {
        PrintMode::SavePdf { path }
    } else if let Some(device) = silent {
        PrintMode::Silent { device }
    } else {
        settings.print_mode.clone()
    }
}
