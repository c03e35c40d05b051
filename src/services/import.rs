//! Batch queue loading
//!
//! Reads a queue of pending items from a CSV file. Loading is tolerant:
//! rows that cannot be parsed are reported per-row and the rest of the
//! file still loads, mirroring how the batch pipeline itself skips
//! invalid items.
//!
//! Expected columns: `kind,ledger,date,payee,amount` with optional
//! `memo`, `check_number`, `gl_code`, and `gl_description`.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::error::{CheckwriterError, CheckwriterResult};
use crate::models::{Money, PendingItem, TransactionKind};

/// One unparseable row
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line number in the file (line 1 is the header)
    pub line: usize,
    pub message: String,
}

/// Result of loading a queue file
#[derive(Debug, Default)]
pub struct QueueLoadResult {
    pub items: Vec<PendingItem>,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    kind: String,
    ledger: String,
    date: String,
    payee: String,
    amount: String,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    check_number: Option<String>,
    #[serde(default)]
    gl_code: Option<String>,
    #[serde(default)]
    gl_description: Option<String>,
}

/// Loads pending-item queues from CSV files
pub struct QueueLoader;

impl QueueLoader {
    /// Load a queue file from disk
    pub fn from_path(path: &Path) -> CheckwriterResult<QueueLoadResult> {
        let file = std::fs::File::open(path).map_err(|e| {
            CheckwriterError::Import(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Load a queue from any reader
    pub fn from_reader<R: Read>(reader: R) -> CheckwriterResult<QueueLoadResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut result = QueueLoadResult::default();
        for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
            let line = index + 2;
            match record {
                Ok(row) => match Self::parse_row(row) {
                    Ok(item) => result.items.push(item),
                    Err(message) => {
                        warn!(line, error = %message, "skipping queue row");
                        result.errors.push(RowError { line, message });
                    }
                },
                Err(e) => {
                    let message = e.to_string();
                    warn!(line, error = %message, "skipping malformed queue row");
                    result.errors.push(RowError { line, message });
                }
            }
        }
        Ok(result)
    }

    fn parse_row(row: RawRow) -> Result<PendingItem, String> {
        let kind = match row.kind.to_lowercase().as_str() {
            "check" | "chk" => TransactionKind::Check,
            "deposit" | "dep" => TransactionKind::Deposit,
            other => return Err(format!("unknown kind: {}", other)),
        };

        let date = Self::parse_date(&row.date)?;
        let amount = Money::parse(&row.amount).map_err(|e| e.to_string())?;

        let check_number = match row.check_number.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| format!("bad check number: {}", raw))?,
            ),
        };

        let mut item = match kind {
            TransactionKind::Check => PendingItem::check(row.ledger, date, row.payee, amount),
            TransactionKind::Deposit => PendingItem::deposit(row.ledger, date, row.payee, amount),
        };
        item.memo = row.memo.unwrap_or_default();
        item.check_number = check_number;
        item.gl_code = row.gl_code.filter(|s| !s.is_empty());
        item.gl_description = row.gl_description.filter(|s| !s.is_empty());
        Ok(item)
    }

    fn parse_date(raw: &str) -> Result<NaiveDate, String> {
        for format in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Ok(date);
            }
        }
        Err(format!("unrecognized date: {}", raw))
    }
}
