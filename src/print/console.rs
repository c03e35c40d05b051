//! Console implementations of the print boundary
//!
//! These make the binary usable end to end without real device adapters:
//! the printer renders check faces as text to stdout (or to a file for the
//! save-pdf mode), and the oracle prompts on the terminal.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::error::{CheckwriterError, CheckwriterResult};

use super::render::RenderUnit;
use super::{ConfirmationOracle, FailureContext, FailureDecision, PrintAdapter, PrintMode, PrintOutcome};

/// Text renderer standing in for a physical printer
pub struct ConsolePrinter;

impl ConsolePrinter {
    pub fn new() -> Self {
        Self
    }

    fn render_text(unit: &RenderUnit) -> String {
        let mut out = String::new();
        for face in unit.faces() {
            out.push_str(&"-".repeat(60));
            out.push('\n');
            if let Some(number) = face.check_number {
                out.push_str(&format!("{:>60}\n", format!("No. {}", number)));
            }
            out.push_str(&format!("{:>60}\n", face.date.format("%B %-d, %Y")));
            out.push_str(&format!("PAY TO THE ORDER OF  {:<30} {}\n", face.payee, face.amount));
            out.push_str(&format!("  {} dollars\n", face.amount_words));
            if !face.memo.is_empty() {
                out.push_str(&format!("MEMO  {}\n", face.memo));
            }
            out.push_str(&format!("LEDGER  {}\n", face.ledger_name));
        }
        out.push_str(&"-".repeat(60));
        out.push('\n');
        out
    }
}

impl Default for ConsolePrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrintAdapter for ConsolePrinter {
    async fn submit(&self, unit: &RenderUnit, mode: &PrintMode) -> CheckwriterResult<PrintOutcome> {
        let text = Self::render_text(unit);

        match mode {
            PrintMode::Interactive => {
                println!("{}", text);
                Ok(PrintOutcome::ok())
            }
            PrintMode::Silent { device } => {
                info!(device = %device, faces = unit.len(), "submitting silently");
                println!("{}", text);
                Ok(PrintOutcome::ok())
            }
            PrintMode::SavePdf { path } => match write_to_file(path, &text) {
                Ok(()) => Ok(PrintOutcome::ok()),
                Err(e) => Ok(PrintOutcome::failed(e.to_string())),
            },
        }
    }
}

fn write_to_file(path: &Path, text: &str) -> CheckwriterResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(CheckwriterError::Print(format!(
                "output directory does not exist: {}",
                parent.display()
            )));
        }
    }
    std::fs::write(path, text)
        .map_err(|e| CheckwriterError::Print(format!("failed to write {}: {}", path.display(), e)))
}

/// Terminal prompt asking continue-or-abort after a failed unit
pub struct ConsoleOracle;

impl ConsoleOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationOracle for ConsoleOracle {
    async fn ask_continue_or_abort(&self, context: &FailureContext) -> FailureDecision {
        eprintln!("Print failed for {}: {}", context.label, context.error);
        eprint!("[c]ontinue with the rest of the batch, or [a]bort? ");

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        if reader.read_line(&mut line).await.is_err() {
            return FailureDecision::Abort;
        }

        match line.trim().to_lowercase().as_str() {
            "a" | "abort" => FailureDecision::Abort,
            _ => FailureDecision::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionKind};
    use crate::print::render::CheckFace;
    use chrono::NaiveDate;

    fn sample_unit() -> RenderUnit {
        RenderUnit::Single(CheckFace {
            kind: TransactionKind::Check,
            slot: None,
            check_number: Some(2001),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            payee: "Acme Co".to_string(),
            amount: Money::from_cents(12500),
            amount_words: Money::from_cents(12500).to_written_words(),
            memo: "invoice 42".to_string(),
            ledger_name: "Operating".to_string(),
        })
    }

    #[test]
    fn test_render_text_contains_fields() {
        let text = ConsolePrinter::render_text(&sample_unit());
        assert!(text.contains("No. 2001"));
        assert!(text.contains("Acme Co"));
        assert!(text.contains("$125.00"));
        assert!(text.contains("one hundred twenty-five and 00/100"));
        assert!(text.contains("invoice 42"));
    }

    #[tokio::test]
    async fn test_save_pdf_to_bad_path_fails_not_errs() {
        let printer = ConsolePrinter::new();
        let mode = PrintMode::SavePdf {
            path: "/nonexistent-dir/checks.pdf".into(),
        };
        let outcome = printer.submit(&sample_unit(), &mode).await.unwrap();
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_save_pdf_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("checks.txt");
        let printer = ConsolePrinter::new();
        let mode = PrintMode::SavePdf { path: path.clone() };

        let outcome = printer.submit(&sample_unit(), &mode).await.unwrap();
        assert!(outcome.success);
        assert!(std::fs::read_to_string(path).unwrap().contains("Acme Co"));
    }
}
