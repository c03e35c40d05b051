//! Print boundary
//!
//! The core never performs the physical print itself. It hands a
//! [`RenderUnit`] to a [`PrintAdapter`] and waits for the outcome; printing
//! is the one irreversible side effect, so the ledger is only appended to
//! after the adapter confirms success. When a unit fails, the
//! [`ConfirmationOracle`] decides whether the batch continues or aborts.

pub mod console;
pub mod render;

pub use console::{ConsoleOracle, ConsolePrinter};
pub use render::{CheckFace, RenderUnit};

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CheckwriterResult;

/// How the adapter should deliver the print job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum PrintMode {
    /// Show the platform print dialog
    #[default]
    Interactive,
    /// Print straight to a named device without a dialog
    Silent { device: String },
    /// Render to a PDF file at the given path
    SavePdf { path: PathBuf },
}

/// Result of one print attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl PrintOutcome {
    /// A successful print
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed print with an error message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// The error message, or a generic fallback
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "print failed".to_string())
    }
}

/// The external print/PDF side effect
///
/// Implementations are expected to be opaque async operations; the core
/// only looks at the returned outcome. An `Err` from the adapter is
/// treated the same as a failed outcome.
#[async_trait]
pub trait PrintAdapter: Send + Sync {
    async fn submit(&self, unit: &RenderUnit, mode: &PrintMode) -> CheckwriterResult<PrintOutcome>;
}

/// Context handed to the oracle when a print unit fails
#[derive(Debug, Clone)]
pub struct FailureContext {
    /// What failed: a payee for a single check, a sheet description for
    /// three-up
    pub label: String,
    /// The adapter's error message
    pub error: String,
}

/// The user's decision after a print failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDecision {
    /// Skip this unit and keep going
    Continue,
    /// Stop the batch; prior successful units stay committed
    Abort,
}

/// Asks the user whether to continue or abort after a failed print unit
#[async_trait]
pub trait ConfirmationOracle: Send + Sync {
    async fn ask_continue_or_abort(&self, context: &FailureContext) -> FailureDecision;
}
