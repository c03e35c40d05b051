//! Ledger model
//!
//! A ledger is a named account with an admin-settable starting balance.
//! Its current balance is never stored; it is derived on demand from the
//! starting balance plus the signed sum of its transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::LedgerId;
use super::money::Money;

/// A named account that checks and deposits are recorded against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Unique identifier
    pub id: LedgerId,

    /// Ledger name (case-insensitive-unique by convention)
    pub name: String,

    /// Baseline the derived balance folds from
    pub starting_balance: Money,

    /// Notes about this ledger
    #[serde(default)]
    pub notes: String,

    /// When the ledger was created
    pub created_at: DateTime<Utc>,

    /// When the ledger was last modified
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    /// Create a new ledger with a zero starting balance
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: LedgerId::new(),
            name: name.into(),
            starting_balance: Money::zero(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new ledger with a starting balance
    pub fn with_starting_balance(name: impl Into<String>, starting_balance: Money) -> Self {
        let mut ledger = Self::new(name);
        ledger.starting_balance = starting_balance;
        ledger
    }

    /// Case-insensitive name comparison used for ledger resolution
    ///
    /// Both sides are trimmed once; internal whitespace is significant, so
    /// names differing only in internal spacing are distinct ledgers.
    pub fn name_matches(&self, candidate: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(candidate.trim())
    }

    /// Validate the ledger
    pub fn validate(&self) -> Result<(), LedgerValidationError> {
        if self.name.trim().is_empty() {
            return Err(LedgerValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(LedgerValidationError::NameTooLong(self.name.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for ledgers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for LedgerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Ledger name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Ledger name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for LedgerValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger() {
        let ledger = Ledger::new("Operating");
        assert_eq!(ledger.name, "Operating");
        assert_eq!(ledger.starting_balance, Money::zero());
    }

    #[test]
    fn test_with_starting_balance() {
        let ledger = Ledger::with_starting_balance("Payroll", Money::from_cents(100000));
        assert_eq!(ledger.starting_balance.cents(), 100000);
    }

    #[test]
    fn test_name_matches() {
        let ledger = Ledger::new("Operating Fund");
        assert!(ledger.name_matches("operating fund"));
        assert!(ledger.name_matches("  Operating Fund  "));
        // Internal whitespace is significant.
        assert!(!ledger.name_matches("Operating  Fund"));
        assert!(!ledger.name_matches("Operating"));
    }

    #[test]
    fn test_validation() {
        let mut ledger = Ledger::new("Valid Name");
        assert!(ledger.validate().is_ok());

        ledger.name = String::new();
        assert_eq!(ledger.validate(), Err(LedgerValidationError::EmptyName));

        ledger.name = "a".repeat(101);
        assert!(matches!(
            ledger.validate(),
            Err(LedgerValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let ledger = Ledger::new("Operating");
        let json = serde_json::to_string(&ledger).unwrap();
        let deserialized: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger.id, deserialized.id);
        assert_eq!(ledger.name, deserialized.name);
    }
}
