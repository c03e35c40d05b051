//! Render data for print units
//!
//! A [`RenderUnit`] is everything the print adapter needs to put ink on
//! paper for one commit unit: one check face in standard mode, up to three
//! faces on a shared sheet in three-up mode. Field placement and styling
//! belong to the layout editor and the adapters, not to the core.

use chrono::NaiveDate;

use crate::models::{Money, SheetSlot, TransactionKind};

/// The printable content of one check or deposit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFace {
    pub kind: TransactionKind,
    pub slot: Option<SheetSlot>,
    pub check_number: Option<u32>,
    pub date: NaiveDate,
    pub payee: String,
    pub amount: Money,
    /// Amount spelled out for the written-amount line
    pub amount_words: String,
    pub memo: String,
    pub ledger_name: String,
}

impl CheckFace {
    /// One-line description used in logs and failure prompts
    pub fn label(&self) -> String {
        match self.kind {
            TransactionKind::Check => match self.check_number {
                Some(n) => format!("check #{} to {}", n, self.payee),
                None => format!("check to {}", self.payee),
            },
            TransactionKind::Deposit => format!("deposit: {}", self.payee),
        }
    }
}

/// The smallest group of faces sharing one physical print action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderUnit {
    /// One check or deposit record (standard mode)
    Single(CheckFace),
    /// Up to three faces on one physical sheet (three-up mode)
    Sheet(Vec<CheckFace>),
}

impl RenderUnit {
    /// Number of faces in this unit
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sheet(faces) => faces.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Faces in slot order
    pub fn faces(&self) -> &[CheckFace] {
        match self {
            Self::Single(face) => std::slice::from_ref(face),
            Self::Sheet(faces) => faces,
        }
    }

    /// Label used in failure prompts: the payee for a single face, a sheet
    /// description otherwise
    pub fn label(&self) -> String {
        match self {
            Self::Single(face) => face.label(),
            Self::Sheet(faces) => {
                let payees: Vec<&str> = faces.iter().map(|f| f.payee.as_str()).collect();
                format!("sheet of {}: {}", faces.len(), payees.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(payee: &str, number: Option<u32>) -> CheckFace {
        CheckFace {
            kind: TransactionKind::Check,
            slot: None,
            check_number: number,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            payee: payee.to_string(),
            amount: Money::from_cents(10000),
            amount_words: Money::from_cents(10000).to_written_words(),
            memo: String::new(),
            ledger_name: "Operating".to_string(),
        }
    }

    #[test]
    fn test_face_label() {
        assert_eq!(face("Acme Co", Some(2001)).label(), "check #2001 to Acme Co");
        assert_eq!(face("Acme Co", None).label(), "check to Acme Co");
    }

    #[test]
    fn test_unit_label_and_len() {
        let single = RenderUnit::Single(face("Acme Co", None));
        assert_eq!(single.len(), 1);

        let sheet = RenderUnit::Sheet(vec![face("Acme Co", None), face("Beta LLC", None)]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.label(), "sheet of 2: Acme Co, Beta LLC");
    }
}
