//! Invoice identity extraction from document text.

pub mod rules;

use rules::{date_rules, extract, number_rules};

/// Extracted identity of a single invoice document.
///
/// Built once per input file and consumed immediately to decide its
/// destination; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Issue date normalized to `YYMMDD`, when found.
    pub date: Option<String>,
    /// Document number as its matched digit string, when found.
    pub number: Option<String>,
}

impl DocumentOutcome {
    /// Both fields were extracted.
    pub fn identified(&self) -> bool {
        self.date.is_some() && self.number.is_some()
    }
}

/// Extract date and number independently from full document text.
///
/// The two fields never influence each other; either can be absent.
pub fn classify(text: &str) -> DocumentOutcome {
    DocumentOutcome {
        date: extract(text, date_rules()),
        number: extract(text, number_rules()),
    }
}
