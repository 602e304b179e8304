//! Core library for sorting Vietnamese invoice files.
//!
//! This crate provides:
//! - Text extraction from PDF invoices (with empty-password decryption)
//! - Identity extraction from TT78 XML e-invoices
//! - Issue date and document number recognition via regex rule catalogs
//! - Canonical `YYMMDD_number` naming with collision handling
//! - Batch sorting of files into success and failure directories

pub mod batch;
pub mod error;
pub mod invoice;
pub mod naming;
pub mod pdf;
pub mod xml;

pub use batch::BatchSummary;
pub use error::{HoadonError, PdfError, Result, XmlError};
pub use invoice::rules::{ExtractionRule, GroupPick, MatchMode, date_rules, number_rules};
pub use invoice::{DocumentOutcome, classify};
pub use naming::{canonical_name, unique_name};
pub use pdf::{PdfTextSource, TextSource};
pub use xml::read_identity;
