//! Identity extraction from Vietnamese XML e-invoices.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::error::{Result, XmlError};
use crate::invoice::DocumentOutcome;

/// Offset-free date shapes issuers put in `<NLap>`; zone-offset datetimes
/// are covered by an RFC 3339 fallback.
const ISSUE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y"];

/// Read the invoice identity from an XML e-invoice.
///
/// Takes the text of the first `<SHDon>` (serial number) and the first
/// `<NLap>` (issue date) elements at any depth, since issuers nest the
/// `<HDon>` envelope differently. The whole document is parsed even after
/// both fields are seen; malformation or truncation anywhere in it is an
/// error. A field that is missing or whose date does not parse stays
/// absent.
pub fn read_identity(path: &Path) -> Result<DocumentOutcome> {
    let raw = fs::read_to_string(path)?;
    let clean = scrub_invalid_chars(&raw);

    let mut number: Option<String> = None;
    let mut issued: Option<String> = None;

    let mut reader = Reader::from_str(&clean);
    let mut current: Vec<u8> = Vec::new();
    let mut depth = 0i32;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                current = e.name().as_ref().to_vec();
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                current.clear();
            }
            Ok(Event::Text(t)) => {
                if is_identity_element(&current) {
                    let value = t.unescape().map_err(|e| XmlError::Text(e.to_string()))?;
                    capture(&mut number, &mut issued, &current, value.trim());
                }
            }
            Ok(Event::CData(t)) => {
                if is_identity_element(&current) {
                    let bytes = t.into_inner();
                    let value =
                        std::str::from_utf8(&bytes).map_err(|e| XmlError::Text(e.to_string()))?;
                    capture(&mut number, &mut issued, &current, value.trim());
                }
            }
            Ok(Event::Eof) => {
                if depth != 0 {
                    return Err(XmlError::Parse("unexpected end of document".to_string()).into());
                }
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(XmlError::Parse(e.to_string()).into()),
        }
    }

    let date = issued.as_deref().and_then(format_issue_date);
    if date.is_none() || number.is_none() {
        debug!("incomplete e-invoice identity in {}", path.display());
    }
    Ok(DocumentOutcome { date, number })
}

fn is_identity_element(tag: &[u8]) -> bool {
    tag == b"SHDon" || tag == b"NLap"
}

/// Record a field value; only the first non-empty occurrence of each
/// element counts.
fn capture(number: &mut Option<String>, issued: &mut Option<String>, tag: &[u8], value: &str) {
    if value.is_empty() {
        return;
    }
    if tag == b"SHDon" && number.is_none() {
        *number = Some(value.to_string());
    } else if tag == b"NLap" && issued.is_none() {
        *issued = Some(value.to_string());
    }
}

/// Parse an issue date and normalize it to the `YYMMDD` filename token.
fn format_issue_date(value: &str) -> Option<String> {
    ISSUE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .map(|date| date.format("%y%m%d").to_string())
}

/// Drop characters that are not legal in XML 1.0 documents; issuers emit
/// stray control bytes that break strict parsers.
fn scrub_invalid_chars(raw: &str) -> String {
    raw.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || ('\u{20}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || c >= '\u{10000}'
        })
        .collect()
}
