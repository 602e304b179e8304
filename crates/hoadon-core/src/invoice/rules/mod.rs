//! Rule-based field extraction for Vietnamese invoices.
//!
//! A field is extracted by an ordered list of [`ExtractionRule`]s tried
//! strictly in priority order; the first rule that matches and satisfies
//! its group selection decides the value.

pub mod patterns;

pub use patterns::{date_rules, number_rules};

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

/// How a rule's pattern is matched against document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-sensitive, `.` stops at line breaks.
    Plain,
    /// Case-insensitive.
    IgnoreCase,
    /// Case-insensitive, `.` also matches across line breaks.
    IgnoreCaseAcrossLines,
}

/// Which capture group(s) constitute a rule's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPick {
    /// Day/month/year in groups 1-3, normalized to a `YYMMDD` token.
    DayMonthYear,
    /// A single group taken verbatim.
    Single(usize),
    /// Two alternative groups; the one that participated in the match wins.
    Either(usize, usize),
}

/// Tagged result of an [`GroupPick::Either`] selection, naming which
/// alternative fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupHit<'t> {
    First(&'t str),
    Second(&'t str),
}

impl<'t> GroupHit<'t> {
    /// The matched text regardless of which alternative fired.
    pub fn value(self) -> &'t str {
        match self {
            GroupHit::First(s) | GroupHit::Second(s) => s,
        }
    }
}

/// One prioritized extraction rule: a compiled pattern plus the group
/// selection that turns its match into a field value.
#[derive(Debug)]
pub struct ExtractionRule {
    regex: Regex,
    pick: GroupPick,
}

impl ExtractionRule {
    /// Compile a rule from its pattern, matching mode, and group selection.
    ///
    /// A pattern that fails to compile is a defect in the rule table, so
    /// this panics rather than returning an error.
    pub fn new(pattern: &str, mode: MatchMode, pick: GroupPick) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(mode != MatchMode::Plain)
            .dot_matches_new_line(mode == MatchMode::IgnoreCaseAcrossLines)
            .build()
            .unwrap();
        Self { regex, pick }
    }

    /// Apply this rule to `text`, returning the selected value when the
    /// pattern matches and its group selection is satisfied.
    fn apply(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        match self.pick {
            GroupPick::DayMonthYear => {
                let day = caps.get(1)?.as_str();
                let month = caps.get(2)?.as_str();
                let year = caps.get(3)?.as_str();
                Some(format_yymmdd(day, month, year))
            }
            GroupPick::Single(group) => Some(caps.get(group)?.as_str().to_string()),
            GroupPick::Either(first, second) => {
                Some(pick_alternative(&caps, first, second)?.value().to_string())
            }
        }
    }
}

/// Apply `rules` to `text` in priority order and return the first value
/// produced.
///
/// Empty or whitespace-only text matches nothing. A rule whose pattern
/// matches but whose group selection cannot be satisfied is skipped and
/// the next rule is tried.
pub fn extract(text: &str, rules: &[ExtractionRule]) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    for (index, rule) in rules.iter().enumerate() {
        if let Some(value) = rule.apply(text) {
            debug!("rule {} produced {:?}", index + 1, value);
            return Some(value);
        }
    }
    None
}

/// Resolve an either-or group pick to the alternative that participated.
/// If both ever participate, the first alternative wins.
fn pick_alternative<'t>(caps: &Captures<'t>, first: usize, second: usize) -> Option<GroupHit<'t>> {
    match (caps.get(first), caps.get(second)) {
        (Some(m), _) => Some(GroupHit::First(m.as_str())),
        (None, Some(m)) => Some(GroupHit::Second(m.as_str())),
        (None, None) => None,
    }
}

/// Normalize a captured day/month/year to the `YYMMDD` filename token.
///
/// A four-digit year keeps its last two digits; day and month are
/// zero-padded to two digits.
fn format_yymmdd(day: &str, month: &str, year: &str) -> String {
    let year = if year.len() == 4 { &year[2..] } else { year };
    format!("{year}{month:0>2}{day:0>2}")
}
