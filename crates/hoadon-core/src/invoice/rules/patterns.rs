//! Rule catalogs for Vietnamese invoice date and number extraction.
//!
//! Both catalogs are ordered by priority: specific, reliable layouts come
//! first so looser fallbacks cannot shadow them.

use lazy_static::lazy_static;

use super::{ExtractionRule, GroupPick, MatchMode};

lazy_static! {
    static ref DATE_RULES: Vec<ExtractionRule> = vec![
        // Long form, each label optionally annotated:
        // "Ngày 05 tháng 07 năm 2023", "Ngày (date) 5 tháng (month) 7 năm (year) 2023"
        ExtractionRule::new(
            r"Ngày\s*(?:\([^)]*\))?\s*(\d{1,2})\s*tháng\s*(?:\([^)]*\))?\s*(\d{1,2})\s*năm\s*(?:\([^)]*\))?\s*(\d{4})",
            MatchMode::IgnoreCase,
            GroupPick::DayMonthYear,
        ),
        // Bilingual heading: "Ngày tháng năm/ Date: 15/3/2024"
        ExtractionRule::new(
            r"Ngày\s*tháng\s*năm/?\s*Date:\s*(\d{1,2})/(\d{1,2})/(\d{4})",
            MatchMode::IgnoreCase,
            GroupPick::DayMonthYear,
        ),
        // Issuance label: "Ngày lập: 1/2/2024"
        ExtractionRule::new(
            r"Ngày\s*lập:\s*(\d{1,2})/(\d{1,2})/(\d{4})",
            MatchMode::IgnoreCase,
            GroupPick::DayMonthYear,
        ),
        // "Ngày (Dated): 28/11/2023"
        ExtractionRule::new(
            r"Ngày\s*\(Dated\)\s*:\s*(\d{1,2})/(\d{1,2})/(\d{4})",
            MatchMode::IgnoreCase,
            GroupPick::DayMonthYear,
        ),
    ];

    static ref NUMBER_RULES: Vec<ExtractionRule> = vec![
        // Generic label with digits attached: "Số: 456", "Số (No.): 456"
        ExtractionRule::new(
            r"Số\s*(?:\([^)]*\))?\s*:?\s*(\d+)",
            MatchMode::Plain,
            GroupPick::Single(1),
        ),
        // Series and serial printed as adjacent runs above the label:
        // "0123 456 ... Số (No.):" - the serial is the second run
        ExtractionRule::new(
            r"(\d{4})\s+(\d+)\s*Số\s*(?:\([^)]*\))?\s*:",
            MatchMode::Plain,
            GroupPick::Single(2),
        ),
        // Eight-digit serial somewhere before the full date phrase and a
        // bare "Số:" label
        ExtractionRule::new(
            r"(\d{8})\s*.*?Ngày\s*\d{1,2}\s*tháng\s*\d{1,2}\s*năm\s*\d{4}\s*Số\s*:",
            MatchMode::IgnoreCaseAcrossLines,
            GroupPick::Single(1),
        ),
        // Bilingual number label with digits attached, or a VAT INVOICE
        // header whose serial precedes that label
        ExtractionRule::new(
            r"(?:Số\s*hóa\s*đơn|Invoice\s*No)[:/\s]*(\d+)|VAT\s*INVOICE\)?\s*(\d{3,8})\s*.*?(?:Số\s*hóa\s*đơn|Invoice\s*No)",
            MatchMode::IgnoreCaseAcrossLines,
            GroupPick::Either(1, 2),
        ),
        // Serial after an INVOICE header, or trailing a parenthesized
        // "Số (...)" label
        ExtractionRule::new(
            r"INVOICE\)?\s*(\d{4,8})\s*.*?Số\s*\([^)]*\)\s*:|Số\s*\([^)]*\)\s*:.*?(\d{4,8})",
            MatchMode::IgnoreCaseAcrossLines,
            GroupPick::Either(1, 2),
        ),
        // Tax code line followed by the invoice number label; the tax code
        // digits are deliberately not captured
        ExtractionRule::new(
            r"Mã\s*số\s*thuế\s*\(?Tax\s*code\)?\s*:\s*\d+\s+Số\s*hóa\s*đơn\s*\(?Invoice\s*No\.\)?\s*:\s*(\d+)",
            MatchMode::IgnoreCaseAcrossLines,
            GroupPick::Single(1),
        ),
    ];
}

/// Issue-date rules in priority order.
pub fn date_rules() -> &'static [ExtractionRule] {
    &DATE_RULES
}

/// Document-number rules in priority order.
pub fn number_rules() -> &'static [ExtractionRule] {
    &NUMBER_RULES
}
