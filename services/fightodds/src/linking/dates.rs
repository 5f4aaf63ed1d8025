//! Free-text date parsing

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Formats tried, in order, for dates shown on the odds site ("Jul 26th 2025").
///
/// No comma after the day: "July 4th, 2025" does not parse.
pub const ODDS_DATE_FORMATS: [&str; 2] = ["%b %d %Y", "%B %d %Y"];

/// Extra formats accepted for fight record input, tried before `ODDS_DATE_FORMATS`
pub const RECORD_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)(st|nd|rd|th)").expect("ordinal pattern"))
}

/// "Jul 26th 2025" -> "Jul 26 2025"
pub fn strip_ordinals(text: &str) -> String {
    ordinal_re().replace_all(text, "$1").to_string()
}

/// Parse a date as printed on the odds site. Unparseable text yields `None`.
pub fn parse_odds_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let stripped = strip_ordinals(text);
    ODDS_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&stripped, fmt).ok())
}

/// Parse an event date from a fight record (ISO or "November 11, 2023"),
/// falling back to the odds-site formats.
pub fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    RECORD_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| parse_odds_date(text))
}
