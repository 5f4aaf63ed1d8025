//! American (moneyline) odds tokens and their decimal conversion

use regex::Regex;
use std::sync::OnceLock;

fn odds_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d{2,4}$").expect("odds token pattern"))
}

/// True if `token` looks like a signed 2-4 digit moneyline value ("+152", "-300", "110")
pub fn is_odds_token(token: &str) -> bool {
    odds_token_re().is_match(token)
}

/// Convert an American odds string to decimal odds.
///
/// `+150` → 2.5, `-150` → 1.667. Returns `None` for missing, non-numeric or
/// zero input; any value returned is strictly greater than 1.
pub fn american_to_decimal(odds: &str) -> Option<f64> {
    let o: i64 = odds.trim().parse().ok()?;
    if o > 0 {
        Some(1.0 + o as f64 / 100.0)
    } else if o < 0 {
        Some(1.0 + 100.0 / o.unsigned_abs() as f64)
    } else {
        None
    }
}
