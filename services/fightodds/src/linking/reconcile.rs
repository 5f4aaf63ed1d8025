//! Reconcile a fight record against the odds observations of both fighters

use chrono::NaiveDate;

use crate::linking::american::american_to_decimal;
use crate::linking::names::{same_name, same_pairing};
use crate::linking::types::{FightRecord, MatchStatus, OddsLine, OddsObservation, ReconciliationResult};

/// Score for an observation whose event date equals the fight's date
pub const EXACT_DATE_SCORE: u8 = 2;
/// Score for an observation that carries any event date
pub const DATED_SCORE: u8 = 1;

/// Stand-in date for undated observations when ranking by recency
fn undated_sentinel() -> NaiveDate {
    NaiveDate::MIN
}

/// Rank an observation against the fight record's date
pub fn score_observation(obs: &OddsObservation, fight_date: Option<NaiveDate>) -> u8 {
    let mut score = 0;
    if let (Some(wanted), Some(seen)) = (fight_date, obs.event_date) {
        if wanted == seen {
            score += EXACT_DATE_SCORE;
        }
    }
    if obs.event_date.is_some() {
        score += DATED_SCORE;
    }
    score
}

/// Pick the best observation for `fight` out of both pools.
///
/// Only observations naming exactly the two fighters (in either order)
/// qualify. They are ranked by score, then by most recent event date; ties
/// keep the earliest observation, red pool first.
pub fn select_observation<'a>(
    fight: &FightRecord,
    red_pool: &'a [OddsObservation],
    blue_pool: &'a [OddsObservation],
) -> Option<&'a OddsObservation> {
    let mut candidates: Vec<&OddsObservation> = red_pool
        .iter()
        .chain(blue_pool.iter())
        .filter(|obs| same_pairing(&obs.side_a, &obs.side_b, &fight.red, &fight.blue))
        .collect();

    let key = |obs: &OddsObservation| {
        (
            score_observation(obs, fight.event_date),
            obs.event_date.unwrap_or_else(undated_sentinel),
        )
    };
    // stable sort, so equal keys stay in pool order
    candidates.sort_by(|a, b| key(b).cmp(&key(a)));
    candidates.into_iter().next()
}

/// Reconcile one fight record.
///
/// Locators are left empty; see [`ReconciliationResult::with_locators`].
pub fn reconcile(
    fight: &FightRecord,
    red_pool: &[OddsObservation],
    blue_pool: &[OddsObservation],
) -> ReconciliationResult {
    let Some(obs) = select_observation(fight, red_pool, blue_pool) else {
        return ReconciliationResult::no_match();
    };

    let (red, blue): (&OddsLine, &OddsLine) =
        if same_name(&obs.side_a, &fight.red) && same_name(&obs.side_b, &fight.blue) {
            (&obs.a, &obs.b)
        } else {
            (&obs.b, &obs.a)
        };

    let has_odds = red.open.is_some() || blue.open.is_some() || red.close.is_some() || blue.close.is_some();

    ReconciliationResult {
        status: if has_odds { MatchStatus::Matched } else { MatchStatus::Partial },
        red_open: red.open.clone(),
        blue_open: blue.open.clone(),
        red_close_low: red.close.clone(),
        red_close_high: red.close.clone(),
        blue_close_low: blue.close.clone(),
        blue_close_high: blue.close.clone(),
        red_open_decimal: red.open.as_deref().and_then(american_to_decimal),
        blue_open_decimal: blue.open.as_deref().and_then(american_to_decimal),
        red_locator: None,
        blue_locator: None,
        event_locator: obs.event_locator.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(open: Option<&str>, close: Option<&str>) -> OddsLine {
        OddsLine {
            open: open.map(str::to_string),
            current: close.or(open).map(str::to_string),
            close: close.map(str::to_string),
        }
    }

    fn obs(a: &str, b: &str, when: Option<NaiveDate>, a_open: &str, b_open: &str) -> OddsObservation {
        OddsObservation {
            event_date: when,
            event_locator: when.map(|d| format!("https://odds.test/events/{}", d)),
            side_a: a.to_string(),
            side_b: b.to_string(),
            a: line(Some(a_open), Some(a_open)),
            b: line(Some(b_open), Some(b_open)),
        }
    }

    fn jones_miocic() -> FightRecord {
        FightRecord::new("UFC 295", Some(date(2023, 11, 11)), "Jon Jones", "Stipe Miocic")
    }

    #[test]
    fn test_end_to_end_swapped_sides() {
        let pool = vec![obs("Stipe Miocic", "Jon Jones", Some(date(2023, 11, 11)), "-150", "+130")];
        let r = reconcile(&jones_miocic(), &pool, &[]);

        assert_eq!(r.status, MatchStatus::Matched);
        assert_eq!(r.red_open.as_deref(), Some("+130"));
        assert_eq!(r.blue_open.as_deref(), Some("-150"));
        assert_eq!(r.red_close_low, r.red_close_high);
        assert_eq!(r.blue_close_low.as_deref(), Some("-150"));
        assert!((r.red_open_decimal.unwrap() - 2.30).abs() < 1e-9);
        assert!((r.blue_open_decimal.unwrap() - 1.6667).abs() < 1e-3);
        assert_eq!(r.event_locator.as_deref(), Some("https://odds.test/events/2023-11-11"));
    }

    #[test]
    fn test_no_structural_candidate() {
        let pool = vec![
            obs("Jon Jones", "Ciryl Gane", Some(date(2023, 3, 4)), "-150", "+130"),
            obs("Stipe Miocic", "Francis Ngannou", None, "+100", "-120"),
        ];
        let r = reconcile(&jones_miocic(), &pool, &pool);

        assert_eq!(r.status, MatchStatus::NoMatch);
        assert!(r.red_open.is_none() && r.blue_open.is_none());
        assert!(r.red_close_low.is_none() && r.red_close_high.is_none());
        assert!(r.blue_close_low.is_none() && r.blue_close_high.is_none());
        assert!(r.red_open_decimal.is_none() && r.blue_open_decimal.is_none());
        assert!(r.event_locator.is_none());
    }

    #[test]
    fn test_side_mapping_symmetry() {
        let fight = jones_miocic();
        let direct = obs("Jon Jones", "Stipe Miocic", Some(date(2023, 11, 11)), "-250", "+200");
        let mirror = obs("Stipe Miocic", "Jon Jones", Some(date(2023, 11, 11)), "+200", "-250");

        let r1 = reconcile(&fight, &[direct], &[]);
        let r2 = reconcile(&fight, &[], &[mirror]);
        assert_eq!(r1, r2);
        assert_eq!(r1.red_open.as_deref(), Some("-250"));
    }

    #[test]
    fn test_exact_date_beats_later_date() {
        let fight = jones_miocic();
        let later = obs("Jon Jones", "Stipe Miocic", Some(date(2024, 11, 16)), "-300", "+240");
        let exact = obs("Jon Jones", "Stipe Miocic", Some(date(2023, 11, 11)), "-150", "+130");

        let r = reconcile(&fight, &[later.clone()], &[exact.clone()]);
        assert_eq!(r.red_open.as_deref(), Some("-150"));

        let r = reconcile(&fight, &[exact], &[later]);
        assert_eq!(r.red_open.as_deref(), Some("-150"));
    }

    #[test]
    fn test_dated_beats_undated_and_recent_wins() {
        let fight = FightRecord::new("UFC X", None, "Jon Jones", "Stipe Miocic");
        let undated = obs("Jon Jones", "Stipe Miocic", None, "-110", "-110");
        let older = obs("Jon Jones", "Stipe Miocic", Some(date(2020, 1, 1)), "-120", "+100");
        let newer = obs("Stipe Miocic", "Jon Jones", Some(date(2024, 11, 16)), "+240", "-300");

        let r = reconcile(&fight, &[undated, older], &[newer]);
        assert_eq!(r.red_open.as_deref(), Some("-300"));
        assert_eq!(r.blue_open.as_deref(), Some("+240"));
    }

    #[test]
    fn test_ties_prefer_red_pool() {
        let fight = jones_miocic();
        let from_red = obs("Jon Jones", "Stipe Miocic", Some(date(2023, 11, 11)), "-150", "+130");
        let from_blue = obs("Stipe Miocic", "Jon Jones", Some(date(2023, 11, 11)), "+125", "-145");

        let r = reconcile(&fight, &[from_red], &[from_blue]);
        assert_eq!(r.red_open.as_deref(), Some("-150"));
    }

    #[test]
    fn test_partial_when_no_odds_values() {
        let mut empty = obs("Jon Jones", "Stipe Miocic", Some(date(2023, 11, 11)), "x", "y");
        empty.a = OddsLine::default();
        empty.b = OddsLine::default();

        let r = reconcile(&jones_miocic(), &[empty], &[]);
        assert_eq!(r.status, MatchStatus::Partial);
        assert!(r.red_open_decimal.is_none());
        assert_eq!(r.event_locator.as_deref(), Some("https://odds.test/events/2023-11-11"));
    }

    #[test]
    fn test_matched_with_close_only() {
        let mut close_only = obs("Jon Jones", "Stipe Miocic", None, "-150", "+130");
        close_only.a = line(None, Some("-160"));
        close_only.b = OddsLine::default();

        let r = reconcile(&jones_miocic(), &[close_only], &[]);
        assert_eq!(r.status, MatchStatus::Matched);
        assert!(r.red_open.is_none());
        assert_eq!(r.red_close_high.as_deref(), Some("-160"));
        assert!(r.red_open_decimal.is_none());
    }

    #[test]
    fn test_names_compare_case_insensitively_but_not_fuzzily() {
        let fight = FightRecord::new("UFC 295", None, "jon  JONES", "stipe miocic");
        let pool = vec![obs("Jon Jones", "Stipe Miocic", None, "-150", "+130")];
        assert_eq!(reconcile(&fight, &pool, &[]).status, MatchStatus::Matched);

        let fight = FightRecord::new("UFC 295", None, "Jon Jones", "Stipe Miočić");
        assert_eq!(reconcile(&fight, &pool, &[]).status, MatchStatus::NoMatch);
    }

    #[test]
    fn test_score_observation() {
        let d = date(2023, 11, 11);
        assert_eq!(score_observation(&obs("A", "B", Some(d), "+1", "-1"), Some(d)), 3);
        assert_eq!(score_observation(&obs("A", "B", Some(date(2024, 1, 1)), "+1", "-1"), Some(d)), 1);
        assert_eq!(score_observation(&obs("A", "B", None, "+1", "-1"), Some(d)), 0);
        assert_eq!(score_observation(&obs("A", "B", Some(d), "+1", "-1"), None), 1);
    }
}
