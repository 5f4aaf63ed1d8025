//! Extract odds observations from a fighter page's table rows
//!
//! The odds page lists each matchup as two rows: a "primary" row for the page
//! fighter (marked `main-row`) followed by a row for the opponent. Rows carry
//! no reliable column structure, so values are picked positionally.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::linking::american::is_odds_token;
use crate::linking::dates::parse_odds_date;
use crate::linking::names::{clean_name, same_name};
use crate::linking::types::{OddsLine, OddsObservation};

/// Marks a link as pointing at an event page
pub const EVENT_LINK_PATTERN: &str = "/events/";

/// Read access to one table row
pub trait RowLike {
    /// Row carries the primary (page fighter) marker
    fn is_primary(&self) -> bool;

    /// Opponent name cell, if the row has one
    fn opponent_name(&self) -> Option<String>;

    /// Texts of the designated odds cells, in row order
    fn odds_tokens(&self) -> Vec<String>;

    /// Texts of cells that may hold the event date
    fn date_texts(&self) -> Vec<String>;

    /// Link targets in the row, already absolute
    fn link_targets(&self) -> Vec<String>;
}

/// A table row reduced to the parts the extractor reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub primary: bool,
    pub opponent: Option<String>,
    pub odds_cells: Vec<String>,
    pub date_cells: Vec<String>,
    pub links: Vec<String>,
}

impl RowLike for TableRow {
    fn is_primary(&self) -> bool {
        self.primary
    }

    fn opponent_name(&self) -> Option<String> {
        self.opponent.clone()
    }

    fn odds_tokens(&self) -> Vec<String> {
        self.odds_cells.clone()
    }

    fn date_texts(&self) -> Vec<String> {
        self.date_cells.clone()
    }

    fn link_targets(&self) -> Vec<String> {
        self.links.clone()
    }
}

enum ScanState<'r, R> {
    AwaitingPrimary,
    AwaitingOpponent(&'r R),
}

/// Extract one observation per primary/opponent row pair.
///
/// `subject` is the page fighter and becomes `side_a` of every observation.
/// Pairs without an opponent name, or where both sides are the same fighter,
/// are skipped. A primary row at the very end of `rows` is ignored.
pub fn extract_observations<R: RowLike>(subject: &str, rows: &[R]) -> Vec<OddsObservation> {
    let subject = clean_name(subject);
    let mut observations = Vec::new();
    let mut state = ScanState::AwaitingPrimary;

    for row in rows {
        state = match state {
            ScanState::AwaitingPrimary => {
                if row.is_primary() {
                    ScanState::AwaitingOpponent(row)
                } else {
                    ScanState::AwaitingPrimary
                }
            }
            ScanState::AwaitingOpponent(primary) => {
                if let Some(obs) = build_observation(&subject, primary, row) {
                    observations.push(obs);
                }
                // a primary row consumed as an opponent still opens its own pair
                if row.is_primary() {
                    ScanState::AwaitingOpponent(row)
                } else {
                    ScanState::AwaitingPrimary
                }
            }
        };
    }

    if let ScanState::AwaitingOpponent(_) = state {
        debug!("Skipping trailing primary row without opponent row");
    }

    observations
}

fn build_observation<R: RowLike>(subject: &str, primary: &R, opponent: &R) -> Option<OddsObservation> {
    let opponent_name = opponent
        .opponent_name()
        .map(|n| clean_name(&n))
        .filter(|n| !n.is_empty())?;

    if subject.is_empty() || same_name(subject, &opponent_name) {
        debug!("Discarding pair {:?} vs {:?}", subject, opponent_name);
        return None;
    }

    let event_date = opponent
        .date_texts()
        .iter()
        .find_map(|text| parse_odds_date(text));
    let event_locator = opponent
        .link_targets()
        .into_iter()
        .find(|href| href.contains(EVENT_LINK_PATTERN));

    Some(OddsObservation {
        event_date,
        event_locator,
        side_a: subject.to_string(),
        side_b: opponent_name,
        a: parse_odds_line(&primary.odds_tokens()),
        b: parse_odds_line(&opponent.odds_tokens()),
    })
}

/// Pick open / current / closing-approximation out of a row's odds cells.
///
/// The first token is the opening line and the second the current line when
/// they look like odds; the last odds-looking token is taken as the close.
/// Missing close falls back to current then open, missing current to close
/// then open.
pub fn parse_odds_line(tokens: &[String]) -> OddsLine {
    let tokens: Vec<&str> = tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    let open = tokens
        .first()
        .filter(|t| is_odds_token(t))
        .map(|t| t.to_string());
    let mut current = tokens
        .get(1)
        .filter(|t| is_odds_token(t))
        .map(|t| t.to_string());
    let mut close = tokens
        .iter()
        .rev()
        .find(|t| is_odds_token(t))
        .map(|t| t.to_string());

    if close.is_none() {
        close = current.clone().or_else(|| open.clone());
    }
    if current.is_none() {
        current = close.clone().or_else(|| open.clone());
    }

    OddsLine { open, current, close }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn primary(odds: &[&str]) -> TableRow {
        TableRow {
            primary: true,
            odds_cells: tokens(odds),
            ..TableRow::default()
        }
    }

    fn opponent(name: &str, odds: &[&str], date: Option<&str>, link: Option<&str>) -> TableRow {
        TableRow {
            primary: false,
            opponent: Some(name.to_string()),
            odds_cells: tokens(odds),
            date_cells: date.map(|d| vec![d.to_string()]).unwrap_or_default(),
            links: link.map(|l| vec![l.to_string()]).unwrap_or_default(),
        }
    }

    #[test]
    fn test_parse_odds_line_three_values() {
        let line = parse_odds_line(&tokens(&["-150", "-170", "-160", "-175"]));
        assert_eq!(line.open.as_deref(), Some("-150"));
        assert_eq!(line.current.as_deref(), Some("-170"));
        assert_eq!(line.close.as_deref(), Some("-175"));
    }

    #[test]
    fn test_parse_odds_line_single_value() {
        let line = parse_odds_line(&tokens(&["+130"]));
        assert_eq!(line.open.as_deref(), Some("+130"));
        assert_eq!(line.current.as_deref(), Some("+130"));
        assert_eq!(line.close.as_deref(), Some("+130"));
    }

    #[test]
    fn test_parse_odds_line_skips_non_odds_tokens() {
        // first cell is not an odds value: no open, current and close from the rest
        let line = parse_odds_line(&tokens(&["n/a", "+200", "▲", "+210", "5%"]));
        assert_eq!(line.open, None);
        assert_eq!(line.current.as_deref(), Some("+200"));
        assert_eq!(line.close.as_deref(), Some("+210"));

        // current slot is junk: falls back to close
        let line = parse_odds_line(&tokens(&["+120", "-", "+140"]));
        assert_eq!(line.open.as_deref(), Some("+120"));
        assert_eq!(line.current.as_deref(), Some("+140"));
        assert_eq!(line.close.as_deref(), Some("+140"));
    }

    #[test]
    fn test_parse_odds_line_empty() {
        assert!(parse_odds_line(&[]).is_empty());
        assert!(parse_odds_line(&tokens(&["", "  ", "EV"])).is_empty());
    }

    #[test]
    fn test_extract_pairs() {
        let rows = vec![
            primary(&["-150", "-165", "-170"]),
            opponent(
                "Stipe  Miocic",
                &["+130", "+145", "+150"],
                Some("Nov 11th 2023"),
                Some("https://www.bestfightodds.com/events/ufc-295-3061"),
            ),
            primary(&["-300"]),
            opponent("Ciryl Gane", &["+250"], None, None),
        ];

        let obs = extract_observations("Jon Jones", &rows);
        assert_eq!(obs.len(), 2);

        assert_eq!(obs[0].side_a, "Jon Jones");
        assert_eq!(obs[0].side_b, "Stipe Miocic");
        assert_eq!(obs[0].event_date, NaiveDate::from_ymd_opt(2023, 11, 11));
        assert_eq!(
            obs[0].event_locator.as_deref(),
            Some("https://www.bestfightodds.com/events/ufc-295-3061")
        );
        assert_eq!(obs[0].a.open.as_deref(), Some("-150"));
        assert_eq!(obs[0].a.close.as_deref(), Some("-170"));
        assert_eq!(obs[0].b.open.as_deref(), Some("+130"));
        assert_eq!(obs[0].b.current.as_deref(), Some("+145"));

        assert_eq!(obs[1].side_b, "Ciryl Gane");
        assert_eq!(obs[1].event_date, None);
        assert_eq!(obs[1].event_locator, None);
    }

    #[test]
    fn test_extract_skips_pair_without_opponent_name() {
        let rows = vec![
            primary(&["-150"]),
            TableRow { opponent: Some("   ".to_string()), ..TableRow::default() },
            primary(&["-110"]),
            opponent("Ciryl Gane", &["-110"], None, None),
        ];
        let obs = extract_observations("Jon Jones", &rows);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].side_b, "Ciryl Gane");
    }

    #[test]
    fn test_extract_skips_dangling_primary() {
        let rows = vec![
            primary(&["-150"]),
            opponent("Stipe Miocic", &["+130"], None, None),
            primary(&["-200"]),
        ];
        assert_eq!(extract_observations("Jon Jones", &rows).len(), 1);
    }

    #[test]
    fn test_extract_back_to_back_primaries() {
        // the first primary pairs with the second (no opponent, skipped);
        // the second still pairs with the row after it
        let rows = vec![
            primary(&["-150"]),
            primary(&["-200"]),
            opponent("Stipe Miocic", &["+170"], None, None),
        ];
        let obs = extract_observations("Jon Jones", &rows);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].a.open.as_deref(), Some("-200"));
    }

    #[test]
    fn test_extract_ignores_orphan_opponent_rows() {
        let rows = vec![
            opponent("Stipe Miocic", &["+130"], None, None),
            TableRow::default(),
        ];
        assert!(extract_observations("Jon Jones", &rows).is_empty());
    }

    #[test]
    fn test_extract_discards_self_pairing_and_empty_subject() {
        let rows = vec![primary(&["-150"]), opponent("jon jones", &["+130"], None, None)];
        assert!(extract_observations("Jon Jones", &rows).is_empty());

        let rows = vec![primary(&["-150"]), opponent("Stipe Miocic", &["+130"], None, None)];
        assert!(extract_observations("  ", &rows).is_empty());
    }

    #[test]
    fn test_extract_takes_first_parseable_date_and_event_link() {
        let row = TableRow {
            opponent: Some("Stipe Miocic".to_string()),
            date_cells: vec!["UFC 295".to_string(), "Nov 11th 2023".to_string()],
            links: vec![
                "https://www.bestfightodds.com/fighters/Stipe-Miocic-1234".to_string(),
                "https://www.bestfightodds.com/events/ufc-295-3061".to_string(),
            ],
            ..TableRow::default()
        };
        let obs = extract_observations("Jon Jones", &[primary(&[]), row]);
        assert_eq!(obs[0].event_date, NaiveDate::from_ymd_opt(2023, 11, 11));
        assert_eq!(
            obs[0].event_locator.as_deref(),
            Some("https://www.bestfightodds.com/events/ufc-295-3061")
        );
        assert!(obs[0].a.is_empty());
    }
}
