//! Core types shared by resolution, extraction and reconciliation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a fighter name was resolved on the odds site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Exact,
    Fuzzy,
    Fallback,
    None,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Exact => "exact",
            ConfidenceTier::Fuzzy => "fuzzy",
            ConfidenceTier::Fallback => "fallback",
            ConfidenceTier::None => "none",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Canonical identity of a fighter on the odds site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub query: String,
    pub display_name: String,
    pub locator: Option<String>,
    pub tier: ConfidenceTier,
    /// Similarity score (0-100) for fuzzy matches
    pub score: Option<f64>,
}

impl Identity {
    /// Identity for a name with no search candidates
    pub fn unresolved(query: &str) -> Self {
        Self {
            query: query.to_string(),
            display_name: crate::linking::clean_name(query),
            locator: None,
            tier: ConfidenceTier::None,
            score: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.locator.is_some()
    }
}

/// Open / current / closing-approximation odds for one side of a matchup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsLine {
    pub open: Option<String>,
    pub current: Option<String>,
    /// Last odds value in the row; a proxy, the site exposes no real closing line
    pub close: Option<String>,
}

impl OddsLine {
    pub fn is_empty(&self) -> bool {
        self.open.is_none() && self.current.is_none() && self.close.is_none()
    }
}

/// One matchup as listed on a fighter's odds page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsObservation {
    pub event_date: Option<NaiveDate>,
    pub event_locator: Option<String>,
    /// The fighter whose page this came from
    pub side_a: String,
    /// The listed opponent
    pub side_b: String,
    pub a: OddsLine,
    pub b: OddsLine,
}

/// A fight result from the fight-record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightRecord {
    pub event_name: String,
    pub event_date: Option<NaiveDate>,
    /// Date text as it appeared in the input
    pub event_date_raw: Option<String>,
    pub red: String,
    pub blue: String,
}

impl FightRecord {
    pub fn new(event_name: &str, event_date: Option<NaiveDate>, red: &str, blue: &str) -> Self {
        Self {
            event_name: event_name.to_string(),
            event_date,
            event_date_raw: event_date.map(|d| d.format("%Y-%m-%d").to_string()),
            red: red.to_string(),
            blue: blue.to_string(),
        }
    }
}

/// Terminal outcome of reconciling one fight record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// A matching observation carried at least one odds value
    Matched,
    /// A matching observation existed but carried no odds values
    Partial,
    NoMatch,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::Partial => "partial",
            MatchStatus::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Odds attributed to the red and blue corners of a fight record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub status: MatchStatus,
    pub red_open: Option<String>,
    pub blue_open: Option<String>,
    pub red_close_low: Option<String>,
    pub red_close_high: Option<String>,
    pub blue_close_low: Option<String>,
    pub blue_close_high: Option<String>,
    pub red_open_decimal: Option<f64>,
    pub blue_open_decimal: Option<f64>,
    pub red_locator: Option<String>,
    pub blue_locator: Option<String>,
    pub event_locator: Option<String>,
}

impl ReconciliationResult {
    pub fn no_match() -> Self {
        Self {
            status: MatchStatus::NoMatch,
            red_open: None,
            blue_open: None,
            red_close_low: None,
            red_close_high: None,
            blue_close_low: None,
            blue_close_high: None,
            red_open_decimal: None,
            blue_open_decimal: None,
            red_locator: None,
            blue_locator: None,
            event_locator: None,
        }
    }

    /// Attach the resolved page locators of both fighters
    pub fn with_locators(mut self, red: Option<&str>, blue: Option<&str>) -> Self {
        self.red_locator = red.map(str::to_string);
        self.blue_locator = blue.map(str::to_string);
        self
    }
}

/// A fight record together with its reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledFight {
    pub fight: FightRecord,
    pub result: ReconciliationResult,
}
