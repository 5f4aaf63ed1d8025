//! Fighter roster scraper for ufcstats.com
//!
//! Walks the per-letter fighter lists and, optionally, each profile page for
//! the date of birth.

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::source::html::{element_text, selector};
use crate::source::session::{absolutize, FetchSession};

const FIGHTERS_PATH: &str = "/statistics/fighters";
/// Cells in a complete roster row
const FIGHTER_ROW_CELLS: usize = 11;

/// One fighter from a roster page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterListing {
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub height: String,
    pub weight: String,
    pub reach: String,
    pub stance: String,
    pub wins: String,
    pub losses: String,
    pub draws: String,
    pub belt: Option<String>,
    pub profile_url: String,
    /// As printed on the profile, e.g. "Jul 03, 1983"
    pub dob: Option<String>,
}

fn dob_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"DOB:\s*([A-Za-z]{3}\s+\d{2},\s+\d{4})").expect("dob pattern"))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Fighters on one roster page.
///
/// The roster table is the one whose first header cell reads "First". A page
/// without it lists nobody.
pub fn parse_fighter_list(html: &str, url: &str, base: &Url) -> Result<Vec<FighterListing>, SourceError> {
    let document = Html::parse_document(html);
    let table = selector(url, "table")?;
    let th = selector(url, "thead th")?;
    let tr = selector(url, "tbody tr")?;
    let td = selector(url, "td")?;
    let link = selector(url, "a[href]")?;

    let roster = document.select(&table).find(|t| {
        t.select(&th)
            .next()
            .map_or(false, |first| element_text(&first, " ").eq_ignore_ascii_case("first"))
    });
    let Some(roster) = roster else {
        debug!("No roster table at {}", url);
        return Ok(Vec::new());
    };

    let mut fighters = Vec::new();
    for row in roster.select(&tr) {
        let cols: Vec<ElementRef> = row.select(&td).collect();
        if cols.len() < FIGHTER_ROW_CELLS {
            continue;
        }
        let Some(a) = cols[0].select(&link).next() else {
            continue;
        };
        let Some(profile_url) = a.value().attr("href").and_then(|h| absolutize(base, h)) else {
            continue;
        };

        let cell = |i: usize| element_text(&cols[i], "");
        fighters.push(FighterListing {
            first_name: element_text(&a, " "),
            last_name: element_text(&cols[1], " "),
            nickname: non_empty(element_text(&cols[2], " ")),
            height: element_text(&cols[3], " "),
            weight: element_text(&cols[4], " "),
            reach: cell(5),
            stance: element_text(&cols[6], " "),
            wins: cell(7),
            losses: cell(8),
            draws: cell(9),
            belt: non_empty(cell(10)),
            profile_url,
            dob: None,
        });
    }
    Ok(fighters)
}

/// Date of birth from a fighter profile page.
///
/// Reads the "DOB:" item of the info box, falling back to a pattern search
/// over the whole page text.
pub fn parse_fighter_dob(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let url = "profile";
    let item = selector(url, "li.b-list__box-list-item").ok()?;
    let title = selector(url, ".b-list__box-list-item__title").ok()?;
    let value = selector(url, ".b-list__box-list-item__text").ok()?;

    for li in document.select(&item) {
        let Some(t) = li.select(&title).next() else {
            continue;
        };
        if !element_text(&t, " ").starts_with("DOB") {
            continue;
        }
        if let Some(v) = li.select(&value).next() {
            return Some(element_text(&v, " "));
        }
    }

    let text = element_text(&document.root_element(), " ");
    dob_pattern().captures(&text).map(|caps| caps[1].to_string())
}

/// Uppercase ASCII letters from `spec`, in order, without repeats
pub fn roster_letters(spec: &str) -> Vec<char> {
    let mut letters = Vec::new();
    for c in spec.chars().filter(char::is_ascii_alphabetic) {
        let c = c.to_ascii_uppercase();
        if !letters.contains(&c) {
            letters.push(c);
        }
    }
    letters
}

pub struct FighterRosterScraper {
    session: FetchSession,
}

impl FighterRosterScraper {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            session: FetchSession::new(config)?,
        })
    }

    /// Every fighter for one letter on a single `page=all` listing
    pub fn roster_url(&self, letter: char) -> Result<Url, SourceError> {
        let letter = letter.to_string();
        self.session
            .url_for(FIGHTERS_PATH, &[("char", letter.as_str()), ("page", "all")])
    }

    pub async fn roster(&self, letter: char) -> Result<Vec<FighterListing>, SourceError> {
        let url = self.roster_url(letter)?;
        let html = self.session.get_text(url.as_str()).await?;
        parse_fighter_list(&html, url.as_str(), self.session.base_url())
    }

    /// Profile fetch failures leave the date empty
    pub async fn fill_dob(&self, fighter: &mut FighterListing) {
        match self.session.get_text(&fighter.profile_url).await {
            Ok(html) => fighter.dob = parse_fighter_dob(&html),
            Err(e) => debug!("No profile for {} {}: {}", fighter.first_name, fighter.last_name, e),
        }
    }

    /// Rosters for `letters`; a failed letter is logged and skipped
    pub async fn scrape_fighters(&self, letters: &[char], with_dob: bool) -> Vec<FighterListing> {
        let mut fighters = Vec::new();
        for &letter in letters {
            let mut found = match self.roster(letter).await {
                Ok(found) => found,
                Err(e) => {
                    warn!("Skipping fighters starting with '{}': {}", letter, e);
                    continue;
                }
            };
            info!("Fighters starting with '{}': {}", letter, found.len());

            if with_dob {
                for fighter in &mut found {
                    self.fill_dob(fighter).await;
                }
            }
            fighters.extend(found);
        }
        fighters
    }
}

pub fn write_fighters_csv<P: AsRef<Path>>(path: P, fighters: &[FighterListing]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    for fighter in fighters {
        wtr.serialize(fighter)?;
    }
    wtr.flush()?;
    info!("Wrote {} fighters to {:?}", fighters.len(), path);
    Ok(())
}
