use anyhow::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::html::{element_text, selector};
use super::session::{absolutize, FetchSession};
use super::traits::{FighterPage, OddsSource, SearchCandidate};
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::linking::{clean_name, TableRow};

/// Path fragment identifying fighter page links
pub const FIGHTER_LINK_PATTERN: &str = "/fighters/";
/// Class marking the page fighter's row of a matchup
pub const PRIMARY_ROW_CLASS: &str = "main-row";

pub struct BestFightOdds {
    session: FetchSession,
}

impl BestFightOdds {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            session: FetchSession::new(config)?,
        })
    }
}

#[async_trait]
impl OddsSource for BestFightOdds {
    fn name(&self) -> &str {
        "bestfightodds"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SourceError> {
        let url = self.session.url_for("/search", &[("query", query)])?;
        let html = self.session.get_text(url.as_str()).await?;
        Ok(parse_search_results(&html, self.session.base_url()))
    }

    async fn fighter_page(&self, url: &str) -> Result<FighterPage, SourceError> {
        let html = self.session.get_text(url).await?;
        parse_fighter_page(&html, url, self.session.base_url())
    }
}

/// Fighter links on a search results page, in document order
pub fn parse_search_results(html: &str, base: &Url) -> Vec<SearchCandidate> {
    let document = Html::parse_document(html);
    let Ok(links) = Selector::parse("a[href*=\"/fighters/\"]") else {
        return Vec::new();
    };

    document
        .select(&links)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let name = clean_name(&element_text(&a, " "));
            if name.is_empty() || !href.contains(FIGHTER_LINK_PATTERN) {
                return None;
            }
            Some(SearchCandidate {
                display_name: name,
                locator: absolutize(base, href)?,
            })
        })
        .collect()
}

/// Reduce a fighter page to its heading and odds table rows.
///
/// Rows are the direct `tr` children of the first `tbody`, falling back to
/// every `tr` in the document. A page without any row is a structure error.
pub fn parse_fighter_page(html: &str, url: &str, base: &Url) -> Result<FighterPage, SourceError> {
    let document = Html::parse_document(html);

    let heading = selector(url, "h1")?;
    let tbody = selector(url, "tbody")?;
    let tr = selector(url, "tr")?;
    let opponent = selector(url, "th.oppcell a")?;
    let moneyline = selector(url, "td.moneyline span")?;
    let date_cell = selector(url, "td.item-non-mobile")?;
    let link = selector(url, "a[href]")?;

    let subject = document
        .select(&heading)
        .next()
        .map(|h| clean_name(&element_text(&h, "")))
        .filter(|s| !s.is_empty());

    let row_elements: Vec<ElementRef> = match document.select(&tbody).next() {
        Some(body) => {
            let direct: Vec<ElementRef> = body
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "tr")
                .collect();
            if direct.is_empty() {
                body.select(&tr).collect()
            } else {
                direct
            }
        }
        None => document.select(&tr).collect(),
    };

    if row_elements.is_empty() {
        return Err(SourceError::structure(url, "no table rows"));
    }

    let rows = row_elements
        .iter()
        .map(|row| TableRow {
            primary: row.value().classes().any(|c| c == PRIMARY_ROW_CLASS),
            opponent: row
                .select(&opponent)
                .next()
                .map(|a| clean_name(&element_text(&a, ""))),
            odds_cells: row
                .select(&moneyline)
                .map(|span| element_text(&span, ""))
                .filter(|t| !t.is_empty())
                .collect(),
            date_cells: row.select(&date_cell).map(|td| element_text(&td, " ")).collect(),
            links: row
                .select(&link)
                .filter_map(|a| a.value().attr("href"))
                .filter_map(|href| absolutize(base, href))
                .collect(),
        })
        .collect();

    Ok(FighterPage {
        url: url.to_string(),
        subject,
        rows,
    })
}
