//! Scraper for completed events and their bouts on ufcstats.com
//!
//! Produces the fight record CSV consumed by the linking pipeline.

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

const EVENTS_PATH: &str = "/statistics/events/completed";
/// Cells in a complete bout row
const FIGHT_ROW_CELLS: usize = 10;

/// One completed event from the events list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventListing {
    pub event_name: String,
    /// Date text as listed, e.g. "November 11, 2023"
    pub event_date: String,
    pub location: String,
    pub link: String,
}

/// One bout from an event page; red is the first-listed fighter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedFight {
    pub event_name: String,
    pub event_date: String,
    pub fighter_red: String,
    pub fighter_blue: String,
    /// First-listed fighter; the site lists the winner first
    pub winner: String,
    pub kd_red: String,
    pub kd_blue: Option<String>,
    pub str_red: String,
    pub str_blue: Option<String>,
    pub td_red: String,
    pub td_blue: Option<String>,
    pub sub_red: String,
    pub sub_blue: Option<String>,
    pub weight_class: String,
    pub method: String,
    pub round: String,
    pub time: String,
    pub fight_link: Option<String>,
}

fn onclick_href() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"href='([^']+)'").expect("onclick href pattern"))
}

/// Red and blue values of a stat cell holding one `<p>` per fighter
fn stat_pair(cell: &ElementRef) -> (String, Option<String>) {
    let text = element_text(cell, "|");
    let mut parts = text.split('|');
    let red = parts.next().unwrap_or_default().to_string();
    (red, parts.next().map(str::to_string))
}

/// Events on one page of the completed-events list
pub fn parse_events_page(html: &str, url: &str, base: &Url) -> Result<Vec<EventListing>, SourceError> {
    let document = Html::parse_document(html);
    let table = selector(url, "table.b-statistics__table-events")?;
    let tr = selector(url, "tbody tr")?;
    let td = selector(url, "td")?;
    let content = selector(url, "i.b-statistics__table-content")?;
    let link = selector(url, "a[href]")?;
    let date = selector(url, "span.b-statistics__date")?;

    let Some(table) = document.select(&table).next() else {
        return Err(SourceError::structure(url, "events table missing"));
    };

    let mut events = Vec::new();
    for row in table.select(&tr) {
        let cols: Vec<_> = row.select(&td).collect();
        if cols.len() < 2 {
            continue;
        }
        let Some(cell) = cols[0].select(&content).next() else {
            continue;
        };
        let Some(a) = cell.select(&link).next() else {
            continue;
        };
        let Some(href) = a.value().attr("href").and_then(|h| absolutize(base, h)) else {
            continue;
        };

        events.push(EventListing {
            event_name: element_text(&a, " "),
            event_date: cell.select(&date).next().map(|d| element_text(&d, " ")).unwrap_or_default(),
            location: element_text(&cols[1], " "),
            link: href,
        });
    }
    Ok(events)
}

/// Bouts listed on an event page
pub fn parse_event_fights(html: &str, event: &EventListing, base: &Url) -> Result<Vec<ScrapedFight>, SourceError> {
    let url = event.link.as_str();
    let document = Html::parse_document(html);
    let table = selector(url, "table.b-fight-details__table")?;
    let tr = selector(url, "tbody tr")?;
    let td = selector(url, "td")?;
    let link = selector(url, "a")?;

    let Some(table) = document.select(&table).next() else {
        return Err(SourceError::structure(url, "fight table missing"));
    };

    let mut fights = Vec::new();
    for row in table.select(&tr) {
        let cols: Vec<_> = row.select(&td).collect();
        if cols.len() < FIGHT_ROW_CELLS {
            continue;
        }

        let fighters: Vec<String> = cols[1].select(&link).map(|a| element_text(&a, "")).collect();
        let [red, blue, ..] = fighters.as_slice() else {
            debug!("Skipping bout row with fewer than two fighters at {}", url);
            continue;
        };

        let fight_link = row
            .value()
            .attr("onclick")
            .and_then(|onclick| onclick_href().captures(onclick))
            .map(|caps| caps[1].to_string())
            .or_else(|| {
                cols[0]
                    .select(&link)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .and_then(|h| absolutize(base, h))
            });

        let (kd_red, kd_blue) = stat_pair(&cols[2]);
        let (str_red, str_blue) = stat_pair(&cols[3]);
        let (td_red, td_blue) = stat_pair(&cols[4]);
        let (sub_red, sub_blue) = stat_pair(&cols[5]);

        fights.push(ScrapedFight {
            event_name: event.event_name.clone(),
            event_date: event.event_date.clone(),
            fighter_red: red.clone(),
            fighter_blue: blue.clone(),
            winner: red.clone(),
            kd_red,
            kd_blue,
            str_red,
            str_blue,
            td_red,
            td_blue,
            sub_red,
            sub_blue,
            weight_class: element_text(&cols[6], ""),
            method: element_text(&cols[7], " "),
            round: element_text(&cols[8], ""),
            time: element_text(&cols[9], ""),
            fight_link,
        });
    }
    Ok(fights)
}

pub struct UfcStatsScraper {
    session: FetchSession,
}

impl UfcStatsScraper {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            session: FetchSession::new(config)?,
        })
    }

    /// Page 1 is the bare list path; later pages add `?page=N`
    pub fn events_page_url(&self, page: usize) -> Result<Url, SourceError> {
        if page <= 1 {
            self.session.url_for(EVENTS_PATH, &[])
        } else {
            let page = page.to_string();
            self.session.url_for(EVENTS_PATH, &[("page", page.as_str())])
        }
    }

    pub async fn events_page(&self, page: usize) -> Result<Vec<EventListing>, SourceError> {
        let url = self.events_page_url(page)?;
        let html = self.session.get_text(url.as_str()).await?;
        parse_events_page(&html, url.as_str(), self.session.base_url())
    }

    /// Walk the events list until a page yields no events.
    ///
    /// A failure on the first page is returned; a failure on a later page
    /// ends the walk with what was collected so far.
    pub async fn scrape_events(&self, limit: Option<usize>) -> Result<Vec<EventListing>, SourceError> {
        let mut events = Vec::new();
        let mut page = 1;

        loop {
            let found = match self.events_page(page).await {
                Ok(found) => found,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    warn!("Stopping event list at page {}: {}", page, e);
                    break;
                }
            };
            if found.is_empty() {
                break;
            }
            info!("Events page {}: {} events", page, found.len());
            events.extend(found);

            if limit.map_or(false, |max| events.len() >= max) {
                break;
            }
            page += 1;
        }

        if let Some(max) = limit {
            events.truncate(max);
        }
        Ok(events)
    }

    pub async fn scrape_fights(&self, event: &EventListing) -> Result<Vec<ScrapedFight>, SourceError> {
        let html = self.session.get_text(&event.link).await?;
        parse_event_fights(&html, event, self.session.base_url())
    }
}

pub fn write_fights_csv<P: AsRef<Path>>(path: P, fights: &[ScrapedFight]) -> Result<()> {
    write_rows(path.as_ref(), fights)?;
    info!("Wrote {} fights to {:?}", fights.len(), path.as_ref());
    Ok(())
}

pub fn write_events_csv<P: AsRef<Path>>(path: P, events: &[EventListing]) -> Result<()> {
    write_rows(path.as_ref(), events)?;
    info!("Wrote {} events to {:?}", events.len(), path.as_ref());
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
