//! Loading fight records from CSV

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::linking::{clean_name, parse_record_date, FightRecord};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FightRow {
    event_name: Option<String>,
    event_date: Option<String>,
    fighter_red: Option<String>,
    fighter_blue: Option<String>,
}

/// True when `name` contains any placeholder token, ignoring case
pub fn is_placeholder(name: &str, placeholders: &[String]) -> bool {
    let lowered = name.to_lowercase();
    placeholders
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| lowered.contains(&p.to_lowercase()))
}

/// Read fight records, dropping placeholder rows and rows missing a corner
pub fn read_fight_records<R: Read>(reader: R, placeholders: &[String]) -> Result<Vec<FightRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (idx, row) in rdr.deserialize::<FightRow>().enumerate() {
        let row = row.with_context(|| format!("CSV parse error at record {}", idx + 1))?;

        let red = clean_name(row.fighter_red.as_deref().unwrap_or_default());
        let blue = clean_name(row.fighter_blue.as_deref().unwrap_or_default());
        if red.is_empty() || blue.is_empty() || is_placeholder(&red, placeholders) || is_placeholder(&blue, placeholders) {
            debug!("Dropping record {}: {:?} vs {:?}", idx + 1, red, blue);
            dropped += 1;
            continue;
        }

        let raw_date = row.event_date.filter(|d| !d.trim().is_empty());
        records.push(FightRecord {
            event_name: row.event_name.unwrap_or_default(),
            event_date: raw_date.as_deref().and_then(parse_record_date),
            event_date_raw: raw_date,
            red,
            blue,
        });
    }

    info!("Loaded {} fight records ({} dropped)", records.len(), dropped);
    Ok(records)
}

pub fn load_fight_records<P: AsRef<Path>>(path: P, placeholders: &[String]) -> Result<Vec<FightRecord>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open fight records {:?}", path.as_ref()))?;
    read_fight_records(file, placeholders)
}
