//! Output writing for reconciled fights (CSV)

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::linking::{MatchStatus, ReconciledFight};

/// One output line; field order is the column order
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    event_name: &'a str,
    event_date: String,
    fighter_red: &'a str,
    fighter_blue: &'a str,
    red_open: Option<&'a str>,
    blue_open: Option<&'a str>,
    red_close_low: Option<&'a str>,
    red_close_high: Option<&'a str>,
    blue_close_low: Option<&'a str>,
    blue_close_high: Option<&'a str>,
    red_open_decimal: Option<f64>,
    blue_open_decimal: Option<f64>,
    red_locator: Option<&'a str>,
    blue_locator: Option<&'a str>,
    event_locator: Option<&'a str>,
    match_status: &'static str,
}

impl<'a> From<&'a ReconciledFight> for OutputRow<'a> {
    fn from(row: &'a ReconciledFight) -> Self {
        let (fight, r) = (&row.fight, &row.result);
        Self {
            event_name: &fight.event_name,
            event_date: fight
                .event_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            fighter_red: &fight.red,
            fighter_blue: &fight.blue,
            red_open: r.red_open.as_deref(),
            blue_open: r.blue_open.as_deref(),
            red_close_low: r.red_close_low.as_deref(),
            red_close_high: r.red_close_high.as_deref(),
            blue_close_low: r.blue_close_low.as_deref(),
            blue_close_high: r.blue_close_high.as_deref(),
            red_open_decimal: r.red_open_decimal,
            blue_open_decimal: r.blue_open_decimal,
            red_locator: r.red_locator.as_deref(),
            blue_locator: r.blue_locator.as_deref(),
            event_locator: r.event_locator.as_deref(),
            match_status: r.status.as_str(),
        }
    }
}

/// Write reconciled rows as CSV with a header line
pub fn write_reconciled<W: Write>(writer: W, rows: &[ReconciledFight]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in rows {
        wtr.serialize(OutputRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_reconciled_csv<P: AsRef<Path>>(path: P, rows: &[ReconciledFight]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output {:?}", path))?;
    write_reconciled(file, rows)?;

    tracing::info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Counts of reconciliation outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub matched: usize,
    pub partial: usize,
    pub no_match: usize,
}

impl StatusSummary {
    pub fn from_rows(rows: &[ReconciledFight]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            summary.record(row.result.status);
        }
        summary
    }

    pub fn record(&mut self, status: MatchStatus) {
        match status {
            MatchStatus::Matched => self.matched += 1,
            MatchStatus::Partial => self.partial += 1,
            MatchStatus::NoMatch => self.no_match += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.matched + self.partial + self.no_match
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:>6}", "status", "count")?;
        writeln!(f, "{:<10} {:>6}", MatchStatus::Matched, self.matched)?;
        writeln!(f, "{:<10} {:>6}", MatchStatus::Partial, self.partial)?;
        writeln!(f, "{:<10} {:>6}", MatchStatus::NoMatch, self.no_match)?;
        write!(f, "{:<10} {:>6}", "total", self.total())
    }
}
