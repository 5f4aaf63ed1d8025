//! Completed-event fight record scraper
//!
//! Usage:
//!   fightodds_fights --output ufc_fights.csv
//!   fightodds_fights --output ufc_fights.csv --events-output events.csv --limit-events 5

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use fightodds::config::Config;
use fightodds::records::{write_events_csv, write_fights_csv, UfcStatsScraper};

#[derive(Parser)]
#[command(name = "fightodds_fights")]
#[command(about = "Scrape completed events and their bouts into a fight record CSV")]
struct Cli {
    #[arg(long, default_value = "ufc_fights.csv")]
    output: PathBuf,

    #[arg(long, default_value = "ufc_events.csv")]
    events_output: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many events (newest first)
    #[arg(long)]
    limit_events: Option<usize>,

    #[arg(long)]
    no_progress: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    let scraper = UfcStatsScraper::new(&config.fight_source.source())?;

    let events = scraper.scrape_events(cli.limit_events).await?;
    println!("Events found: {}", events.len());
    write_events_csv(&cli.events_output, &events)?;

    let bar = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(events.len() as u64)
    };
    if let Ok(style) = ProgressStyle::with_template("Events [{bar:40}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }

    let mut fights = Vec::new();
    for event in &events {
        bar.set_message(event.event_name.clone());
        match scraper.scrape_fights(event).await {
            Ok(found) => {
                tracing::info!("{}: {} fights", event.event_name, found.len());
                fights.extend(found);
            }
            Err(e) => tracing::warn!("Skipping event {}: {}", event.event_name, e),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!("Fights found: {}", fights.len());
    write_fights_csv(&cli.output, &fights)?;
    Ok(())
}
