//! Fighter roster scraper
//!
//! Usage:
//!   fightodds_fighters --output ufc_fighters.csv
//!   fightodds_fighters --output roster.csv --letters abc --no-dob

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use fightodds::config::Config;
use fightodds::records::{roster_letters, write_fighters_csv, FighterRosterScraper};

#[derive(Parser)]
#[command(name = "fightodds_fighters")]
#[command(about = "Scrape the fighter roster, with dates of birth, into a CSV")]
struct Cli {
    #[arg(long, default_value = "ufc_fighters.csv")]
    output: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Roster letters to walk
    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ")]
    letters: String,

    /// Skip the per-fighter profile fetch
    #[arg(long)]
    no_dob: bool,

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
    let scraper = FighterRosterScraper::new(&config.fight_source.source())?;

    let letters = roster_letters(&cli.letters);
    if letters.is_empty() {
        bail!("No letters in {:?}", cli.letters);
    }

    let bar = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(letters.len() as u64)
    };
    if let Ok(style) = ProgressStyle::with_template("Letters [{bar:40}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }

    let mut fighters = Vec::new();
    for letter in letters {
        bar.set_message(letter.to_string());
        fighters.extend(scraper.scrape_fighters(&[letter], !cli.no_dob).await);
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!("Fighters found: {}", fighters.len());
    write_fighters_csv(&cli.output, &fighters)?;
    Ok(())
}
