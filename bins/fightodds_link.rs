//! Fight record → odds history linking CLI
//!
//! Usage:
//!   fightodds_link resolve --name "Jon Jones" --name "Stipe Miocic"
//!   fightodds_link extract --url https://www.bestfightodds.com/fighters/Jon-Jones-819
//!   fightodds_link run --input ufc_fights.csv --output ufc_fight_odds.csv
//!   fightodds_link run --input ufc_fights.csv --output out.csv --fixture fixture.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use fightodds::config::Config;
use fightodds::linking::{extract_observations, NameResolver};
use fightodds::pipeline::LinkPipeline;
use fightodds::records::{load_fight_records, write_reconciled_csv};
use fightodds::source::{BestFightOdds, MockFixture, MockSource, OddsSource};

#[derive(Parser)]
#[command(name = "fightodds_link")]
#[command(about = "Link fight records to historical betting odds")]
struct Cli {
    /// TOML config file; built-in defaults when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve searches and pages from a JSON fixture instead of the live site
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve fighter names to odds pages
    Resolve {
        #[arg(long = "name", required = true)]
        names: Vec<String>,
    },
    /// Print the odds observations found on one fighter page
    Extract {
        #[arg(long)]
        url: String,
    },
    /// Reconcile a fight record CSV against the odds site
    Run {
        #[arg(long, default_value = "ufc_fights.csv")]
        input: PathBuf,
        #[arg(long, default_value = "ufc_fight_odds.csv")]
        output: PathBuf,
        #[arg(long)]
        no_progress: bool,
    },
}

fn build_source(config: &Config, fixture: Option<&Path>) -> Result<Box<dyn OddsSource>> {
    match fixture {
        Some(path) => {
            let fixture = MockFixture::load(path)?;
            Ok(Box::new(MockSource::from_fixture(fixture)?))
        }
        None => Ok(Box::new(BestFightOdds::new(&config.odds_source)?)),
    }
}

async fn run_resolve_command(config: &Config, source: &dyn OddsSource, names: &[String]) -> Result<()> {
    let resolver = NameResolver::new(source, &config.resolver);
    let identities = resolver.resolve_all(names).await;
    for identity in identities.values() {
        println!("{}", serde_json::to_string(identity)?);
    }
    Ok(())
}

async fn run_extract_command(source: &dyn OddsSource, url: &str) -> Result<()> {
    let page = source
        .fighter_page(url)
        .await
        .with_context(|| format!("Failed to read {}", url))?;
    let subject = page.subject.clone().unwrap_or_default();
    tracing::info!("Page {} ({}): {} rows", url, subject, page.rows.len());

    for obs in extract_observations(&subject, &page.rows) {
        println!("{}", serde_json::to_string(&obs)?);
    }
    Ok(())
}

async fn run_link_command(
    config: &Config,
    source: &dyn OddsSource,
    input: &Path,
    output: &Path,
    progress: bool,
) -> Result<()> {
    tracing::info!("Linking {:?} via {} -> {:?}", input, source.name(), output);

    let records = load_fight_records(input, &config.input.placeholder_tokens)?;
    let report = LinkPipeline::new(source, config.resolver.clone())
        .with_progress(progress)
        .run(&records)
        .await;

    write_reconciled_csv(output, &report.rows)?;
    println!("{}", report.summary);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    let source = build_source(&config, cli.fixture.as_deref())?;

    match cli.command {
        Commands::Resolve { names } => {
            run_resolve_command(&config, source.as_ref(), &names).await?;
        }
        Commands::Extract { url } => {
            run_extract_command(source.as_ref(), &url).await?;
        }
        Commands::Run { input, output, no_progress } => {
            run_link_command(&config, source.as_ref(), &input, &output, !no_progress).await?;
        }
    }

    Ok(())
}
