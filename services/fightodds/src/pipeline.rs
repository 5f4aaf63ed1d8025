//! End-to-end run: resolve fighters, read their odds pages, reconcile records

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

use crate::config::ResolverConfig;
use crate::linking::{
    clean_name, extract_observations, reconcile, FightRecord, Identity, NameResolver, OddsObservation,
    ReconciledFight,
};
use crate::records::StatusSummary;
use crate::source::OddsSource;

/// Output of one pipeline run
#[derive(Debug)]
pub struct LinkReport {
    /// One row per input record, in input order
    pub rows: Vec<ReconciledFight>,
    pub summary: StatusSummary,
    pub identities: BTreeMap<String, Identity>,
}

pub struct LinkPipeline<'a> {
    source: &'a dyn OddsSource,
    resolver_config: ResolverConfig,
    show_progress: bool,
}

impl<'a> LinkPipeline<'a> {
    pub fn new(source: &'a dyn OddsSource, resolver_config: ResolverConfig) -> Self {
        Self {
            source,
            resolver_config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, label: &'static str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(0).with_prefix(label);
        if let Ok(style) = ProgressStyle::with_template("{prefix:>10} [{bar:40}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }

    pub async fn run(&self, records: &[FightRecord]) -> LinkReport {
        let resolver = NameResolver::new(self.source, &self.resolver_config)
            .with_progress(self.progress_bar("Resolving"));
        let names = records.iter().flat_map(|r| [r.red.as_str(), r.blue.as_str()]);
        let identities = resolver.resolve_all(names).await;

        let pools = self.collect_pools(&identities).await;

        let empty: Vec<OddsObservation> = Vec::new();
        let rows: Vec<ReconciledFight> = records
            .iter()
            .map(|fight| {
                let (red, blue) = (clean_name(&fight.red), clean_name(&fight.blue));
                let red_pool = pools.get(&red).unwrap_or(&empty);
                let blue_pool = pools.get(&blue).unwrap_or(&empty);
                let locator = |name: &str| identities.get(name).and_then(|id| id.locator.as_deref());

                let result = reconcile(fight, red_pool, blue_pool)
                    .with_locators(locator(&red), locator(&blue));
                ReconciledFight {
                    fight: fight.clone(),
                    result,
                }
            })
            .collect();

        let summary = StatusSummary::from_rows(&rows);
        info!(
            "Reconciled {} records: {} matched, {} partial, {} no_match",
            summary.total(),
            summary.matched,
            summary.partial,
            summary.no_match
        );

        LinkReport {
            rows,
            summary,
            identities,
        }
    }

    /// Observation pool per resolved name; each page is fetched once
    async fn collect_pools(&self, identities: &BTreeMap<String, Identity>) -> HashMap<String, Vec<OddsObservation>> {
        let bar = self.progress_bar("Pages");
        bar.set_length(identities.values().filter(|id| id.is_resolved()).count() as u64);

        let mut by_locator: HashMap<String, Vec<OddsObservation>> = HashMap::new();
        let mut pools = HashMap::new();

        for (name, identity) in identities {
            let Some(locator) = identity.locator.as_deref() else {
                pools.insert(name.clone(), Vec::new());
                continue;
            };
            bar.set_message(name.clone());

            if !by_locator.contains_key(locator) {
                let observations = match self.source.fighter_page(locator).await {
                    Ok(page) => {
                        let subject = page.subject.as_deref().unwrap_or(&identity.display_name);
                        extract_observations(subject, &page.rows)
                    }
                    Err(e) => {
                        warn!("Failed to read odds page for {}: {}", name, e);
                        Vec::new()
                    }
                };
                by_locator.insert(locator.to_string(), observations);
            }

            let observations = by_locator.get(locator).cloned().unwrap_or_default();
            info!("[Parsed] {}: {} fights", name, observations.len());
            pools.insert(name.clone(), observations);
            bar.inc(1);
        }

        bar.finish_and_clear();
        pools
    }
}
