//! Resolve fighter names to their page on the odds site

use indicatif::ProgressBar;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use crate::config::ResolverConfig;
use crate::error::SourceError;
use crate::linking::names::{clean_name, normalize_name};
use crate::linking::similarity::{SimilarityScorer, WeightedRatio};
use crate::linking::types::{ConfidenceTier, Identity};
use crate::source::{OddsSource, SearchCandidate};

pub struct NameResolver<'a> {
    source: &'a dyn OddsSource,
    scorer: Option<Box<dyn SimilarityScorer>>,
    threshold: f64,
    progress: ProgressBar,
}

impl<'a> NameResolver<'a> {
    pub fn new(source: &'a dyn OddsSource, config: &ResolverConfig) -> Self {
        let scorer: Option<Box<dyn SimilarityScorer>> = if config.fuzzy_enabled {
            Some(Box::new(WeightedRatio))
        } else {
            None
        };
        Self {
            source,
            scorer,
            threshold: config.fuzzy_threshold,
            progress: ProgressBar::hidden(),
        }
    }

    /// Replace the similarity scorer used for fuzzy matching
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Advance `progress` once per name in [`resolve_all`](Self::resolve_all)
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Search the odds site and pick the best candidate.
    ///
    /// Only a failed search request is an error; no hits gives a `None` tier.
    pub async fn resolve(&self, query: &str) -> Result<Identity, SourceError> {
        let candidates = self.source.search(&clean_name(query)).await?;
        Ok(select_candidate(
            query,
            &candidates,
            self.scorer.as_deref(),
            self.threshold,
        ))
    }

    /// Resolve each distinct name once, in sorted order.
    ///
    /// A failed search degrades that name to an unresolved identity.
    pub async fn resolve_all<I, S>(&self, names: I) -> BTreeMap<String, Identity>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = names
            .into_iter()
            .map(|n| clean_name(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();

        self.progress.set_length(unique.len() as u64);
        let mut resolved = BTreeMap::new();
        for name in unique {
            self.progress.set_message(name.clone());
            let identity = match self.resolve(&name).await {
                Ok(identity) => identity,
                Err(e) => {
                    warn!("Search failed for {}: {}", name, e);
                    Identity::unresolved(&name)
                }
            };
            info!(
                "[Fighter URL] {} -> {} ({})",
                name,
                identity.locator.as_deref().unwrap_or("-"),
                identity.tier
            );
            resolved.insert(name, identity);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();
        resolved
    }
}

/// Choose among search candidates: exact normalized name, then best fuzzy
/// score at or above `threshold`, then the first candidate.
pub fn select_candidate(
    query: &str,
    candidates: &[SearchCandidate],
    scorer: Option<&dyn SimilarityScorer>,
    threshold: f64,
) -> Identity {
    let Some(first) = candidates.first() else {
        return Identity::unresolved(query);
    };

    let identity = |candidate: &SearchCandidate, tier: ConfidenceTier, score: Option<f64>| Identity {
        query: query.to_string(),
        display_name: clean_name(&candidate.display_name),
        locator: Some(candidate.locator.clone()),
        tier,
        score,
    };

    let wanted = normalize_name(query);
    if let Some(exact) = candidates
        .iter()
        .find(|c| normalize_name(&c.display_name) == wanted)
    {
        return identity(exact, ConfidenceTier::Exact, None);
    }

    if let Some(scorer) = scorer {
        let mut best: Option<(&SearchCandidate, f64)> = None;
        for candidate in candidates {
            let score = scorer.score(query, &candidate.display_name);
            // strict comparison keeps the earliest candidate on ties
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        if let Some((candidate, score)) = best {
            if score >= threshold {
                return identity(candidate, ConfidenceTier::Fuzzy, Some(score));
            }
        }
    }

    identity(first, ConfidenceTier::Fallback, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;

    fn candidates(names: &[(&str, &str)]) -> Vec<SearchCandidate> {
        names
            .iter()
            .map(|(name, url)| SearchCandidate::new(name, url))
            .collect()
    }

    /// Scores by a fixed table, for tie-break tests
    struct FixedScorer(Vec<(&'static str, f64)>);

    impl SimilarityScorer for FixedScorer {
        fn score(&self, _query: &str, candidate: &str) -> f64 {
            self.0
                .iter()
                .find(|(name, _)| *name == candidate)
                .map(|(_, s)| *s)
                .unwrap_or(0.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_no_candidates_is_unresolved() {
        let id = select_candidate("Jon Jones", &[], Some(&WeightedRatio), 90.0);
        assert_eq!(id.tier, ConfidenceTier::None);
        assert_eq!(id.locator, None);
    }

    #[test]
    fn test_exact_match_wins_over_earlier_candidates() {
        let c = candidates(&[
            ("Jon Jonesy", "/fighters/a"),
            ("JON  JONES", "/fighters/b"),
            ("Jon Jones", "/fighters/c"),
        ]);
        let id = select_candidate(" jon jones", &c, Some(&WeightedRatio), 90.0);
        assert_eq!(id.tier, ConfidenceTier::Exact);
        assert_eq!(id.locator.as_deref(), Some("/fighters/b"));
        // display name keeps the source's casing
        assert_eq!(id.display_name, "JON JONES");
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let c = candidates(&[
            ("Khabib Nurmagomedov", "/fighters/k"),
            ("Alex Pereira Jr", "/fighters/p"),
        ]);
        let id = select_candidate("Alex Pereira", &c, Some(&WeightedRatio), 90.0);
        assert_eq!(id.tier, ConfidenceTier::Fuzzy);
        assert_eq!(id.locator.as_deref(), Some("/fighters/p"));
        assert!(id.score.unwrap() >= 90.0);
    }

    #[test]
    fn test_fuzzy_tie_keeps_first_candidate() {
        let c = candidates(&[("A", "/fighters/a"), ("B", "/fighters/b")]);
        let scorer = FixedScorer(vec![("A", 95.0), ("B", 95.0)]);
        let id = select_candidate("query", &c, Some(&scorer), 90.0);
        assert_eq!(id.tier, ConfidenceTier::Fuzzy);
        assert_eq!(id.locator.as_deref(), Some("/fighters/a"));
    }

    #[test]
    fn test_score_at_threshold_is_fuzzy() {
        let c = candidates(&[("A", "/fighters/a"), ("B", "/fighters/b")]);
        let scorer = FixedScorer(vec![("A", 40.0), ("B", 90.0)]);
        let id = select_candidate("query", &c, Some(&scorer), 90.0);
        assert_eq!(id.tier, ConfidenceTier::Fuzzy);
        assert_eq!(id.locator.as_deref(), Some("/fighters/b"));
        assert_eq!(id.score, Some(90.0));
    }

    #[test]
    fn test_fallback_to_first_candidate() {
        let c = candidates(&[("A", "/fighters/a"), ("B", "/fighters/b")]);
        let scorer = FixedScorer(vec![("A", 40.0), ("B", 89.9)]);
        let id = select_candidate("query", &c, Some(&scorer), 90.0);
        assert_eq!(id.tier, ConfidenceTier::Fallback);
        assert_eq!(id.locator.as_deref(), Some("/fighters/a"));

        // no scorer configured: straight to fallback
        let c = candidates(&[("Khabib Nurmagomedov", "/fighters/k"), ("Alex Pereira Jr", "/fighters/p")]);
        let id = select_candidate("Alex Pereira", &c, None, 90.0);
        assert_eq!(id.tier, ConfidenceTier::Fallback);
        assert_eq!(id.locator.as_deref(), Some("/fighters/k"));
    }

    #[tokio::test]
    async fn test_resolve_all_isolates_search_failures() {
        let source = MockSource::new("mock")
            .with_search("Jon Jones", vec![SearchCandidate::new("Jon Jones", "https://odds.test/fighters/jj")])
            .fail_on("Stipe Miocic");
        let resolver = NameResolver::new(&source, &ResolverConfig::default());

        let resolved = resolver
            .resolve_all(["Jon  Jones", "Stipe Miocic", "Jon Jones", "Nobody Known", " "])
            .await;

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved["Jon Jones"].tier, ConfidenceTier::Exact);
        assert_eq!(resolved["Stipe Miocic"].tier, ConfidenceTier::None);
        assert_eq!(resolved["Nobody Known"].tier, ConfidenceTier::None);
        // one search per distinct name
        assert_eq!(source.search_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_with_custom_scorer() {
        let source = MockSource::new("mock").with_search(
            "Jon Jones",
            candidates(&[("Jonny Bones", "/fighters/a"), ("Bones Jones", "/fighters/b")]),
        );
        let resolver = NameResolver::new(&source, &ResolverConfig::default())
            .with_scorer(Box::new(FixedScorer(vec![("Bones Jones", 97.0)])));

        let id = resolver.resolve("Jon Jones").await.unwrap();
        assert_eq!(id.tier, ConfidenceTier::Fuzzy);
        assert_eq!(id.locator.as_deref(), Some("/fighters/b"));
        assert_eq!(id.score, Some(97.0));
    }

    #[tokio::test]
    async fn test_resolve_propagates_fetch_error() {
        let source = MockSource::new("mock").fail_on("Jon Jones");
        let resolver = NameResolver::new(&source, &ResolverConfig::default());
        assert!(resolver.resolve("Jon Jones").await.is_err());
    }
}
