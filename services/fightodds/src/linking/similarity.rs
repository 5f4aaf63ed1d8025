//! Approximate name similarity used when no exact name match exists

use std::collections::BTreeSet;
use strsim::normalized_levenshtein;

/// Pluggable similarity scoring between a query and a candidate name
pub trait SimilarityScorer: Send + Sync {
    /// Similarity in the range 0..=100
    fn score(&self, query: &str, candidate: &str) -> f64;

    fn name(&self) -> &str;
}

/// Weighted ratio in the style of fuzzywuzzy's `WRatio`.
///
/// Combines a plain ratio with token-sort, token-set and partial (substring
/// window) ratios, scaling the alternatives down so that a plain full match
/// always wins. Base ratio is normalized Levenshtein similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

const UNBASE_SCALE: f64 = 0.95;

impl SimilarityScorer for WeightedRatio {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        let a = preprocess(query);
        let b = preprocess(candidate);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let len_a = a.chars().count() as f64;
        let len_b = b.chars().count() as f64;
        let len_ratio = len_a.max(len_b) / len_a.min(len_b);

        let base = ratio(&a, &b);
        if len_ratio < 1.5 {
            let tokens = token_sort_ratio(&a, &b).max(token_set_ratio(&a, &b));
            return base.max(tokens * UNBASE_SCALE);
        }

        let partial_scale = if len_ratio <= 8.0 { 0.9 } else { 0.6 };
        let partial = base.max(partial_ratio(&a, &b) * partial_scale);
        partial.max(partial_token_ratio(&a, &b) * UNBASE_SCALE * partial_scale)
    }

    fn name(&self) -> &str {
        "weighted_ratio"
    }
}

/// Lowercase, punctuation to spaces, collapsed whitespace
fn preprocess(s: &str) -> String {
    let mapped: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

fn tokens(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

fn sorted_tokens(s: &str) -> String {
    let mut t: Vec<&str> = s.split_whitespace().collect();
    t.sort_unstable();
    t.join(" ")
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    let join = |set: Vec<&&str>| set.into_iter().copied().collect::<Vec<_>>().join(" ");

    let common = join(ta.intersection(&tb).collect());
    let only_a = join(ta.difference(&tb).collect());
    let only_b = join(tb.difference(&ta).collect());

    let combined_a = format!("{} {}", common, only_a).trim().to_string();
    let combined_b = format!("{} {}", common, only_b).trim().to_string();

    let mut best = ratio(&combined_a, &combined_b);
    if !common.is_empty() {
        best = best
            .max(ratio(&common, &combined_a))
            .max(ratio(&common, &combined_b));
    }
    best
}

/// Best ratio of the shorter string against every equal-length window of the longer
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    let long_chars: Vec<char> = long.chars().collect();
    let width = short.chars().count();
    if width == 0 {
        return 0.0;
    }

    let mut best: f64 = 0.0;
    for start in 0..=(long_chars.len() - width) {
        let window: String = long_chars[start..start + width].iter().collect();
        best = best.max(ratio(short, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.intersection(&tb).next().is_some() {
        return 100.0;
    }
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}
