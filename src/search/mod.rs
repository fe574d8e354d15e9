//! Search strategy
//!
//! Turns a raw query into a ranked dish list: normalize, expand each query
//! token through the metric index, union the matched dishes, score, sort.
//! Stateless per call; every worker shares one engine over the immutable
//! catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::index::Catalog;
use crate::types::{DishId, SearchHit};

/// Tunable search thresholds
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum edit distance for token expansion
    pub max_distance: u32,
    /// Maximum number of hits returned per query
    pub limit: usize,
    /// Weight of the token-frequency prior in the rank.
    ///
    /// Must stay well below the closeness gap 1/(1+d) - 1/(2+d) for the
    /// configured max_distance, so a closer match always outranks a more
    /// frequent one.
    pub frequency_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_distance: 1,
            limit: 20,
            frequency_weight: 0.01,
        }
    }
}

/// Best vocabulary match found for one query token on one dish
#[derive(Debug, Clone, Copy)]
struct TokenMatch {
    distance: u32,
    frequency: usize,
}

impl TokenMatch {
    /// Prefer smaller distance, then higher frequency
    fn better_than(&self, other: &TokenMatch) -> bool {
        self.distance < other.distance
            || (self.distance == other.distance && self.frequency > other.frequency)
    }
}

/// Executes queries against a shared immutable catalog
#[derive(Debug, Clone)]
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>, config: SearchConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Run one query, producing at most `config.limit` ranked hits
    ///
    /// Rank is the sum, over distinct query tokens that matched the dish,
    /// of `1/(1 + d) + frequency_weight * ln(1 + freq)` where d is the best
    /// edit distance for that token and freq the matched token's dish
    /// count. Ties keep dataset discovery order.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let tokens = self.catalog.normalizer().normalize(query);
        if tokens.is_empty() {
            return Err(Error::InvalidQuery(
                "query contains no searchable words".to_string(),
            ));
        }

        tracing::debug!(query, tokens = tokens.len(), "searching");

        // Per dish, the best match found for each query token position.
        let mut candidates: BTreeMap<DishId, Vec<Option<TokenMatch>>> = BTreeMap::new();

        for (position, token) in tokens.iter().enumerate() {
            for (vocab_token, distance) in self
                .catalog
                .similarities()
                .query(token, self.config.max_distance)
            {
                let frequency = self.catalog.frequency(&vocab_token);
                let candidate = TokenMatch {
                    distance,
                    frequency,
                };

                for dish in self.catalog.dishes_for(&vocab_token) {
                    let slots = candidates
                        .entry(dish)
                        .or_insert_with(|| vec![None; tokens.len()]);
                    match &slots[position] {
                        Some(best) if !candidate.better_than(best) => {}
                        _ => slots[position] = Some(candidate),
                    }
                }
            }
        }

        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .map(|(dish, slots)| {
                let rank = slots
                    .iter()
                    .flatten()
                    .map(|m| self.token_score(m))
                    .sum::<f64>();
                SearchHit { dish, rank }
            })
            .collect();

        // Stable sort keeps discovery order among equal ranks.
        hits.sort_by(|a, b| b.rank.total_cmp(&a.rank));
        hits.truncate(self.config.limit);

        tracing::debug!(query, hits = hits.len(), "search finished");
        Ok(hits)
    }

    fn token_score(&self, m: &TokenMatch) -> f64 {
        let closeness = 1.0 / (1.0 + m.distance as f64);
        let prior = self.config.frequency_weight * (1.0 + m.frequency as f64).ln();
        closeness + prior
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Normalizer;

    fn engine(rows: &[&str], stop_words: &[&str]) -> SearchEngine {
        let normalizer = Normalizer::new(stop_words.iter().map(|w| w.to_string()).collect());
        let catalog = Catalog::build(rows.iter(), normalizer).unwrap();
        SearchEngine::new(Arc::new(catalog), SearchConfig::default())
    }

    fn names(engine: &SearchEngine, query: &str) -> Vec<String> {
        engine
            .search(query)
            .unwrap()
            .into_iter()
            .map(|hit| engine.catalog().dish(hit.dish).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_fuzzy_match() {
        let e = engine(
            &["Cafe X,desc,50.45,30.52,Borscht with sour cream,45.0"],
            &["with"],
        );
        assert_eq!(names(&e, "borsht"), vec!["Borscht with sour cream"]);
    }

    #[test]
    fn test_empty_query_is_user_error() {
        let e = engine(&["Cafe X,desc,1.0,2.0,Borscht,45.0"], &["with"]);
        assert!(matches!(e.search(""), Err(Error::InvalidQuery(_))));
        assert!(matches!(e.search("with a"), Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn test_unknown_token_yields_empty() {
        let e = engine(&["Cafe X,desc,1.0,2.0,Borscht,45.0"], &[]);
        assert!(e.search("quinoa").unwrap().is_empty());
    }

    #[test]
    fn test_exact_outranks_approximate() {
        let e = engine(
            &[
                "Cafe X,desc,1.0,2.0,Borsht special,40.0",
                "Cafe Y,desc,1.0,2.0,Borscht classic,45.0",
            ],
            &[],
        );
        // "borscht" matches dish 1 exactly and dish 0 at distance 1
        assert_eq!(
            names(&e, "borscht"),
            vec!["Borscht classic", "Borsht special"]
        );
    }

    #[test]
    fn test_more_matched_tokens_outrank_fewer() {
        let e = engine(
            &[
                "Cafe X,desc,1.0,2.0,Chicken soup,30.0",
                "Cafe Y,desc,1.0,2.0,Chicken noodle soup,35.0",
            ],
            &[],
        );
        let ranked = names(&e, "chicken noodle");
        assert_eq!(ranked[0], "Chicken noodle soup");
    }

    #[test]
    fn test_limit_truncates() {
        let rows: Vec<String> = (0..30)
            .map(|i| format!("Cafe {i},desc,1.0,2.0,Pancake stack {i},9.0"))
            .collect();
        let e = engine(&rows.iter().map(String::as_str).collect::<Vec<_>>(), &[]);
        assert_eq!(e.search("pancake").unwrap().len(), 20);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let e = engine(
            &[
                "Cafe A,desc,1.0,2.0,Tomato soup,20.0",
                "Cafe B,desc,1.0,2.0,Tomato salad,22.0",
            ],
            &[],
        );
        let hits = e.search("tomato").unwrap();
        assert_eq!(hits[0].rank, hits[1].rank);
        assert_eq!(hits[0].dish, 0);
        assert_eq!(hits[1].dish, 1);
    }
}
