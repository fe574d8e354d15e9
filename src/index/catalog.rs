//! Catalog construction
//!
//! One batch build per process: dataset rows in, immutable index out. The
//! catalog owns the dish table (discovery order), the token -> dish
//! postings, per-token frequencies, and the BK-tree over the vocabulary.
//! Workers share it behind an `Arc` and never mutate it.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::index::BkTree;
use crate::metric::Levenshtein;
use crate::text::Normalizer;
use crate::types::{Dish, DishId, Location, Restaurant};

/// The immutable, fully built search index for one dataset snapshot
#[derive(Debug)]
pub struct Catalog {
    dishes: Vec<Dish>,
    postings: HashMap<String, BTreeSet<DishId>>,
    frequencies: HashMap<String, usize>,
    similarities: BkTree<Levenshtein>,
    normalizer: Normalizer,
}

impl Catalog {
    /// Build the catalog from raw dataset rows
    ///
    /// Row format: `name,description,latitude,longitude,dish_name,price`.
    /// The first row naming a restaurant fixes its description and location;
    /// unparseable coordinates fall back to `Location::NONE` and an
    /// unparseable price to NaN. A row with fewer than six fields aborts the
    /// build: there is no partial catalog state.
    pub fn build<I, S>(rows: I, normalizer: Normalizer) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut restaurants: HashMap<String, Arc<Restaurant>> = HashMap::new();
        let mut interned: HashMap<Dish, DishId> = HashMap::new();
        let mut dishes: Vec<Dish> = Vec::new();
        let mut postings: HashMap<String, BTreeSet<DishId>> = HashMap::new();

        for (line_no, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            if row.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = row.split(',').collect();
            if fields.len() < 6 {
                return Err(Error::Catalog {
                    line: line_no + 1,
                    reason: format!("expected 6 fields, got {}", fields.len()),
                });
            }

            let restaurant = restaurants
                .entry(fields[0].to_string())
                .or_insert_with(|| {
                    let location = match (fields[2].trim().parse(), fields[3].trim().parse()) {
                        (Ok(latitude), Ok(longitude)) => Location {
                            latitude,
                            longitude,
                            description: fields[1].to_string(),
                        },
                        _ => Location::NONE,
                    };
                    Arc::new(Restaurant {
                        name: fields[0].to_string(),
                        description: fields[1].to_string(),
                        location,
                    })
                })
                .clone();

            let price = fields[5].trim().parse().unwrap_or(f64::NAN);
            let dish = Dish {
                name: fields[4].to_string(),
                price,
                restaurant,
            };

            let id = *interned.entry(dish.clone()).or_insert_with(|| {
                dishes.push(dish.clone());
                (dishes.len() - 1) as DishId
            });

            for token in normalizer.normalize(&dish.name) {
                postings.entry(token).or_default().insert(id);
            }
        }

        // Vocabulary is frozen here; insert it into the metric index once.
        let mut similarities = BkTree::new(Levenshtein);
        let mut frequencies = HashMap::with_capacity(postings.len());
        for (token, ids) in &postings {
            similarities.insert(token);
            frequencies.insert(token.clone(), ids.len());
        }

        tracing::info!(
            dishes = dishes.len(),
            restaurants = restaurants.len(),
            tokens = similarities.len(),
            "catalog built"
        );

        Ok(Self {
            dishes,
            postings,
            frequencies,
            similarities,
            normalizer,
        })
    }

    /// Build from a dataset file, one row per line
    pub fn from_file(path: impl AsRef<Path>, normalizer: Normalizer) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::build(content.lines(), normalizer)
    }

    /// Dishes containing `token`, in discovery order; empty if unknown
    pub fn dishes_for(&self, token: &str) -> impl Iterator<Item = DishId> + '_ {
        self.postings
            .get(token)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Number of dishes whose name contains `token`
    pub fn frequency(&self, token: &str) -> usize {
        self.frequencies.get(token).copied().unwrap_or(0)
    }

    /// The metric index over the full token vocabulary
    pub fn similarities(&self) -> &BkTree<Levenshtein> {
        &self.similarities
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn dish(&self, id: DishId) -> Option<&Dish> {
        self.dishes.get(id as usize)
    }

    pub fn dish_count(&self) -> usize {
        self.dishes.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.similarities.len()
    }

    pub(crate) fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    pub(crate) fn postings(&self) -> &HashMap<String, BTreeSet<DishId>> {
        &self.postings
    }

    /// Reassemble a catalog from snapshot parts; tree and frequencies are
    /// derived from the postings rather than persisted.
    pub(crate) fn from_parts(
        dishes: Vec<Dish>,
        postings: HashMap<String, BTreeSet<DishId>>,
        normalizer: Normalizer,
    ) -> Result<Self> {
        for ids in postings.values() {
            if let Some(&max) = ids.iter().next_back() {
                if max as usize >= dishes.len() {
                    return Err(Error::Snapshot(format!(
                        "posting references dish {max} but table has {}",
                        dishes.len()
                    )));
                }
            }
        }

        let mut similarities = BkTree::new(Levenshtein);
        let mut frequencies = HashMap::with_capacity(postings.len());
        for (token, ids) in &postings {
            similarities.insert(token);
            frequencies.insert(token.clone(), ids.len());
        }

        Ok(Self {
            dishes,
            postings,
            frequencies,
            similarities,
            normalizer,
        })
    }
}
