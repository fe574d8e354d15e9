//! Catalog snapshot cache
//!
//! Lets a restart skip the dataset build: the dish table and postings are
//! written to a JSON file and reloaded on startup. The BK-tree and the
//! frequency map are derived data and are rebuilt from the postings on
//! load. NaN sentinels (unknown price/coordinates) are encoded as null.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::index::Catalog;
use crate::text::Normalizer;
use crate::types::{Dish, DishId, Location, Restaurant};

/// Bumped whenever the snapshot layout changes; mismatches force a rebuild
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    restaurants: Vec<RestaurantRecord>,
    dishes: Vec<DishRecord>,
    postings: HashMap<String, BTreeSet<DishId>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RestaurantRecord {
    name: String,
    description: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location_description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DishRecord {
    name: String,
    price: Option<f64>,
    /// Index into the snapshot's restaurant table
    restaurant: u32,
}

/// Load a previously stored catalog; `Ok(None)` when no snapshot exists
pub fn load_snapshot(path: impl AsRef<Path>, normalizer: Normalizer) -> Result<Option<Catalog>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    if snapshot.version != SNAPSHOT_VERSION {
        tracing::warn!(
            found = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "snapshot version mismatch, rebuilding"
        );
        return Ok(None);
    }

    let restaurants: Vec<Arc<Restaurant>> = snapshot
        .restaurants
        .into_iter()
        .map(|r| {
            let location = match (r.latitude, r.longitude) {
                (Some(latitude), Some(longitude)) => Location {
                    latitude,
                    longitude,
                    description: r.location_description,
                },
                _ => Location::NONE,
            };
            Arc::new(Restaurant {
                name: r.name,
                description: r.description,
                location,
            })
        })
        .collect();

    let dishes = snapshot
        .dishes
        .into_iter()
        .map(|d| {
            let restaurant = restaurants
                .get(d.restaurant as usize)
                .cloned()
                .ok_or_else(|| {
                    Error::Snapshot(format!("dish references restaurant {}", d.restaurant))
                })?;
            Ok(Dish {
                name: d.name,
                price: d.price.unwrap_or(f64::NAN),
                restaurant,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let catalog = Catalog::from_parts(dishes, snapshot.postings, normalizer)?;
    tracing::info!(
        dishes = catalog.dish_count(),
        tokens = catalog.vocabulary_size(),
        "catalog loaded from snapshot"
    );
    Ok(Some(catalog))
}

/// Write the catalog to `path`, replacing any existing snapshot
pub fn store_snapshot(path: impl AsRef<Path>, catalog: &Catalog) -> Result<()> {
    let mut restaurants: Vec<RestaurantRecord> = Vec::new();
    let mut seen: HashMap<String, u32> = HashMap::new();

    let dishes = catalog
        .dishes()
        .iter()
        .map(|dish| {
            let restaurant = *seen.entry(dish.restaurant.name.clone()).or_insert_with(|| {
                let r = &dish.restaurant;
                restaurants.push(RestaurantRecord {
                    name: r.name.clone(),
                    description: r.description.clone(),
                    latitude: r.location.is_known().then_some(r.location.latitude),
                    longitude: r.location.is_known().then_some(r.location.longitude),
                    location_description: r.location.description.clone(),
                });
                (restaurants.len() - 1) as u32
            });
            DishRecord {
                name: dish.name.clone(),
                price: (!dish.price.is_nan()).then_some(dish.price),
                restaurant,
            }
        })
        .collect();

    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        restaurants,
        dishes,
        postings: catalog.postings().clone(),
    };

    std::fs::write(path, serde_json::to_string(&snapshot)?)?;
    Ok(())
}
