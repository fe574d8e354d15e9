//! Core types for Dishfinder

use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Index of a dish in the catalog's dish table, in dataset discovery order
pub type DishId = u32;

/// Geographic position attached to a restaurant
///
/// NaN sentinels keep these types off the wire directly; the protocol and
/// snapshot layers encode missing values as null instead.
#[derive(Debug, Clone)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Free-text address or area description
    pub description: String,
}

impl Location {
    /// Sentinel for rows whose coordinates could not be parsed
    pub const NONE: Location = Location {
        latitude: f64::NAN,
        longitude: f64::NAN,
        description: String::new(),
    };

    pub fn is_known(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }
}

/// A restaurant, unique per name, shared by all of its dishes
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub name: String,
    pub description: String,
    pub location: Location,
}

/// A menu item. The restaurant back-reference is shared, never owned.
#[derive(Debug, Clone)]
pub struct Dish {
    pub name: String,
    /// NaN when the dataset price was unparseable
    pub price: f64,
    pub restaurant: Arc<Restaurant>,
}

// Equality and hashing go by (name, restaurant name, price bit pattern) so
// dishes can key sets; bit-pattern comparison makes the NaN sentinel
// self-equal.
impl PartialEq for Dish {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.restaurant.name == other.restaurant.name
            && self.price.to_bits() == other.price.to_bits()
    }
}

impl Eq for Dish {}

impl Hash for Dish {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.restaurant.name.hash(state);
        self.price.to_bits().hash(state);
    }
}

/// A dish paired with its relevance rank for one search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub dish: DishId,
    /// Higher = more relevant; meaningful only within a single search
    pub rank: f64,
}
