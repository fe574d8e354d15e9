//! Dishfinder - typo-tolerant dish search
//!
//! Builds an in-memory index over a restaurant menu dataset and answers
//! fuzzy single- and multi-word queries over TCP, ranked by relevance.

pub mod error;
pub mod index;
pub mod metric;
pub mod protocol;
pub mod search;
pub mod server;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use index::Catalog;
pub use search::{SearchConfig, SearchEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
