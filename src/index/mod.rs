//! The in-memory search index
//!
//! Implements:
//! - BK-tree metric index over the token vocabulary
//! - Catalog built once from the dataset (postings + frequencies + tree)
//! - JSON snapshot cache so restarts can skip the build

mod bktree;
mod catalog;
mod snapshot;

pub use bktree::BkTree;
pub use catalog::Catalog;
pub use snapshot::{load_snapshot, store_snapshot};
