//! BK-tree metric index
//!
//! Stores a set of tokens keyed by pairwise distance and answers "all
//! tokens within distance r of q" without scanning the whole vocabulary.
//! Each node owns its children in a map keyed by the child's distance from
//! the node; the triangle inequality then licenses skipping every child
//! whose key k has |k - d| > r, where d is the node's own distance to the
//! query.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::metric::Metric;

#[derive(Debug, Clone)]
struct Node {
    token: String,
    children: BTreeMap<u32, Node>,
}

impl Node {
    fn new(token: String) -> Self {
        Self {
            token,
            children: BTreeMap::new(),
        }
    }
}

/// Metric index over a set of tokens
///
/// Insertion order affects tree shape but never query results.
#[derive(Debug, Clone)]
pub struct BkTree<M: Metric> {
    metric: M,
    root: Option<Node>,
    len: usize,
}

impl<M: Metric> BkTree<M> {
    pub fn new(metric: M) -> Self {
        Self {
            metric,
            root: None,
            len: 0,
        }
    }

    /// Number of distinct tokens stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a token; inserting a token already present is a no-op
    pub fn insert(&mut self, token: &str) {
        let Some(root) = self.root.as_mut() else {
            self.root = Some(Node::new(token.to_string()));
            self.len = 1;
            return;
        };

        let mut node = root;
        loop {
            let d = self.metric.distance(&node.token, token);
            if d == 0 {
                return; // already present
            }
            match node.children.entry(d) {
                Entry::Vacant(slot) => {
                    slot.insert(Node::new(token.to_string()));
                    self.len += 1;
                    return;
                }
                Entry::Occupied(slot) => node = slot.into_mut(),
            }
        }
    }

    /// All stored tokens within `max_distance` of `token`, with distances
    pub fn query(&self, token: &str, max_distance: u32) -> Vec<(String, u32)> {
        let mut matches = Vec::new();
        if let Some(root) = &self.root {
            self.collect(root, token, max_distance, &mut matches);
        }
        matches
    }

    fn collect(&self, node: &Node, token: &str, max_distance: u32, out: &mut Vec<(String, u32)>) {
        let d = self.metric.distance(&node.token, token);
        if d <= max_distance {
            out.push((node.token.clone(), d));
        }

        // Only children with |k - d| <= max_distance can hold a match.
        let low = d.saturating_sub(max_distance);
        let high = d + max_distance;
        for child in node.children.range(low..=high).map(|(_, c)| c) {
            self.collect(child, token, max_distance, out);
        }
    }

    /// Iterate over every stored token, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut stack: Vec<&Node> = self.root.iter().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.values());
            Some(node.token.as_str())
        })
    }
}
