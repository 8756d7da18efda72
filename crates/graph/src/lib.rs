//! Thread-safe link-graph accumulator: directed edges between page URLs
//! (C8, §4.8). Stored as an adjacency mapping from source URL to an
//! ordered list of target URLs — never a reference to a `PageResult` (§9):
//! the graph is a relation, not an ownership edge.

use std::collections::HashMap;
use std::sync::RwLock;

/// Concurrent accumulator of directed `(source, target)` edges. Readers
/// and writers share one lock; writers only hold it during insertion.
#[derive(Default)]
pub struct LinkGraph {
    adjacency: RwLock<HashMap<String, Vec<String>>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent insertion of one edge (§4.8). A duplicate target for an
    /// existing source is a no-op.
    pub fn add_edge(&self, source: &str, target: &str) {
        let mut adjacency = self.adjacency.write().unwrap();
        let targets = adjacency.entry(source.to_string()).or_default();
        if !targets.iter().any(|t| t == target) {
            targets.push(target.to_string());
        }
    }

    /// Atomic batch insert: skips duplicates against the existing list and
    /// within the batch itself (§4.8).
    pub fn add_edges(&self, source: &str, targets: &[String]) {
        let mut adjacency = self.adjacency.write().unwrap();
        let existing = adjacency.entry(source.to_string()).or_default();
        for target in targets {
            if !existing.iter().any(|t| t == target) {
                existing.push(target.clone());
            }
        }
    }

    /// Targets reachable directly from `source`, in first-seen order.
    pub fn edges(&self, source: &str) -> Vec<String> {
        self.adjacency
            .read()
            .unwrap()
            .get(source)
            .cloned()
            .unwrap_or_default()
    }

    /// A deep copy of the full adjacency map.
    pub fn all_edges(&self) -> HashMap<String, Vec<String>> {
        self.adjacency.read().unwrap().clone()
    }

    /// Flat `(source, target)` pairs, in insertion order within each source.
    pub fn edge_list(&self) -> Vec<(String, String)> {
        self.adjacency
            .read()
            .unwrap()
            .iter()
            .flat_map(|(src, targets)| targets.iter().map(move |t| (src.clone(), t.clone())))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        let adjacency = self.adjacency.read().unwrap();
        let mut nodes: std::collections::HashSet<&str> = std::collections::HashSet::new();
        for (src, targets) in adjacency.iter() {
            nodes.insert(src.as_str());
            nodes.extend(targets.iter().map(|t| t.as_str()));
        }
        nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.read().unwrap().values().map(Vec::len).sum()
    }
}
