//! Graph vertices: identity, load, adjacency, and owned HPA set.
//!
//! Grounded on `src/graph/graph.py`'s node dict entries (`neigh`, `links`,
//! `ids`) from the original source, reshaped into the arena-of-indices
//! representation recommended by spec.md §9.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hpa::HpaId;
use crate::link::LinkId;

/// Index into `Graph::nodes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A node introduced by a load-table entry is NORMAL; one introduced only as
/// an edge endpoint with no load entry is VIRTUAL with load fixed at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Normal,
    Virtual,
}

/// A graph vertex. `neighbors[i]` and `links[i]` refer to the same adjacency
/// for every `i` (spec.md §3's adjacency-pairing invariant); all mutation
/// helpers on `Graph` push or remove both vectors together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub kind: NodeKind,
    /// Sign convention: negative = generator, positive = consumer.
    pub load_kw: f64,
    pub neighbors: Vec<NodeId>,
    pub links: Vec<LinkId>,
    /// HPAs owned by this node, in propagation-insertion order; capped at
    /// `crate::propagator::IDS_MAX`.
    pub ids: Vec<HpaId>,
    /// The HPA the selector has marked active for this node, if any.
    pub active: Option<HpaId>,
    /// Tombstone for `Graph::remove_node`: indices are never reused, so a
    /// removed node keeps its slot but drops all adjacency and state.
    pub removed: bool,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, kind: NodeKind, load_kw: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            load_kw,
            neighbors: Vec::new(),
            links: Vec::new(),
            ids: Vec::new(),
            active: None,
            removed: false,
        }
    }

    /// Position of `link_id`/`neighbor` pair, if this node owns it.
    pub fn position_of(&self, link_id: LinkId) -> Option<usize> {
        self.links.iter().position(|&l| l == link_id)
    }
}

/// Name-to-index lookup, kept alongside `Graph::nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeIndex {
    pub by_name: HashMap<String, NodeId>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn insert(&mut self, name: String, id: NodeId) {
        self.by_name.insert(name, id);
    }

    pub fn remove(&mut self, name: &str) {
        self.by_name.remove(name);
    }
}
