//! The graph arena: nodes, links, the switch registry, and construction,
//! mutation, and pruning operations.
//!
//! Grounded on `src/graph/graph.py`'s `Graph` class from the original
//! source, reshaped per spec.md §9 into a single arena of `NodeRecord`s and
//! `LinkRecord`s addressed by index, with the switch registry as the
//! authoritative source of switch state, mirrored into both endpoint links.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::{DenError, DenResult};
use crate::hpa::{Hpa, HpaId};
use crate::link::{Direction, LinkConfig, LinkId, LinkKind, LinkRecord, SwitchId, SwitchState};
use crate::node::{NodeId, NodeIndex, NodeKind, NodeRecord};

/// One row of `links.csv`: a NORMAL edge between two node names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalEdgeInput {
    pub a: String,
    pub b: String,
    pub dist_ft: u32,
    pub config_id: u32,
}

/// One row of `switches.csv`: a SWITCH tie between two node names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchEdgeInput {
    pub a: String,
    pub b: String,
    pub state: SwitchState,
}

/// The data-model boundary (spec.md §6) that `den2ne-io` populates from CSV
/// files and that tests populate directly with literals. This is the seam
/// between the external collaborator and the algorithmic core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphInput {
    pub root: String,
    /// Per-node load (kW) at the timestep being constructed. A name present
    /// here becomes a NORMAL node; edge endpoints absent here become VIRTUAL.
    pub loads: HashMap<String, f64>,
    pub normal_edges: Vec<NormalEdgeInput>,
    pub switch_edges: Vec<SwitchEdgeInput>,
    pub configs: HashMap<u32, LinkConfig>,
}

/// The switch registry: the source of truth for switch state, mirrored into
/// the two endpoint `LinkRecord`s on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchEntry {
    pub a: NodeId,
    pub b: NodeId,
    pub state: SwitchState,
    pub pruned: bool,
    pub link_a: LinkId,
    pub link_b: LinkId,
}

/// The graph arena. Node indices are never reused or shifted once allocated,
/// so `NodeId`/`LinkId`/`HpaId` values stay valid for the graph's lifetime;
/// `remove_node` tombstones rather than shrinking the vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<NodeRecord>,
    pub node_index: NodeIndex,
    pub links: Vec<LinkRecord>,
    pub hpas: Vec<Hpa>,
    pub switches: Vec<SwitchEntry>,
    pub root: NodeId,
}

impl Graph {
    fn ensure_node(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.node_index.get(name) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeRecord::new(name, NodeKind::Virtual, 0.0));
        self.node_index.insert(name.to_string(), id);
        id
    }

    fn push_link_pair(&mut self, a: NodeId, b: NodeId, link_a: LinkRecord, link_b: LinkRecord) -> (LinkId, LinkId) {
        let id_a = LinkId(self.links.len());
        self.links.push(link_a);
        let id_b = LinkId(self.links.len());
        self.links.push(link_b);
        self.nodes[a.0].neighbors.push(b);
        self.nodes[a.0].links.push(id_a);
        self.nodes[b.0].neighbors.push(a);
        self.nodes[b.0].links.push(id_b);
        (id_a, id_b)
    }

    /// Implements spec.md §4.1: load-bearing nodes first, then virtual
    /// endpoints, then NORMAL link pairs, then SWITCH link pairs sharing
    /// initial state. The switch registry indexes SWITCH edges in input
    /// order.
    pub fn build(input: GraphInput) -> DenResult<Graph> {
        let mut nodes = Vec::with_capacity(input.loads.len());
        let mut node_index = NodeIndex::new();
        let mut names: Vec<&String> = input.loads.keys().collect();
        names.sort();
        for name in names {
            let load = input.loads[name];
            let id = NodeId(nodes.len());
            nodes.push(NodeRecord::new(name.clone(), NodeKind::Normal, load));
            node_index.insert(name.clone(), id);
        }

        let mut graph = Graph {
            nodes,
            node_index,
            links: Vec::new(),
            hpas: Vec::new(),
            switches: Vec::new(),
            root: NodeId(0),
        };

        for edge in &input.normal_edges {
            let a = graph.ensure_node(&edge.a);
            let b = graph.ensure_node(&edge.b);
            let config = input
                .configs
                .get(&edge.config_id)
                .ok_or_else(|| DenError::Parse(format!("unknown link config id {}", edge.config_id)))?;
            let link_a = LinkRecord::normal(edge.dist_ft, *config);
            let link_b = LinkRecord::normal(edge.dist_ft, *config);
            graph.push_link_pair(a, b, link_a, link_b);
        }

        for edge in &input.switch_edges {
            let a = graph.ensure_node(&edge.a);
            let b = graph.ensure_node(&edge.b);
            let switch_id = SwitchId(graph.switches.len());
            let link_a = LinkRecord::switch(switch_id, edge.state);
            let link_b = LinkRecord::switch(switch_id, edge.state);
            let (id_a, id_b) = graph.push_link_pair(a, b, link_a, link_b);
            graph.switches.push(SwitchEntry {
                a,
                b,
                state: edge.state,
                pruned: false,
                link_a: id_a,
                link_b: id_b,
            });
        }

        let root = graph
            .node_index
            .get(&input.root)
            .ok_or_else(|| DenError::Structural(format!("missing root node '{}'", input.root)))?;
        graph.root = root;

        Ok(graph)
    }

    fn link_index_to(&self, from: NodeId, to: NodeId) -> Option<usize> {
        self.nodes[from.0].neighbors.iter().position(|&n| n == to)
    }

    /// `capacity(a, b)`; `None` for SWITCH links, which carry no capacity.
    pub fn capacity(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let i = self.link_index_to(a, b)?;
        let link_id = self.nodes[a.0].links[i];
        self.links[link_id.0].capacity_kw()
    }

    /// Writes only the `(a -> b)` link's direction; the balancer sets both
    /// directions of an adjacency symmetrically via two calls.
    pub fn set_link_direction(&mut self, a: NodeId, b: NodeId, d: Direction) {
        if let Some(i) = self.link_index_to(a, b) {
            let link_id = self.nodes[a.0].links[i];
            self.links[link_id.0].direction = d;
        }
    }

    /// Writes to the registry and to both mirrored `LinkRecord`s.
    pub fn set_switch(&mut self, id: SwitchId, state: SwitchState, pruned: Option<bool>) {
        let entry = &mut self.switches[id.0];
        entry.state = state;
        if let Some(p) = pruned {
            entry.pruned = p;
        }
        let (link_a, link_b) = (entry.link_a, entry.link_b);
        self.links[link_a.0].state = Some(state);
        self.links[link_b.0].state = Some(state);
    }

    /// Deletes the node and scrubs both halves of every adjacency referring
    /// to it from its former neighbors.
    pub fn remove_node(&mut self, id: NodeId) {
        let neighbors = self.nodes[id.0].neighbors.clone();
        for neighbor in neighbors {
            if let Some(i) = self.link_index_to(neighbor, id) {
                self.nodes[neighbor.0].neighbors.remove(i);
                self.nodes[neighbor.0].links.remove(i);
            }
        }
        let name = self.nodes[id.0].name.clone();
        self.node_index.remove(&name);
        self.nodes[id.0].neighbors.clear();
        self.nodes[id.0].links.clear();
        self.nodes[id.0].removed = true;
    }

    fn sole_link_kind(&self, id: NodeId) -> Option<LinkKind> {
        if self.nodes[id.0].links.len() != 1 {
            return None;
        }
        let link_id = self.nodes[id.0].links[0];
        Some(self.links[link_id.0].kind)
    }

    /// Implements spec.md §4.2's two fixed sweeps over a snapshot taken at
    /// the start of each sweep. Returns the removed node identities.
    pub fn prune(&mut self) -> Vec<NodeId> {
        let mut removed = Vec::new();

        let sweep_1_candidates: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| {
                !self.nodes[id.0].removed
                    && id != self.root
                    && matches!(self.nodes[id.0].kind, NodeKind::Virtual)
                    && self.sole_link_kind(id) == Some(LinkKind::Switch)
            })
            .collect();
        for id in sweep_1_candidates {
            let link_id = self.nodes[id.0].links[0];
            if let Some(switch_id) = self.links[link_id.0].switch_id {
                self.set_switch(switch_id, SwitchState::Open, Some(true));
            }
            self.remove_node(id);
            removed.push(id);
        }

        let sweep_2_candidates: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| {
                !self.nodes[id.0].removed
                    && matches!(self.nodes[id.0].kind, NodeKind::Virtual)
                    && self.sole_link_kind(id) == Some(LinkKind::Normal)
            })
            .collect();
        for id in sweep_2_candidates {
            self.remove_node(id);
            removed.push(id);
        }

        removed
    }

    /// `areEnclosedLoads()`: true iff any non-root, non-removed node has
    /// non-zero load.
    pub fn has_enclosed_loads(&self) -> bool {
        self.nodes
            .iter()
            .enumerate()
            .any(|(i, n)| NodeId(i) != self.root && !n.removed && n.load_kw != 0.0)
    }

    /// The realized active set, derived on demand from each node's active
    /// pointer rather than kept as separately-mutated state (spec.md §9's
    /// "address set as owned list" note).
    pub fn active_hpas(&self) -> Vec<HpaId> {
        self.nodes.iter().filter_map(|n| n.active).collect()
    }

    /// `Graph::snapshot()`: an independently owned copy. Because the
    /// representation is an arena of vectors, `Clone` already is the cheap
    /// block-copy spec.md §9 calls for.
    pub fn snapshot(&self) -> Graph {
        self.clone()
    }

    /// Ambient addition grounded on `gat_core::Network::validate_into`:
    /// flags structural issues without panicking.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.root.0 >= self.nodes.len() || self.nodes[self.root.0].removed {
            diag.add_error("structure", "root node does not exist in the graph");
        }

        let mut seen_pairs = std::collections::HashSet::new();
        for (i, entry) in self.switches.iter().enumerate() {
            let key = (entry.a.min(entry.b), entry.a.max(entry.b));
            if !seen_pairs.insert(key) {
                diag.add_error_with_entity("structure", "duplicate switch registry entry", &format!("switch {}", i));
            }
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.removed {
                continue;
            }
            if matches!(node.kind, NodeKind::Normal) && node.load_kw != 0.0 && node.ids.is_empty() {
                diag.add_error_with_entity("reachability", "load-bearing node is unreachable from the root", &node.name);
                let _ = i;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The 5-node topology from spec.md §8: nodes 1..5, NORMAL edges
    /// (1,2,100,1), (2,3,100,1), (2,4,100,1), (4,5,100,1), root = 1.
    pub fn five_node_input(loads: &[(&str, f64)]) -> GraphInput {
        let mut configs = HashMap::new();
        configs.insert(1, LinkConfig { coef_r: 0.3, i_max: 400.0 });
        let mut load_map = HashMap::new();
        for (name, load) in loads {
            load_map.insert(name.to_string(), *load);
        }
        GraphInput {
            root: "1".into(),
            loads: load_map,
            normal_edges: vec![
                NormalEdgeInput { a: "1".into(), b: "2".into(), dist_ft: 100, config_id: 1 },
                NormalEdgeInput { a: "2".into(), b: "3".into(), dist_ft: 100, config_id: 1 },
                NormalEdgeInput { a: "2".into(), b: "4".into(), dist_ft: 100, config_id: 1 },
                NormalEdgeInput { a: "4".into(), b: "5".into(), dist_ft: 100, config_id: 1 },
            ],
            switch_edges: Vec::new(),
            configs,
        }
    }

    #[test]
    fn build_creates_all_load_bearing_nodes() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0), ("3", 1.0), ("4", 1.0), ("5", 1.0)]);
        let graph = Graph::build(input).unwrap();
        assert_eq!(graph.nodes.len(), 5);
        assert!(graph.nodes.iter().all(|n| matches!(n.kind, NodeKind::Normal)));
    }

    #[test]
    fn build_creates_virtual_nodes_for_missing_endpoints() {
        let mut input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        input.normal_edges.push(NormalEdgeInput { a: "2".into(), b: "6".into(), dist_ft: 50, config_id: 1 });
        let graph = Graph::build(input).unwrap();
        let six = graph.node_index.get("6").unwrap();
        assert!(matches!(graph.nodes[six.0].kind, NodeKind::Virtual));
        assert_eq!(graph.nodes[six.0].load_kw, 0.0);
    }

    #[test]
    fn adjacency_pairing_invariant_holds() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0), ("3", 1.0), ("4", 1.0), ("5", 1.0)]);
        let graph = Graph::build(input).unwrap();
        for node in &graph.nodes {
            assert_eq!(node.neighbors.len(), node.links.len());
        }
        let n1 = graph.node_index.get("1").unwrap();
        let n2 = graph.node_index.get("2").unwrap();
        assert!(graph.nodes[n1.0].neighbors.contains(&n2));
        assert!(graph.nodes[n2.0].neighbors.contains(&n1));
    }

    #[test]
    fn missing_root_is_structural_error() {
        let mut input = five_node_input(&[("2", 1.0)]);
        input.root = "999".into();
        let err = Graph::build(input).unwrap_err();
        assert!(matches!(err, DenError::Structural(_)));
    }

    #[test]
    fn switch_mirror_invariant_after_set_switch() {
        let mut input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        input.switch_edges.push(SwitchEdgeInput { a: "2".into(), b: "3".into(), state: SwitchState::Open });
        let mut graph = Graph::build(input).unwrap();
        graph.set_switch(SwitchId(0), SwitchState::Closed, None);
        let entry = &graph.switches[0];
        assert_eq!(graph.links[entry.link_a.0].state, Some(SwitchState::Closed));
        assert_eq!(graph.links[entry.link_b.0].state, Some(SwitchState::Closed));
    }

    #[test]
    fn prune_sweep_one_removes_virtual_switch_leaves() {
        let mut input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        input.switch_edges.push(SwitchEdgeInput { a: "2".into(), b: "99".into(), state: SwitchState::Closed });
        let mut graph = Graph::build(input).unwrap();
        let removed = graph.prune();
        let n99 = graph.node_index.get("99");
        assert!(n99.is_none());
        assert!(removed.iter().any(|_| true));
        assert!(graph.switches[0].pruned);
        assert_eq!(graph.switches[0].state, SwitchState::Open);
    }

    #[test]
    fn prune_sweep_two_removes_virtual_normal_leaves() {
        let mut input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        input.normal_edges.push(NormalEdgeInput { a: "2".into(), b: "77".into(), dist_ft: 10, config_id: 1 });
        let mut graph = Graph::build(input).unwrap();
        graph.prune();
        assert!(graph.node_index.get("77").is_none());
    }

    #[test]
    fn remove_node_scrubs_both_adjacency_halves() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0), ("3", 1.0), ("4", 1.0), ("5", 1.0)]);
        let mut graph = Graph::build(input).unwrap();
        let n3 = graph.node_index.get("3").unwrap();
        let n2 = graph.node_index.get("2").unwrap();
        graph.remove_node(n3);
        assert!(!graph.nodes[n2.0].neighbors.contains(&n3));
        assert!(graph.node_index.get("3").is_none());
    }

    #[test]
    fn capacity_none_for_switch_links() {
        let mut input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        input.switch_edges.push(SwitchEdgeInput { a: "1".into(), b: "2".into(), state: SwitchState::Closed });
        let graph = Graph::build(input).unwrap();
        let n1 = graph.node_index.get("1").unwrap();
        let n2 = graph.node_index.get("2").unwrap();
        assert_eq!(graph.capacity(n1, n2), None);
    }

    #[test]
    fn has_enclosed_loads_detects_nonzero_nonroot_load() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        let graph = Graph::build(input).unwrap();
        assert!(graph.has_enclosed_loads());
    }

    #[test]
    fn snapshot_is_independent_copy() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0)]);
        let graph = Graph::build(input).unwrap();
        let mut snap = graph.snapshot();
        let n2 = snap.node_index.get("2").unwrap();
        snap.nodes[n2.0].load_kw = 999.0;
        let n2_orig = graph.node_index.get("2").unwrap();
        assert_eq!(graph.nodes[n2_orig.0].load_kw, 1.0);
    }
}
