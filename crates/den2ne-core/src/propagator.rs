//! HPA propagation: a loop-free, BFS-like flood from the root that
//! accumulates up to `IDS_MAX` addresses per node.
//!
//! Grounded on `spread_ids` in `src/den2ne/den2neALG.py`. Not a
//! shortest-path BFS: multiple paths accumulate per node, cut off by the
//! cap, so the traversal order below is part of the contract, not an
//! implementation detail (spec.md §4.3, §9).

use std::collections::VecDeque;

use crate::graph::Graph;
use crate::hpa::{Hpa, HpaId};
use crate::link::LinkKind;

/// Maximum number of HPAs a node may own.
pub const IDS_MAX: usize = 10;

/// Floods HPAs outward from `graph.root`, mutating `graph.hpas` and each
/// node's `ids` list in place.
///
/// Traversal order (must match exactly for bit-equivalent reimplementation):
/// FIFO queue over nodes, insertion order over each node's owned HPAs,
/// insertion order over each node's neighbors.
pub fn propagate(graph: &mut Graph) {
    let root = graph.root;
    let root_hpa = Hpa::root(root);
    let root_hpa_id = HpaId(graph.hpas.len());
    graph.hpas.push(root_hpa);
    graph.nodes[root.0].ids.push(root_hpa_id);

    let mut queue: VecDeque<_> = VecDeque::new();
    queue.push_back(root);

    while let Some(u) = queue.pop_front() {
        let mut hpa_cursor = 0;
        while hpa_cursor < graph.nodes[u.0].ids.len() {
            let h_id = graph.nodes[u.0].ids[hpa_cursor];
            if graph.hpas[h_id.0].used {
                hpa_cursor += 1;
                continue;
            }

            let neighbors = graph.nodes[u.0].neighbors.clone();
            let links = graph.nodes[u.0].links.clone();
            for (v, link_id) in neighbors.into_iter().zip(links.into_iter()) {
                if graph.hpas[h_id.0].contains(v) {
                    continue;
                }
                if graph.nodes[v.0].ids.len() >= IDS_MAX {
                    continue;
                }

                let link = &graph.links[link_id.0];
                let switch_dep = if link.kind == LinkKind::Switch {
                    let u_switch = find_switch_id(graph, u);
                    let v_switch = find_switch_id(graph, v);
                    if u_switch.is_some() && u_switch == v_switch {
                        u_switch
                    } else {
                        None
                    }
                } else {
                    None
                };

                let new_hpa = graph.hpas[h_id.0].extended(v, switch_dep);
                let new_id = HpaId(graph.hpas.len());
                graph.hpas.push(new_hpa);
                graph.nodes[v.0].ids.push(new_id);
                queue.push_back(v);
            }

            graph.hpas[h_id.0].used = true;
            hpa_cursor += 1;
        }
    }
}

/// `findSwitchID(name)`: the registry index of the switch touching `node`,
/// if any of its links is a SWITCH link.
fn find_switch_id(graph: &Graph, node: crate::node::NodeId) -> Option<crate::link::SwitchId> {
    graph.nodes[node.0]
        .links
        .iter()
        .find_map(|&link_id| graph.links[link_id.0].switch_id)
}
