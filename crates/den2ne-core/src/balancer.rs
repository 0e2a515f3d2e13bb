//! Global balance: drains loads along the active HPAs toward the root,
//! assigning link directions and tracking absolute flux.
//!
//! Grounded on `globalBalance` in `src/den2ne/den2neALG.py`. The capacity
//! predicate (`cap is None or cap >= o.load`) is preserved literally per
//! spec.md §9 — it is not "fixed" for the negative-load (generator) case.

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::hpa::HpaId;
use crate::link::{Direction, LinkId};
use crate::node::NodeId;

/// Result of a single `global_balance` pass: the net load reaching the
/// root, and the sum of absolute transferred quantities across every hop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub total_at_root: f64,
    pub abs_flux: f64,
}

fn link_from_to(graph: &Graph, from: NodeId, to: NodeId) -> LinkId {
    let i = graph.nodes[from.0]
        .neighbors
        .iter()
        .position(|&n| n == to)
        .expect("balance hop must be an existing adjacency");
    graph.nodes[from.0].links[i]
}

/// `globalBalance(withLosses, withCap)`. `active` is the realized active set
/// from `select`; it is consumed by length and never mutated in place —
/// `graph.nodes[*].active` pointers are untouched by this pass.
pub fn global_balance(graph: &mut Graph, active: &[HpaId], with_losses: bool, with_cap: bool) -> BalanceResult {
    let mut ids: Vec<HpaId> = active.to_vec();
    ids.sort_by(|&a, &b| graph.hpas[b.0].len().cmp(&graph.hpas[a.0].len()));

    let mut abs_flux = 0.0;

    while ids.len() > 1 {
        let hpa_id = ids.remove(0);
        let hpa = &graph.hpas[hpa_id.0];
        let owner = hpa.owner();
        let dst = match hpa.next_hop_toward_root() {
            Some(d) => d,
            None => continue,
        };

        let o_load = graph.nodes[owner.0].load_kw;

        let (dir_o_to_d, dir_d_to_o) = if o_load < 0.0 {
            (Direction::Down, Direction::Up)
        } else {
            (Direction::Up, Direction::Down)
        };
        graph.set_link_direction(owner, dst, dir_o_to_d);
        graph.set_link_direction(dst, owner, dir_d_to_o);

        let cap = graph.capacity(owner, dst);
        let link_id = link_from_to(graph, owner, dst);

        let q = match (with_losses, with_cap) {
            (true, true) => {
                let candidate = match cap {
                    Some(c) if c < o_load => c,
                    _ => o_load,
                };
                let loss = graph.links[link_id.0].losses_kw(candidate);
                candidate - loss
            }
            (true, false) => {
                let loss = graph.links[link_id.0].losses_kw(o_load);
                o_load - loss
            }
            (false, true) => match cap {
                Some(c) if c < o_load => c,
                _ => o_load,
            },
            (false, false) => o_load,
        };

        graph.nodes[dst.0].load_kw += q;
        abs_flux += q.abs();
        graph.nodes[owner.0].load_kw = 0.0;
    }

    let root = graph.root;
    let total_at_root = graph.nodes[root.0].load_kw;
    graph.nodes[root.0].load_kw = 0.0;

    BalanceResult { total_at_root, abs_flux }
}
