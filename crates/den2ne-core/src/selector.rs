//! Active-address selection: one criterion chooses a single active HPA per
//! node, then switch states are reconciled to the union of active
//! dependencies.
//!
//! Grounded on `selectBestIDs` and the six `selectBestID_by_*` methods in
//! `src/den2ne/den2neALG.py`.

use std::collections::BTreeSet;

use crate::graph::Graph;
use crate::hpa::HpaId;
use crate::link::SwitchState;

/// The six selection objectives, matching `Den2ne.CRITERION_*` in the
/// original source. `LowLinksLosses`/`PowerToZero` carry their own
/// `alpha`/`beta` weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    Hops,
    LowLinksLosses { alpha: f64, beta: f64 },
    PowerToZero { alpha: f64, beta: f64 },
    PowerToZeroWithLosses,
    Distance,
    LinksLosses,
}

impl Default for Criterion {
    fn default() -> Self {
        Criterion::Hops
    }
}

impl Criterion {
    pub fn low_links_losses_default() -> Self {
        Criterion::LowLinksLosses { alpha: 0.5, beta: 0.5 }
    }

    pub fn power_to_zero_default() -> Self {
        Criterion::PowerToZero { alpha: 0.5, beta: 0.5 }
    }
}

/// `clearSelectedIDs`: resets every node's active pointer and every HPA's
/// `active` flag. Caller invokes this before `select`; `select` itself does
/// not clear prior state.
pub fn clear_active(graph: &mut Graph) {
    for hpa in &mut graph.hpas {
        hpa.active = false;
    }
    for node in &mut graph.nodes {
        node.active = None;
    }
}

/// `getTotalLinks_Losses`: simulate a unit trip from the owner to the root
/// carrying its own load; at each hop, accumulate the loss and degrade the
/// carried load by it.
pub fn total_link_losses(graph: &Graph, hpa_id: HpaId) -> f64 {
    let hpa = &graph.hpas[hpa_id.0];
    if hpa.path.len() < 2 {
        return 0.0;
    }
    let owner = hpa.owner();
    let mut curr_load = graph.nodes[owner.0].load_kw;
    let mut total = 0.0;
    for window in hpa.path.windows(2).rev() {
        let (upstream, downstream) = (window[0], window[1]);
        let link_idx = graph.nodes[downstream.0]
            .neighbors
            .iter()
            .position(|&n| n == upstream)
            .expect("hpa hop must be an existing adjacency");
        let link_id = graph.nodes[downstream.0].links[link_idx];
        let loss = graph.links[link_id.0].losses_kw(curr_load);
        total += loss;
        curr_load -= loss;
    }
    total
}

/// `getTotalPower2Zero`: how close to cancellation the owner and its next
/// hop toward the root are.
pub fn power_to_zero(graph: &Graph, hpa_id: HpaId) -> f64 {
    let hpa = &graph.hpas[hpa_id.0];
    let owner = hpa.owner();
    match hpa.next_hop_toward_root() {
        None => graph.nodes[owner.0].load_kw,
        Some(next) => (graph.nodes[next.0].load_kw + graph.nodes[owner.0].load_kw).abs(),
    }
}

/// `getTotalPower2Zero_with_Losses`: same as [`power_to_zero`] but subtracts
/// the loss of the final hop before taking the absolute value.
pub fn power_to_zero_with_losses(graph: &Graph, hpa_id: HpaId) -> f64 {
    let hpa = &graph.hpas[hpa_id.0];
    let owner = hpa.owner();
    match hpa.next_hop_toward_root() {
        None => graph.nodes[owner.0].load_kw,
        Some(next) => {
            let link_idx = graph.nodes[owner.0]
                .neighbors
                .iter()
                .position(|&n| n == next)
                .expect("hpa hop must be an existing adjacency");
            let link_id = graph.nodes[owner.0].links[link_idx];
            let owner_load = graph.nodes[owner.0].load_kw;
            let loss = graph.links[link_id.0].losses_kw(owner_load);
            (graph.nodes[next.0].load_kw + owner_load - loss).abs()
        }
    }
}

/// Physical path length, `Σ link.dist` along the HPA, in feet.
pub fn total_distance(graph: &Graph, hpa_id: HpaId) -> f64 {
    let hpa = &graph.hpas[hpa_id.0];
    let mut total = 0.0;
    for window in hpa.path.windows(2) {
        let (a, b) = (window[0], window[1]);
        let link_idx = graph.nodes[a.0].neighbors.iter().position(|&n| n == b).expect("adjacency");
        let link_id = graph.nodes[a.0].links[link_idx];
        if let Some(dist) = graph.links[link_id.0].dist_ft {
            total += dist as f64;
        }
    }
    total
}

fn score(graph: &Graph, hpa_id: HpaId, criterion: Criterion) -> f64 {
    let hpa = &graph.hpas[hpa_id.0];
    match criterion {
        Criterion::Hops => hpa.len() as f64,
        Criterion::LowLinksLosses { alpha, beta } => {
            alpha * total_link_losses(graph, hpa_id) + beta * hpa.len() as f64
        }
        Criterion::PowerToZero { alpha, beta } => alpha * power_to_zero(graph, hpa_id) + beta * hpa.len() as f64,
        Criterion::PowerToZeroWithLosses => power_to_zero_with_losses(graph, hpa_id),
        Criterion::Distance => total_distance(graph, hpa_id),
        Criterion::LinksLosses => total_link_losses(graph, hpa_id),
    }
}

/// `selectBestIDs(criterion)`: for each node, scores every owned HPA and
/// marks the arg-min one active (ties broken by lowest index), then
/// reconciles switch state to the union of active dependencies. Returns the
/// realized active set.
///
/// Does not clear prior selections itself; callers call [`clear_active`]
/// first, matching `clearSelectedIDs`'s separate invocation in the
/// original driver loop.
pub fn select(graph: &mut Graph, criterion: Criterion) -> Vec<HpaId> {
    let mut active = Vec::with_capacity(graph.nodes.len());

    for node_idx in 0..graph.nodes.len() {
        if graph.nodes[node_idx].removed || graph.nodes[node_idx].ids.is_empty() {
            continue;
        }
        let ids = graph.nodes[node_idx].ids.clone();
        let best = ids
            .iter()
            .enumerate()
            .map(|(i, &hpa_id)| (i, hpa_id, score(graph, hpa_id, criterion)))
            .min_by(|(_, _, a), (_, _, b)| a.partial_cmp(b).expect("scores must be finite"))
            .map(|(_, hpa_id, _)| hpa_id)
            .expect("node owns at least one HPA");

        graph.hpas[best.0].active = true;
        graph.nodes[node_idx].active = Some(best);
        active.push(best);
    }

    let mut dependences: BTreeSet<_> = BTreeSet::new();
    for &hpa_id in &active {
        dependences.extend(graph.hpas[hpa_id.0].depends_on.iter().copied());
    }

    for i in 0..graph.switches.len() {
        if graph.switches[i].pruned {
            continue;
        }
        graph.set_switch(crate::link::SwitchId(i), SwitchState::Open, None);
    }
    for switch_id in dependences {
        graph.set_switch(switch_id, SwitchState::Closed, None);
    }

    active
}
