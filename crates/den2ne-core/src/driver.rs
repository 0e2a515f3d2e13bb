//! The iterated driver loop: clear → select → balance, repeated until
//! quiescent or `MAX_ITER` is hit.
//!
//! Grounded on the `repeat ... until not areEnclosedLoads()` loop described
//! in spec.md §4.6 (the original source's per-timestep driver inlines this
//! rather than naming it as a function).

use serde::{Deserialize, Serialize};

use crate::balancer::{global_balance, BalanceResult};
use crate::error::{DenError, DenResult};
use crate::graph::Graph;
use crate::node::NodeId;
use crate::selector::{clear_active, select, Criterion};

/// Upper bound on re-selection passes before a run is declared non-quiescent.
pub const MAX_ITER: u32 = 30;

/// Outcome of a converged driver run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverResult {
    pub balance: BalanceResult,
    /// Number of select/balance passes actually performed (1..=MAX_ITER).
    pub iterations: u32,
}

/// Runs `clear_active → select → global_balance` until
/// `graph.has_enclosed_loads()` is false, or `MAX_ITER` passes have run
/// without reaching quiescence.
///
/// On non-quiescence, returns `DenError::UnreachableLoad` naming the
/// non-root node with the largest residual `|load|`, per spec.md §7.
pub fn run_balance_loop(
    graph: &mut Graph,
    criterion: Criterion,
    with_losses: bool,
    with_cap: bool,
) -> DenResult<DriverResult> {
    let mut last = BalanceResult { total_at_root: 0.0, abs_flux: 0.0 };

    for iteration in 1..=MAX_ITER {
        clear_active(graph);
        let active = select(graph, criterion);
        last = global_balance(graph, &active, with_losses, with_cap);

        if !graph.has_enclosed_loads() {
            return Ok(DriverResult { balance: last, iterations: iteration });
        }
    }

    let (node, residual_kw) = worst_residual(graph);
    Err(DenError::UnreachableLoad { node, residual_kw })
}

fn worst_residual(graph: &Graph) -> (String, f64) {
    graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(i, n)| NodeId(*i) != graph.root && !n.removed)
        .max_by(|(_, a), (_, b)| a.load_kw.abs().partial_cmp(&b.load_kw.abs()).unwrap())
        .map(|(_, n)| (n.name.clone(), n.load_kw))
        .unwrap_or_else(|| ("<none>".to_string(), 0.0))
}
