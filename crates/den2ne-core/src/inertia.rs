//! "Flow inertia" reconciliation (spec.md §4.7): an optional post-pass that
//! realigns upstream active HPAs to be prefixes of a longer active HPA.
//!
//! Grounded on `flowInertia`/`IDsCheck` in `src/den2ne/den2neALG.py`. The
//! original source calls this from some criteria but not others, and the
//! primary iterative driver never calls it at all (several invocations are
//! commented out). spec.md §9 states this is an open question the original
//! authors left unresolved and instructs implementers not to guess intent.
//!
//! **This function is never invoked by [`crate::driver::run_balance_loop`]
//! or by [`crate::selector::select`].** It is exposed for callers who want
//! to experiment with the reconciliation behavior after selection.

use crate::error::DenResult;
use crate::graph::Graph;
use crate::hpa::HpaId;

/// Recursion depth cap, matching the `n_repetition <= 10` guard in the
/// original source.
pub const MAX_DEPTH: u32 = 10;

/// Realigns upstream active HPAs to agree with longer active HPAs that
/// transit them, then runs the `IDsCheck` self-check.
///
/// `active` is the realized active set (as returned by
/// [`crate::selector::select`]); it is updated in place as HPAs are
/// re-marked active. `changed` restricts the first pass to a subset of
/// HPAs (as `IDsCheck` does when feeding back `ids_to_fix`); `None` means
/// "consider the whole active set", matching the top-level call.
pub fn reconcile(graph: &mut Graph, active: &mut Vec<HpaId>, changed: Option<&[HpaId]>, depth: u32) -> DenResult<()> {
    if depth > MAX_DEPTH {
        return Ok(());
    }

    let mut ids: Vec<HpaId> = match changed {
        Some(c) => c.to_vec(),
        None => active.clone(),
    };
    ids.sort_by(|&a, &b| graph.hpas[b.0].len().cmp(&graph.hpas[a.0].len()));

    let mut newly_changed = Vec::new();

    for &hpa_id in &ids {
        let path = graph.hpas[hpa_id.0].path.clone();
        for i in (0..path.len().saturating_sub(1)).rev() {
            let upstream = path[i];
            let required_prefix = &path[..=i];

            let current_active = graph.nodes[upstream.0].active;
            let already_matches = current_active
                .map(|h| graph.hpas[h.0].path == required_prefix)
                .unwrap_or(false);
            if already_matches {
                continue;
            }

            let candidate = graph.nodes[upstream.0]
                .ids
                .iter()
                .copied()
                .filter(|&h| graph.hpas[h.0].path == required_prefix)
                .min_by_key(|&h| graph.hpas[h.0].len());

            if let Some(new_active) = candidate {
                if let Some(old) = current_active {
                    graph.hpas[old.0].active = false;
                    active.retain(|&a| a != old);
                }
                graph.hpas[new_active.0].active = true;
                graph.nodes[upstream.0].active = Some(new_active);
                if !active.contains(&new_active) {
                    active.push(new_active);
                }
                newly_changed.push(upstream);
            }
        }
    }

    if !newly_changed.is_empty() {
        let side_branches: Vec<HpaId> = active
            .iter()
            .copied()
            .filter(|&h| graph.hpas[h.0].path.iter().any(|n| newly_changed.contains(n)))
            .collect();
        if !side_branches.is_empty() {
            reconcile(graph, active, Some(&side_branches), depth + 1)?;
        }
    }

    if depth == 0 {
        ids_check(graph, active, 0)?;
    }

    Ok(())
}

/// `IDsCheck`: flags any active HPA whose next hop's own active HPA has a
/// length inconsistent with being a one-shorter prefix of this HPA, and
/// feeds those back into [`reconcile`].
fn ids_check(graph: &mut Graph, active: &mut Vec<HpaId>, n_repetition: u32) -> DenResult<()> {
    if n_repetition > MAX_DEPTH {
        return Ok(());
    }

    let mut to_fix = Vec::new();
    for &hpa_id in active.iter() {
        let hpa = &graph.hpas[hpa_id.0];
        let Some(next_hop) = hpa.next_hop_toward_root() else { continue };
        let Some(next_active) = graph.nodes[next_hop.0].active else { continue };
        let expected_len = hpa.len() - 1;
        if graph.hpas[next_active.0].len() != expected_len {
            to_fix.push(hpa_id);
        }
    }

    if !to_fix.is_empty() {
        reconcile(graph, active, Some(&to_fix), n_repetition + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::five_node_input;
    use crate::graph::Graph;
    use crate::propagator::propagate;
    use crate::selector::{clear_active, select, Criterion};

    #[test]
    fn reconcile_is_a_no_op_on_an_already_consistent_tree() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0), ("3", 1.0), ("4", 1.0), ("5", 1.0)]);
        let mut graph = Graph::build(input).unwrap();
        propagate(&mut graph);
        clear_active(&mut graph);
        let mut active = select(&mut graph, Criterion::Hops);
        let before: Vec<_> = active.clone();

        reconcile(&mut graph, &mut active, None, 0).unwrap();

        let mut after = active.clone();
        let mut before_sorted = before;
        after.sort_by_key(|h| h.0);
        before_sorted.sort_by_key(|h| h.0);
        assert_eq!(after, before_sorted);
    }

    #[test]
    fn reconcile_respects_recursion_cap() {
        let input = five_node_input(&[("1", 0.0), ("2", 1.0), ("3", 1.0), ("4", 1.0), ("5", 1.0)]);
        let mut graph = Graph::build(input).unwrap();
        propagate(&mut graph);
        clear_active(&mut graph);
        let mut active = select(&mut graph, Criterion::Hops);

        assert!(reconcile(&mut graph, &mut active, None, MAX_DEPTH + 1).is_ok());
    }
}
