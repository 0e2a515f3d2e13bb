//! Physical links between nodes: NORMAL distribution segments and SWITCH ties.
//!
//! Grounded on `src/graph/link.py` in the original source: NORMAL links carry
//! length, a resistance coefficient, and a per-phase current limit from which
//! a kW capacity is derived at construction; SWITCH links carry none of that
//! and use a fixed resistance instead.

use serde::{Deserialize, Serialize};

/// Nominal line-to-line voltage (V) used throughout the loss and capacity formulas.
pub const VOLTAGE: f64 = 415.0;

/// Fixed resistance (Ω) used for the loss formula on SWITCH links.
pub const R_SW: f64 = 0.1 * 0.08;

/// Divisor converting feet to meters.
pub const FT_PER_METER: f64 = 3.28084;

/// Index into `Graph::links`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub usize);

/// Index into `Graph::switches`, the switch registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SwitchId(pub usize);

/// Distinguishes a normal distribution segment from a switch tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Normal,
    Switch,
}

/// Current power-flow direction assigned by the balancer, relative to the
/// link's `(a, b)` identity as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Flowing from `a` toward the root-ward side (spec.md's "up").
    Up,
    /// Flowing away from the root-ward side (spec.md's "down").
    Down,
    None,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::None
    }
}

/// Open/closed state of a switch, mirrored between the switch registry and
/// both endpoint `LinkRecord`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchState {
    Open,
    Closed,
}

/// Config parameters shared by every NORMAL link that references a given
/// `links_config*.csv` row: `coef_r` (Ω/km) and `i_max` (A, per phase).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub coef_r: f64,
    pub i_max: f64,
}

impl LinkConfig {
    /// `capacity = i_max * 3 * V / 1000` (kW), per spec.md §3.
    pub fn capacity_kw(&self) -> f64 {
        self.i_max * 3.0 * VOLTAGE / 1000.0
    }
}

/// A single link record, one per `(endpoint, peer)` half of an undirected
/// adjacency. `a` is the owning node; `b` is the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub kind: LinkKind,
    pub direction: Direction,

    /// Only meaningful for `LinkKind::Normal`.
    pub dist_ft: Option<u32>,
    pub coef_r: Option<f64>,
    pub i_max: Option<f64>,
    pub capacity_kw: Option<f64>,

    /// Only meaningful for `LinkKind::Switch`: index into `Graph::switches`,
    /// and the mirrored open/closed state (invariant: always equal to
    /// `registry[switch_id].state`).
    pub switch_id: Option<SwitchId>,
    pub state: Option<SwitchState>,
}

impl LinkRecord {
    pub fn normal(dist_ft: u32, config: LinkConfig) -> Self {
        Self {
            kind: LinkKind::Normal,
            direction: Direction::None,
            dist_ft: Some(dist_ft),
            coef_r: Some(config.coef_r),
            i_max: Some(config.i_max),
            capacity_kw: Some(config.capacity_kw()),
            switch_id: None,
            state: None,
        }
    }

    pub fn switch(switch_id: SwitchId, state: SwitchState) -> Self {
        Self {
            kind: LinkKind::Switch,
            direction: Direction::None,
            dist_ft: None,
            coef_r: None,
            i_max: None,
            capacity_kw: None,
            switch_id: Some(switch_id),
            state: Some(state),
        }
    }

    /// Line losses (kW) for incident power `p_in_kw`, matching
    /// `getLosses`/`getLosses_Link`/`getLosses_Switch` exactly.
    pub fn losses_kw(&self, p_in_kw: f64) -> f64 {
        let r_eff = match self.kind {
            LinkKind::Switch => R_SW,
            LinkKind::Normal => {
                let dist_ft = self.dist_ft.expect("normal link missing dist_ft");
                let coef_r = self.coef_r.expect("normal link missing coef_r");
                coef_r * (dist_ft as f64 / FT_PER_METER / 1000.0)
            }
        };
        ((r_eff / (VOLTAGE * VOLTAGE)) * (p_in_kw * 1000.0).powi(2)) / 1000.0
    }

    /// `None` for SWITCH links, which carry no capacity.
    pub fn capacity_kw(&self) -> Option<f64> {
        self.capacity_kw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LinkConfig {
        LinkConfig { coef_r: 0.3, i_max: 400.0 }
    }

    #[test]
    fn capacity_formula() {
        let cfg = config();
        assert!((cfg.capacity_kw() - (400.0 * 3.0 * 415.0 / 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn normal_losses_nonnegative() {
        let link = LinkRecord::normal(100, config());
        let loss = link.losses_kw(1.0);
        assert!(loss >= 0.0);
    }

    #[test]
    fn switch_losses_use_fixed_resistance() {
        let link = LinkRecord::switch(SwitchId(0), SwitchState::Closed);
        let loss = link.losses_kw(1.0);
        let expected = ((R_SW / (VOLTAGE * VOLTAGE)) * (1000.0_f64).powi(2)) / 1000.0;
        assert!((loss - expected).abs() < 1e-12);
    }

    #[test]
    fn switch_links_have_no_capacity() {
        let link = LinkRecord::switch(SwitchId(0), SwitchState::Closed);
        assert_eq!(link.capacity_kw(), None);
    }

    #[test]
    fn losses_scale_quadratically_with_power() {
        let link = LinkRecord::normal(100, config());
        let l1 = link.losses_kw(1.0);
        let l2 = link.losses_kw(2.0);
        assert!((l2 - l1 * 4.0).abs() < 1e-9);
    }
}
