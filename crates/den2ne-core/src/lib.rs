//! Hierarchical-path routing and power-balance engine for a radial-with-
//! meshing electrical distribution graph ("den2ne").
//!
//! Each node is assigned one or more hierarchical path addresses (HPAs)
//! encoding its route to a designated root. A [`selector::Criterion`] then
//! picks one active HPA per node, and [`balancer::global_balance`] drains
//! loads along the active paths toward the root, reporting total delivered
//! power, absolute flux, and the resulting switch configuration.
//!
//! This crate is the algorithmic core only: single-threaded, synchronous,
//! and free of file I/O (see `den2ne-io` for CSV ingestion and `den2ne-cli`
//! for the command-line driver). The data-model boundary is
//! [`graph::GraphInput`]: build a [`graph::Graph`] from one, then run
//! [`propagator::propagate`] once and [`driver::run_balance_loop`] per
//! timestep and criterion.
//!
//! ```
//! use den2ne_core::graph::{Graph, GraphInput, NormalEdgeInput};
//! use den2ne_core::link::LinkConfig;
//! use den2ne_core::propagator::propagate;
//! use den2ne_core::driver::run_balance_loop;
//! use den2ne_core::selector::Criterion;
//! use std::collections::HashMap;
//!
//! let mut loads = HashMap::new();
//! loads.insert("1".to_string(), 0.0);
//! loads.insert("2".to_string(), 1.0);
//! let mut configs = HashMap::new();
//! configs.insert(1, LinkConfig { coef_r: 0.3, i_max: 400.0 });
//!
//! let input = GraphInput {
//!     root: "1".to_string(),
//!     loads,
//!     normal_edges: vec![NormalEdgeInput { a: "1".into(), b: "2".into(), dist_ft: 100, config_id: 1 }],
//!     switch_edges: vec![],
//!     configs,
//! };
//!
//! let mut graph = Graph::build(input).unwrap();
//! graph.prune();
//! propagate(&mut graph);
//! let result = run_balance_loop(&mut graph, Criterion::Hops, false, false).unwrap();
//! assert!((result.balance.total_at_root - 1.0).abs() < 1e-9);
//! ```

pub mod balancer;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod graph;
pub mod hpa;
pub mod inertia;
pub mod link;
pub mod node;
pub mod propagator;
pub mod selector;

pub use balancer::{global_balance, BalanceResult};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use driver::{run_balance_loop, DriverResult, MAX_ITER};
pub use error::{DenError, DenResult};
pub use graph::{Graph, GraphInput};
pub use hpa::{Hpa, HpaId};
pub use link::{LinkConfig, LinkId, LinkKind, LinkRecord, SwitchId, SwitchState};
pub use node::{NodeId, NodeKind, NodeRecord};
pub use propagator::{propagate, IDS_MAX};
pub use selector::{clear_active, select, Criterion};
