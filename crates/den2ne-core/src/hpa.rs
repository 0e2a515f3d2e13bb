//! Hierarchical path addresses: loop-free routes from root to owner.
//!
//! Grounded on the `HLMAC` class in `src/den2ne/den2neALG.py`: an ordered
//! node sequence plus the set of switch links the path transits, and the
//! `used`/`active` flags that propagation and selection flip in place.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::link::SwitchId;
use crate::node::NodeId;

/// Index into `Graph::hpas`, the single HPA arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HpaId(pub usize);

/// An ordered, loop-free sequence of node identities from the root
/// (`path[0]`) to the owning node (`path[path.len() - 1]`), plus the subset
/// of switch links this path transits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hpa {
    pub path: Vec<NodeId>,
    pub depends_on: BTreeSet<SwitchId>,
    /// Propagation has consumed this address (its neighbors have been visited).
    pub used: bool,
    /// The selector has chosen this address as the node's active route.
    pub active: bool,
}

impl Hpa {
    pub fn root(root: NodeId) -> Self {
        Self {
            path: vec![root],
            depends_on: BTreeSet::new(),
            used: false,
            active: false,
        }
    }

    pub fn owner(&self) -> NodeId {
        *self.path.last().expect("hpa path is never empty")
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }

    /// The node immediately toward the root from the owner, if the owner is
    /// not itself the root.
    pub fn next_hop_toward_root(&self) -> Option<NodeId> {
        if self.path.len() < 2 {
            None
        } else {
            Some(self.path[self.path.len() - 2])
        }
    }

    /// Clone this address and append `node`, optionally recording a switch
    /// dependency for the new hop.
    pub fn extended(&self, node: NodeId, switch: Option<SwitchId>) -> Hpa {
        let mut path = self.path.clone();
        path.push(node);
        let mut depends_on = self.depends_on.clone();
        if let Some(sw) = switch {
            depends_on.insert(sw);
        }
        Hpa { path, depends_on, used: false, active: false }
    }
}
