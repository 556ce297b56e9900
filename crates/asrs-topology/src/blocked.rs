//! Blocked-node exclusion set.
//!
//! Rerouting around an obstruction never copies or mutates the shared
//! [`WarehouseGraph`](crate::WarehouseGraph).  The router consults this set
//! at traversal time instead, so a blocked view costs one hash lookup per
//! relaxed edge and nothing up front.

use asrs_core::NodeId;

#[cfg(feature = "fx-hash")]
type NodeSet = rustc_hash::FxHashSet<NodeId>;
#[cfg(not(feature = "fx-hash"))]
type NodeSet = std::collections::HashSet<NodeId>;

/// Nodes a route must not pass through (including as source or target).
#[derive(Debug, Clone, Default)]
pub struct BlockedNodes {
    set: NodeSet,
}

impl BlockedNodes {
    /// An empty set: routing sees the full graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the node was not already blocked.
    pub fn insert(&mut self, node: NodeId) -> bool {
        self.set.insert(node)
    }

    /// Returns `true` if the node was blocked.
    pub fn remove(&mut self, node: NodeId) -> bool {
        self.set.remove(&node)
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        !self.set.is_empty() && self.set.contains(&node)
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Blocked nodes in ascending id order (stable for logs and tests).
    pub fn sorted(&self) -> Vec<NodeId> {
        let mut v: Vec<NodeId> = self.set.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

impl FromIterator<NodeId> for BlockedNodes {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self { set: iter.into_iter().collect() }
    }
}

impl Extend<NodeId> for BlockedNodes {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        self.set.extend(iter);
    }
}
