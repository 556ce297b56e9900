//! Storage coordinates and the node model.
//!
//! A warehouse node is either a rack slot addressed by `(aisle, level)` or the
//! single depot where robots start and every completed order terminates.

use std::fmt;

/// A rack location: aisle index and level index, both zero-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub aisle: u32,
    pub level: u32,
}

impl Slot {
    #[inline]
    pub fn new(aisle: u32, level: u32) -> Self {
        Self { aisle, level }
    }

    /// `true` if `level` is the first or the last level of a rack with
    /// `levels` levels.  Transfer cars only run along these two levels.
    #[inline]
    pub fn is_boundary_level(self, levels: u32) -> bool {
        self.level == 0 || self.level + 1 == levels
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.aisle, self.level)
    }
}

/// What a graph node represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Storage(Slot),
    /// Retrieval / fulfillment zone.
    Depot,
}

impl Node {
    #[inline]
    pub fn slot(self) -> Option<Slot> {
        match self {
            Node::Storage(s) => Some(s),
            Node::Depot => None,
        }
    }

    #[inline]
    pub fn is_depot(self) -> bool {
        matches!(self, Node::Depot)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Storage(s) => s.fmt(f),
            Node::Depot => f.write_str("depot"),
        }
    }
}
