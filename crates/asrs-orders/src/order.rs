//! The order model.

use asrs_core::{NodeId, OrderId, OrderSpec, Slot};
use asrs_topology::WarehouseGraph;

use crate::{OrderError, OrderResult};

/// One storage/retrieval request against a rack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Arrival index; also the tie-breaker for equal priorities.
    pub id:       OrderId,
    pub target:   NodeId,
    pub slot:     Slot,
    /// Lower is more urgent.  `None` sorts after every explicit priority.
    pub priority: Option<u32>,
}

impl Order {
    pub fn new(id: OrderId, target: NodeId, slot: Slot) -> Self {
        Self { id, target, slot, priority: None }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Turn externally supplied specs into orders, numbering them in input order.
///
/// Fails on the first spec whose slot is outside the rack.
pub fn resolve_orders(graph: &WarehouseGraph, specs: &[OrderSpec]) -> OrderResult<Vec<Order>> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let slot = Slot::new(spec.aisle, spec.level);
            let target = graph.storage_node(slot).ok_or(OrderError::UnknownSlot { slot })?;
            Ok(Order {
                id: OrderId(i as u32),
                target,
                slot,
                priority: spec.priority,
            })
        })
        .collect()
}
