//! Synthetic workload generation.

use asrs_core::{NodeId, OrderId, SimRng};
use asrs_topology::WarehouseGraph;

use crate::Order;

/// Sample `count` orders uniformly, with replacement, over all storage nodes.
///
/// The same `rng` state always produces the same order list.  Generated
/// orders carry no priority.
pub fn generate_orders(graph: &WarehouseGraph, count: usize, rng: &mut SimRng) -> Vec<Order> {
    let slots: Vec<NodeId> = graph.storage_nodes().collect();
    let mut orders = Vec::with_capacity(count);
    for i in 0..count {
        let Some(&target) = rng.choose(&slots) else {
            break;
        };
        if let Some(slot) = graph.slot_of(target) {
            orders.push(Order::new(OrderId(i as u32), target, slot));
        }
    }
    orders
}
