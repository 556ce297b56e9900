//! `PriorityQueue` — stable min-priority ordering of orders.
//!
//! Orders are bucketed by urgency in a `BTreeMap`; each bucket is a FIFO, so
//! equal priorities come out in arrival order without a sequence counter.
//! Orders without a priority share the final bucket, after every explicit
//! priority.

use std::collections::{BTreeMap, VecDeque};

use crate::Order;

/// Sort key: explicit priorities first (ascending), then unprioritised.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Urgency {
    Ranked(u32),
    Unranked,
}

impl From<Option<u32>> for Urgency {
    fn from(p: Option<u32>) -> Self {
        p.map_or(Urgency::Unranked, Urgency::Ranked)
    }
}

/// A min-priority queue over [`Order`]s.
#[derive(Default, Debug)]
pub struct PriorityQueue {
    inner: BTreeMap<Urgency, VecDeque<Order>>,
    /// Cached total for O(1) `len()`.
    total: usize,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.inner.entry(order.priority.into()).or_default().push_back(order);
        self.total += 1;
    }

    /// Remove the most urgent order (earliest arrival among equals).
    pub fn pop(&mut self) -> Option<Order> {
        let mut bucket = self.inner.first_entry()?;
        let order = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            bucket.remove();
        }
        if order.is_some() {
            self.total -= 1;
        }
        order
    }

    /// Priority of the next order to pop (`Some(None)` for an unprioritised one).
    pub fn peek_priority(&self) -> Option<Option<u32>> {
        self.inner
            .iter()
            .next()
            .and_then(|(_, bucket)| bucket.front())
            .map(|o| o.priority)
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Pop everything, most urgent first.
    pub fn drain_ordered(&mut self) -> Vec<Order> {
        let mut out = Vec::with_capacity(self.total);
        while let Some(o) = self.pop() {
            out.push(o);
        }
        out
    }
}

impl Extend<Order> for PriorityQueue {
    fn extend<I: IntoIterator<Item = Order>>(&mut self, iter: I) {
        for o in iter {
            self.push(o);
        }
    }
}

/// Reorder `orders` by ascending priority, ties by their current position.
pub fn prioritize(orders: Vec<Order>) -> Vec<Order> {
    let mut queue = PriorityQueue::new();
    queue.extend(orders);
    queue.drain_ordered()
}
