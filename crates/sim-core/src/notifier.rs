//! Event sink for placement and match notifications.
//!
//! Matchers are write-only producers; the simulation loop is the sole
//! reader and drains the log once per tick.

use crate::error::RejectReason;
use types::{Match, Order, OrderId};

/// Sink for the matcher's observable side effects.
///
/// A matcher calls exactly one of the placement methods per admission,
/// and `notify_order_matched` once per match emitted during a sweep.
pub trait Notifier {
    /// An order passed validation and entered the book.
    fn notify_order_placed(&mut self, order: &Order);

    /// An order failed validation and was discarded.
    fn notify_placement_failed(&mut self, order: &Order, reason: RejectReason);

    /// A fill was produced during a match sweep.
    fn notify_order_matched(&mut self, m: Match);
}

/// A failed placement together with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub order: Order,
    pub reason: RejectReason,
}

/// Event log that appends every notification to an in-memory sequence.
///
/// No deduplication and no ordering guarantees beyond insertion order.
/// The most recent placement entry corresponds to the most recent
/// admission, which lets the simulation confirm an outcome by popping
/// the tail.
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    pub placed_orders: Vec<Order>,
    pub placement_failed_orders: Vec<Rejection>,
    pub matches: Vec<Match>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the most recent placed entry if it belongs to `ord_id`.
    pub fn pop_placed_if(&mut self, ord_id: OrderId) -> Option<Order> {
        if self.placed_orders.last().map(|o| o.ord_id) == Some(ord_id) {
            self.placed_orders.pop()
        } else {
            None
        }
    }

    /// Pop the most recent failed entry if it belongs to `ord_id`.
    pub fn pop_failed_if(&mut self, ord_id: OrderId) -> Option<Rejection> {
        if self
            .placement_failed_orders
            .last()
            .map(|r| r.order.ord_id)
            == Some(ord_id)
        {
            self.placement_failed_orders.pop()
        } else {
            None
        }
    }

    /// Drain every accumulated match, leaving the log empty.
    pub fn take_matches(&mut self) -> Vec<Match> {
        std::mem::take(&mut self.matches)
    }
}

impl Notifier for InMemoryNotifier {
    fn notify_order_placed(&mut self, order: &Order) {
        self.placed_orders.push(order.clone());
    }

    fn notify_placement_failed(&mut self, order: &Order, reason: RejectReason) {
        self.placement_failed_orders.push(Rejection {
            order: order.clone(),
            reason,
        });
    }

    fn notify_order_matched(&mut self, m: Match) {
        self.matches.push(m);
    }
}
