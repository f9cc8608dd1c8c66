//! Per-asset matching engine with price-time priority.
//!
//! The matcher owns one asset's book:
//! - Limit and stop-limit orders rest in per-price FIFO buckets
//!   (`BTreeMap<Price, Vec<Order>>`, bids and asks kept separately)
//! - Market and stop orders wait in a single admission-ordered queue
//! - Cancellations are lazy: an id joins a set and the order is dropped
//!   the next time a traversal touches it
//!
//! Matching is driven entirely by admissions: every `add_order` with
//! `then_match` sweeps the market queue in admission order and fills each
//! active taker against the opposing limit book, best price first, FIFO
//! within a price. Dormant stop and stop-limit orders keep their queue
//! spot but are skipped until their trigger price is reached. Resting
//! limit orders never cross against each other; only the market queue
//! takes liquidity.

use crate::error::RejectReason;
use crate::notifier::Notifier;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};
use types::{
    DEPTH_BIN_CAP, Depth, Match, Order, OrderId, OrderKind, Price, PriceBin, Quantity, Side,
    Spread,
};

// =============================================================================
// Admission Outcome
// =============================================================================

/// Result of admitting one order.
///
/// The same outcome is mirrored into the notifier (placed or failed), so
/// callers may either inspect the return value or consume the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Admission {
    /// The order passed validation and entered the book.
    Accepted { ord_num: u64 },
    /// The order was refused and discarded.
    Rejected { reason: RejectReason },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_accepted()
    }
}

// =============================================================================
// Order Counts
// =============================================================================

/// Live order counts by kind, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderCounts {
    pub market: usize,
    pub limit: usize,
    pub stop: usize,
    pub stop_limit: usize,
}

impl OrderCounts {
    pub fn total(&self) -> usize {
        self.market + self.limit + self.stop + self.stop_limit
    }

    fn bump(&mut self, kind: &OrderKind) {
        match kind {
            OrderKind::Market => self.market += 1,
            OrderKind::Limit { .. } => self.limit += 1,
            OrderKind::Stop { .. } => self.stop += 1,
            OrderKind::StopLimit { .. } => self.stop_limit += 1,
        }
    }
}

// =============================================================================
// Matcher
// =============================================================================

/// Processes orders for a single asset.
#[derive(Debug, Default)]
pub struct Matcher {
    /// Admission sequence counter. Every admission attempt consumes a
    /// number, including rejected ones.
    last_ord_num: u64,
    /// Buy limits and buy stop-limits, FIFO per price.
    buy_limits: BTreeMap<Price, Vec<Order>>,
    /// Sell limits and sell stop-limits, FIFO per price.
    sell_limits: BTreeMap<Price, Vec<Order>>,
    /// Market and stop orders in admission order.
    market_orders: Vec<Order>,
    /// Ids canceled but not yet swept out of their container.
    canceled_order_ids: HashSet<OrderId>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an order: assign its admission number, validate, park it in
    /// the right container, and report the outcome through both the
    /// notifier and the returned [`Admission`]. With `then_match`, run a
    /// match sweep immediately afterwards.
    pub fn add_order(
        &mut self,
        mut order: Order,
        then_match: bool,
        notifier: &mut dyn Notifier,
    ) -> Admission {
        self.last_ord_num += 1;
        order.ord_num = self.last_ord_num;

        if let Err(reason) = Self::validate(&order) {
            debug!(ord_id = %order.ord_id, %reason, "order rejected");
            notifier.notify_placement_failed(&order, reason);
            return Admission::Rejected { reason };
        }

        let ord_num = order.ord_num;
        notifier.notify_order_placed(&order);

        match order.kind {
            OrderKind::Market | OrderKind::Stop { .. } => self.market_orders.push(order),
            OrderKind::Limit { price } | OrderKind::StopLimit { price, .. } => {
                self.buckets_mut(order.side).entry(price).or_default().push(order);
            }
        }

        if then_match {
            self.match_orders(notifier);
        }

        Admission::Accepted { ord_num }
    }

    /// Record an id for lazy removal.
    ///
    /// Additive and idempotent; canceling an unknown or already-filled id
    /// has no effect. Nothing is removed here: the order is dropped by
    /// the next traversal that touches its container, and it is excluded
    /// from spreads and depths immediately.
    pub fn cancel_order(&mut self, ord_id: OrderId) {
        self.canceled_order_ids.insert(ord_id);
    }

    /// Top of book, skipping buckets that hold only canceled orders.
    pub fn spread(&self) -> Spread {
        Spread {
            highest_bid: Self::best_price(self.buy_limits.iter().rev(), &self.canceled_order_ids),
            lowest_ask: Self::best_price(self.sell_limits.iter(), &self.canceled_order_ids),
        }
    }

    /// Cumulative depth per side, bids descending and asks ascending,
    /// capped at [`DEPTH_BIN_CAP`] bins.
    pub fn depth(&self) -> Depth {
        Depth {
            bid_bins: Self::depth_bins(self.buy_limits.iter().rev(), &self.canceled_order_ids),
            ask_bins: Self::depth_bins(self.sell_limits.iter(), &self.canceled_order_ids),
        }
    }

    /// Counts of resting orders by kind.
    pub fn order_counts(&self) -> OrderCounts {
        let mut counts = OrderCounts::default();
        for order in self.iter_live() {
            counts.bump(&order.kind);
        }
        counts
    }

    /// Append every live order (market queue, then buy limits, then sell
    /// limits) to `out`. Live means not fully filled; canceled orders
    /// that no traversal has swept yet still appear.
    pub fn dump_orders_to(&self, out: &mut Vec<Order>) {
        out.extend(self.iter_live().cloned());
    }

    fn iter_live(&self) -> impl Iterator<Item = &Order> {
        self.market_orders
            .iter()
            .chain(self.buy_limits.values().flatten())
            .chain(self.sell_limits.values().flatten())
            .filter(|o| !o.is_filled())
    }

    fn buckets_mut(&mut self, side: Side) -> &mut BTreeMap<Price, Vec<Order>> {
        match side {
            Side::Buy => &mut self.buy_limits,
            Side::Sell => &mut self.sell_limits,
        }
    }

    fn best_price<'a>(
        levels: impl Iterator<Item = (&'a Price, &'a Vec<Order>)>,
        canceled: &HashSet<OrderId>,
    ) -> Option<Price> {
        for (price, bucket) in levels {
            if bucket.iter().any(|o| !canceled.contains(&o.ord_id)) {
                return Some(*price);
            }
        }
        None
    }

    fn depth_bins<'a>(
        levels: impl Iterator<Item = (&'a Price, &'a Vec<Order>)>,
        canceled: &HashSet<OrderId>,
    ) -> Vec<PriceBin> {
        let mut bins = Vec::new();
        let mut cumulative = Quantity::ZERO;
        for (price, bucket) in levels {
            let level_qty: Quantity = bucket
                .iter()
                .filter(|o| !canceled.contains(&o.ord_id))
                .map(|o| o.unfilled())
                .sum();
            if level_qty.is_zero() {
                continue;
            }
            cumulative += level_qty;
            bins.push(PriceBin {
                price: *price,
                total_qty: cumulative,
            });
            if bins.len() == DEPTH_BIN_CAP {
                break;
            }
        }
        bins
    }

    fn validate(order: &Order) -> Result<(), RejectReason> {
        if order.qty.is_zero() {
            return Err(RejectReason::ZeroQuantity);
        }
        match order.kind {
            OrderKind::Market => Ok(()),
            OrderKind::Limit { price } => {
                if price.is_zero() {
                    Err(RejectReason::ZeroLimitPrice)
                } else {
                    Ok(())
                }
            }
            OrderKind::Stop { stop_price } => {
                if stop_price.is_zero() {
                    Err(RejectReason::ZeroStopPrice)
                } else {
                    Ok(())
                }
            }
            OrderKind::StopLimit { price, stop_price } => {
                if stop_price.is_zero() {
                    Err(RejectReason::ZeroStopPrice)
                } else if price.is_zero() {
                    Err(RejectReason::ZeroLimitPrice)
                } else if order.side == Side::Sell && stop_price < price {
                    // A sell stop-limit arms when the bid drops to the
                    // stop, then offers at >= price; a stop below the
                    // limit could never arm into a valid sell.
                    Err(RejectReason::StopBelowLimit)
                } else if order.side == Side::Buy && stop_price > price {
                    Err(RejectReason::StopAboveLimit)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Sweep the market queue in admission order, filling every active
    /// taker against the opposing limit book. The spread is recomputed
    /// from scratch before each market order so that fills earlier in the
    /// sweep can arm stops later in it.
    fn match_orders(&mut self, notifier: &mut dyn Notifier) {
        let mut queue = std::mem::take(&mut self.market_orders);
        let mut done: SmallVec<[usize; 8]> = SmallVec::new();

        for (idx, order) in queue.iter_mut().enumerate() {
            if self.canceled_order_ids.remove(&order.ord_id) {
                done.push(idx);
                continue;
            }

            let spread = self.spread();
            if spread.is_empty() {
                break;
            }
            let opposing_missing = match order.side {
                Side::Buy => spread.asks_missing(),
                Side::Sell => spread.bids_missing(),
            };
            if opposing_missing {
                continue;
            }
            if !order.treat_as_market(&spread) {
                continue; // dormant stop keeps its queue spot
            }

            match order.side {
                Side::Buy => Self::fill_against(
                    &mut self.sell_limits,
                    &mut self.canceled_order_ids,
                    order,
                    &spread,
                    false,
                    notifier,
                ),
                Side::Sell => Self::fill_against(
                    &mut self.buy_limits,
                    &mut self.canceled_order_ids,
                    order,
                    &spread,
                    true,
                    notifier,
                ),
            }

            if order.is_filled() {
                done.push(idx);
            }
        }

        for &idx in done.iter().rev() {
            queue.remove(idx);
        }
        self.market_orders = queue;
    }

    /// Fill one taker against a limit book, best price first. Canceled
    /// limits are dropped on touch, dormant stop-limits are skipped, and
    /// emptied buckets are pruned.
    fn fill_against(
        limits: &mut BTreeMap<Price, Vec<Order>>,
        canceled: &mut HashSet<OrderId>,
        taker: &mut Order,
        spread: &Spread,
        highest_first: bool,
        notifier: &mut dyn Notifier,
    ) {
        let prices: SmallVec<[Price; 16]> = if highest_first {
            limits.keys().rev().copied().collect()
        } else {
            limits.keys().copied().collect()
        };

        for price in prices {
            if taker.is_filled() {
                break;
            }
            let Some(bucket) = limits.get_mut(&price) else {
                continue;
            };

            let mut drop_idxs: SmallVec<[usize; 4]> = SmallVec::new();
            for (idx, resting) in bucket.iter_mut().enumerate() {
                if canceled.remove(&resting.ord_id) {
                    drop_idxs.push(idx);
                    continue;
                }
                if !resting.treat_as_limit(spread) {
                    continue; // dormant stop-limit keeps its queue spot
                }

                Self::fill_pair(taker, resting, notifier);

                if resting.is_filled() {
                    drop_idxs.push(idx);
                }
                if taker.is_filled() {
                    break;
                }
            }

            for &idx in drop_idxs.iter().rev() {
                bucket.remove(idx);
            }
            if bucket.is_empty() {
                limits.remove(&price);
            }
        }
    }

    /// Fill the smaller of the two open quantities and emit one match.
    fn fill_pair(taker: &mut Order, resting: &mut Order, notifier: &mut dyn Notifier) {
        let qty = taker.unfilled().min(resting.unfilled());
        if qty.is_zero() {
            return;
        }
        taker.fill += qty;
        resting.fill += qty;

        let m = match taker.side {
            Side::Buy => Match {
                buyer: taker.clone(),
                seller: resting.clone(),
                qty,
            },
            Side::Sell => Match {
                buyer: resting.clone(),
                seller: taker.clone(),
                qty,
            },
        };
        trace!(buyer = %m.buyer.trader_id, seller = %m.seller.trader_id, qty = %m.qty, "match");
        notifier.notify_order_matched(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::InMemoryNotifier;
    use types::TraderId;

    fn limit(id: u64, trader: u64, side: Side, price: u32, qty: u32) -> Order {
        let mut o = Order::limit(TraderId(trader), "TEST", side, Price(price), Quantity(qty));
        o.ord_id = OrderId(id);
        o
    }

    fn market(id: u64, trader: u64, side: Side, qty: u32) -> Order {
        let mut o = Order::market(TraderId(trader), "TEST", side, Quantity(qty));
        o.ord_id = OrderId(id);
        o
    }

    fn stop(id: u64, trader: u64, side: Side, stop_price: u32, qty: u32) -> Order {
        let mut o = Order::stop(TraderId(trader), "TEST", side, Price(stop_price), Quantity(qty));
        o.ord_id = OrderId(id);
        o
    }

    fn dump(matcher: &Matcher) -> Vec<Order> {
        let mut out = Vec::new();
        matcher.dump_orders_to(&mut out);
        out
    }

    #[test]
    fn test_empty_book_spread() {
        let matcher = Matcher::new();
        let spread = matcher.spread();

        assert!(spread.bids_missing());
        assert!(spread.asks_missing());
        assert!(spread.is_empty());
    }

    #[test]
    fn test_limits_never_cross() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        for order in [
            limit(1, 1, Side::Buy, 5, 100),
            limit(2, 2, Side::Sell, 10, 100),
            limit(3, 3, Side::Buy, 6, 100),
            limit(4, 4, Side::Sell, 12, 100),
        ] {
            assert!(matcher.add_order(order, true, &mut notifier).is_accepted());
        }

        assert!(notifier.matches.is_empty());
        let spread = matcher.spread();
        assert_eq!(spread.highest_bid, Some(Price(6)));
        assert_eq!(spread.lowest_ask, Some(Price(10)));
    }

    #[test]
    fn test_market_consumption_at_multiple_prices() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Buy, 5, 100), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 2, Side::Sell, 10, 100), true, &mut notifier);
        let _ = matcher.add_order(limit(3, 3, Side::Buy, 6, 100), true, &mut notifier);
        let _ = matcher.add_order(limit(4, 4, Side::Sell, 12, 100), true, &mut notifier);

        let _ = matcher.add_order(market(5, 5, Side::Buy, 50), true, &mut notifier);
        let _ = matcher.add_order(market(6, 6, Side::Buy, 50), true, &mut notifier);
        let _ = matcher.add_order(market(7, 7, Side::Sell, 150), true, &mut notifier);

        let matches = &notifier.matches;
        assert_eq!(matches.len(), 4);

        // Two market buys against the ask at $0.10.
        assert_eq!(matches[0].qty, Quantity(50));
        assert_eq!(matches[0].buyer.trader_id, TraderId(5));
        assert_eq!(matches[0].seller.trader_id, TraderId(2));
        assert_eq!(matches[1].qty, Quantity(50));
        assert_eq!(matches[1].buyer.trader_id, TraderId(6));
        assert_eq!(matches[1].seller.trader_id, TraderId(2));

        // Market sell walks the bids: all of $0.06 then half of $0.05.
        assert_eq!(matches[2].qty, Quantity(100));
        assert_eq!(matches[2].seller.trader_id, TraderId(7));
        assert_eq!(matches[2].buyer.trader_id, TraderId(3));
        assert_eq!(matches[3].qty, Quantity(50));
        assert_eq!(matches[3].buyer.trader_id, TraderId(1));

        let spread = matcher.spread();
        assert_eq!(spread.highest_bid, Some(Price(5)));
        assert_eq!(spread.lowest_ask, Some(Price(12)));
    }

    #[test]
    fn test_sell_stop_arms_when_bids_deplete() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Buy, 100, 50), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 2, Side::Buy, 90, 50), true, &mut notifier);
        let _ = matcher.add_order(limit(3, 3, Side::Buy, 80, 50), true, &mut notifier);

        // Dormant while the best bid sits at $1.00.
        let _ = matcher.add_order(stop(4, 4, Side::Sell, 90, 50), true, &mut notifier);
        assert!(notifier.matches.is_empty());
        assert_eq!(matcher.order_counts().stop, 1);

        // Consumes the $1.00 bid, leaving $0.90 on top.
        let _ = matcher.add_order(market(5, 5, Side::Sell, 50), true, &mut notifier);
        assert_eq!(notifier.matches.len(), 1);

        // This admission's sweep sees bid $0.90 <= stop $0.90: the stop
        // fires first (admission order) and takes that bid, then the new
        // market sell takes $0.80.
        let _ = matcher.add_order(market(6, 6, Side::Sell, 50), true, &mut notifier);

        let stop_match = notifier
            .matches
            .iter()
            .find(|m| m.seller.trader_id == TraderId(4))
            .expect("stop order should have matched");
        assert_eq!(stop_match.qty, Quantity(50));
        assert_eq!(stop_match.buyer.trader_id, TraderId(2));
        assert_eq!(matcher.order_counts().stop, 0);
    }

    #[test]
    fn test_validation_rejects() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let zero_qty = market(1, 1, Side::Buy, 0);
        assert_eq!(
            matcher.add_order(zero_qty, true, &mut notifier),
            Admission::Rejected {
                reason: RejectReason::ZeroQuantity
            }
        );

        let zero_price = limit(2, 1, Side::Buy, 0, 10);
        assert_eq!(
            matcher.add_order(zero_price, true, &mut notifier),
            Admission::Rejected {
                reason: RejectReason::ZeroLimitPrice
            }
        );

        let zero_stop = stop(3, 1, Side::Sell, 0, 10);
        assert_eq!(
            matcher.add_order(zero_stop, true, &mut notifier),
            Admission::Rejected {
                reason: RejectReason::ZeroStopPrice
            }
        );

        let mut sell_irrational =
            Order::stop_limit(TraderId(1), "TEST", Side::Sell, Price(100), Price(90), Quantity(1));
        sell_irrational.ord_id = OrderId(4);
        assert_eq!(
            matcher.add_order(sell_irrational, true, &mut notifier),
            Admission::Rejected {
                reason: RejectReason::StopBelowLimit
            }
        );

        let mut buy_irrational =
            Order::stop_limit(TraderId(1), "TEST", Side::Buy, Price(90), Price(100), Quantity(1));
        buy_irrational.ord_id = OrderId(5);
        assert_eq!(
            matcher.add_order(buy_irrational, true, &mut notifier),
            Admission::Rejected {
                reason: RejectReason::StopAboveLimit
            }
        );

        // Nothing entered any container, and every rejection was logged.
        assert!(dump(&matcher).is_empty());
        assert_eq!(notifier.placement_failed_orders.len(), 5);
        assert!(notifier.placed_orders.is_empty());
    }

    #[test]
    fn test_rejections_consume_admission_numbers() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let rejected = matcher.add_order(market(1, 1, Side::Buy, 0), true, &mut notifier);
        assert!(rejected.is_rejected());

        let accepted = matcher.add_order(market(2, 1, Side::Buy, 5), true, &mut notifier);
        assert_eq!(accepted, Admission::Accepted { ord_num: 2 });
    }

    #[test]
    fn test_market_orders_queue_on_empty_book() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(market(1, 1, Side::Buy, 10), true, &mut notifier);
        let _ = matcher.add_order(market(2, 2, Side::Sell, 10), true, &mut notifier);

        // Nothing to match against: both wait in the queue.
        assert!(notifier.matches.is_empty());
        assert_eq!(matcher.order_counts().market, 2);
        assert!(matcher.spread().is_empty());
    }

    #[test]
    fn test_queued_market_fills_when_liquidity_arrives() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(market(1, 1, Side::Buy, 10), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 2, Side::Sell, 100, 10), true, &mut notifier);

        assert_eq!(notifier.matches.len(), 1);
        assert_eq!(notifier.matches[0].buyer.trader_id, TraderId(1));
        assert_eq!(notifier.matches[0].seller.trader_id, TraderId(2));
        assert!(dump(&matcher).is_empty());
    }

    #[test]
    fn test_fifo_within_price_level() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Sell, 100, 30), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 2, Side::Sell, 100, 30), true, &mut notifier);
        let _ = matcher.add_order(market(3, 3, Side::Buy, 40), true, &mut notifier);

        assert_eq!(notifier.matches.len(), 2);
        assert_eq!(notifier.matches[0].seller.trader_id, TraderId(1));
        assert_eq!(notifier.matches[0].qty, Quantity(30));
        assert_eq!(notifier.matches[1].seller.trader_id, TraderId(2));
        assert_eq!(notifier.matches[1].qty, Quantity(10));
    }

    #[test]
    fn test_partial_limit_stays_at_its_price() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Sell, 100, 30), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 2, Side::Sell, 101, 30), true, &mut notifier);
        let _ = matcher.add_order(market(3, 3, Side::Buy, 45), true, &mut notifier);

        let total_matched: Quantity = notifier.matches.iter().map(|m| m.qty).sum();
        assert_eq!(total_matched, Quantity(45));

        // The second ask is half gone but still quoted at its price.
        let live = dump(&matcher);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].ord_id, OrderId(2));
        assert_eq!(live[0].unfilled(), Quantity(15));
        assert_eq!(matcher.spread().lowest_ask, Some(Price(101)));
    }

    #[test]
    fn test_cancel_is_idempotent_and_lazy() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(7, 1, Side::Sell, 100, 1), true, &mut notifier);
        matcher.cancel_order(OrderId(7));
        matcher.cancel_order(OrderId(7));
        matcher.cancel_order(OrderId(99)); // unknown id: no effect

        // Physically still parked, but invisible to spread and depth.
        assert_eq!(dump(&matcher).len(), 1);
        assert!(matcher.spread().asks_missing());
        assert!(matcher.depth().ask_bins.is_empty());

        // Matching activity at that price sweeps it without filling it.
        let _ = matcher.add_order(limit(8, 2, Side::Sell, 100, 1), true, &mut notifier);
        let _ = matcher.add_order(market(9, 3, Side::Buy, 1), true, &mut notifier);

        assert_eq!(notifier.matches.len(), 1);
        assert_eq!(notifier.matches[0].seller.ord_id, OrderId(8));
        assert!(dump(&matcher).is_empty());
    }

    #[test]
    fn test_canceled_market_order_dropped_by_sweep() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(market(1, 1, Side::Buy, 10), true, &mut notifier);
        matcher.cancel_order(OrderId(1));
        assert_eq!(dump(&matcher).len(), 1);

        // Any admission sweeps the queue and drops the canceled taker.
        let _ = matcher.add_order(limit(2, 2, Side::Sell, 100, 10), true, &mut notifier);

        assert!(notifier.matches.is_empty());
        let live = dump(&matcher);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].ord_id, OrderId(2));
    }

    #[test]
    fn test_dormant_stop_limit_skipped_in_queue() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        // Bid at $1.20 keeps the sell stop-limit (stop $1.10) dormant.
        let _ = matcher.add_order(limit(1, 1, Side::Buy, 120, 1), true, &mut notifier);
        let mut dormant =
            Order::stop_limit(TraderId(2), "TEST", Side::Sell, Price(100), Price(110), Quantity(5));
        dormant.ord_id = OrderId(2);
        let _ = matcher.add_order(dormant, true, &mut notifier);
        let _ = matcher.add_order(limit(3, 3, Side::Sell, 100, 5), true, &mut notifier);

        // The taker skips the dormant order despite its queue priority.
        let _ = matcher.add_order(market(4, 4, Side::Buy, 5), true, &mut notifier);
        assert_eq!(notifier.matches.len(), 1);
        assert_eq!(notifier.matches[0].seller.trader_id, TraderId(3));

        // Deplete the $1.20 bid, then re-bid low enough to arm the stop.
        let _ = matcher.add_order(market(5, 5, Side::Sell, 1), true, &mut notifier);
        let _ = matcher.add_order(limit(6, 6, Side::Buy, 105, 5), true, &mut notifier);
        let _ = matcher.add_order(market(7, 7, Side::Buy, 5), true, &mut notifier);

        let armed_match = notifier
            .matches
            .iter()
            .find(|m| m.seller.trader_id == TraderId(2))
            .expect("armed stop-limit should fill");
        assert_eq!(armed_match.qty, Quantity(5));
    }

    #[test]
    fn test_depth_is_cumulative_and_sorted() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Buy, 90, 10), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 1, Side::Buy, 100, 5), true, &mut notifier);
        let _ = matcher.add_order(limit(3, 1, Side::Buy, 95, 20), true, &mut notifier);
        let _ = matcher.add_order(limit(4, 2, Side::Sell, 110, 7), true, &mut notifier);
        let _ = matcher.add_order(limit(5, 2, Side::Sell, 120, 3), true, &mut notifier);

        let depth = matcher.depth();

        let bid_prices: Vec<Price> = depth.bid_bins.iter().map(|b| b.price).collect();
        assert_eq!(bid_prices, vec![Price(100), Price(95), Price(90)]);
        let bid_totals: Vec<Quantity> = depth.bid_bins.iter().map(|b| b.total_qty).collect();
        assert_eq!(bid_totals, vec![Quantity(5), Quantity(25), Quantity(35)]);

        let ask_prices: Vec<Price> = depth.ask_bins.iter().map(|b| b.price).collect();
        assert_eq!(ask_prices, vec![Price(110), Price(120)]);
        let ask_totals: Vec<Quantity> = depth.ask_bins.iter().map(|b| b.total_qty).collect();
        assert_eq!(ask_totals, vec![Quantity(7), Quantity(10)]);
    }

    #[test]
    fn test_depth_caps_at_thirty_bins() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        for i in 0..40u32 {
            let _ = matcher.add_order(
                limit(u64::from(i) + 1, 1, Side::Sell, 100 + i, 1),
                false,
                &mut notifier,
            );
        }

        let depth = matcher.depth();
        assert_eq!(depth.ask_bins.len(), DEPTH_BIN_CAP);
        assert_eq!(depth.ask_bins[0].price, Price(100));
        assert_eq!(
            depth.ask_bins.last().unwrap().total_qty,
            Quantity(DEPTH_BIN_CAP as u32)
        );
    }

    #[test]
    fn test_fill_conservation() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Sell, 100, 30), true, &mut notifier);
        let _ = matcher.add_order(limit(2, 2, Side::Sell, 101, 40), true, &mut notifier);
        let _ = matcher.add_order(limit(3, 3, Side::Buy, 95, 25), true, &mut notifier);
        let _ = matcher.add_order(market(4, 4, Side::Buy, 60), true, &mut notifier);
        let _ = matcher.add_order(market(5, 5, Side::Sell, 10), true, &mut notifier);

        let buyer_total: Quantity = notifier
            .matches
            .iter()
            .map(|m| m.qty)
            .sum();
        // 60 bought by the market buy, 10 sold into the resting bid.
        assert_eq!(buyer_total, Quantity(70));

        for m in &notifier.matches {
            assert_eq!(m.buyer.side, Side::Buy);
            assert_eq!(m.seller.side, Side::Sell);
            assert!(!m.qty.is_zero());
        }
    }

    #[test]
    fn test_order_counts_by_kind() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(market(1, 1, Side::Buy, 1), false, &mut notifier);
        let _ = matcher.add_order(limit(2, 1, Side::Sell, 100, 1), false, &mut notifier);
        let _ = matcher.add_order(limit(3, 1, Side::Sell, 101, 1), false, &mut notifier);
        let _ = matcher.add_order(stop(4, 1, Side::Sell, 90, 1), false, &mut notifier);
        let mut sl =
            Order::stop_limit(TraderId(1), "TEST", Side::Buy, Price(120), Price(110), Quantity(1));
        sl.ord_id = OrderId(5);
        let _ = matcher.add_order(sl, false, &mut notifier);

        let counts = matcher.order_counts();
        assert_eq!(counts.market, 1);
        assert_eq!(counts.limit, 2);
        assert_eq!(counts.stop, 1);
        assert_eq!(counts.stop_limit, 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_dump_order_is_queue_then_bids_then_asks() {
        let mut notifier = InMemoryNotifier::new();
        let mut matcher = Matcher::new();

        let _ = matcher.add_order(limit(1, 1, Side::Sell, 110, 1), false, &mut notifier);
        let _ = matcher.add_order(limit(2, 1, Side::Buy, 90, 1), false, &mut notifier);
        let _ = matcher.add_order(market(3, 1, Side::Buy, 1), false, &mut notifier);

        let live = dump(&matcher);
        let ids: Vec<OrderId> = live.iter().map(|o| o.ord_id).collect();
        assert_eq!(ids, vec![OrderId(3), OrderId(2), OrderId(1)]);
    }
}
