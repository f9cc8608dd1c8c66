//! Order types for the market simulator.
//!
//! Defines order sides, the four order kinds (market, limit, stop,
//! stop-limit), and the `Order` record itself together with the
//! activation predicates that decide when a dormant stop order wakes up.

use crate::ids::{OrderId, Symbol, TraderId};
use crate::market_data::Spread;
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Order Side
// =============================================================================

/// Which side of the market the order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// =============================================================================
// Order Kind
// =============================================================================

/// Kind of order, carrying the prices that kind needs.
///
/// A stop order rests dormant until its stop price is reached, then takes
/// liquidity like a market order. A stop-limit rests dormant the same way
/// but turns into a plain limit once armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Execute immediately at the best available price.
    Market,
    /// Rest on the book at the given price.
    Limit { price: Price },
    /// Become a market order once the stop price is reached.
    Stop { stop_price: Price },
    /// Become a limit order at `price` once the stop price is reached.
    StopLimit { price: Price, stop_price: Price },
}

impl OrderKind {
    /// The limit price, for kinds that rest on the book.
    pub fn limit_price(&self) -> Option<Price> {
        match *self {
            OrderKind::Limit { price } | OrderKind::StopLimit { price, .. } => Some(price),
            OrderKind::Market | OrderKind::Stop { .. } => None,
        }
    }

    /// The stop price, for kinds that arm on a trigger.
    pub fn stop_price(&self) -> Option<Price> {
        match *self {
            OrderKind::Stop { stop_price } | OrderKind::StopLimit { stop_price, .. } => {
                Some(stop_price)
            }
            OrderKind::Market | OrderKind::Limit { .. } => None,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit { price } => write!(f, "LIMIT@{}", price),
            OrderKind::Stop { stop_price } => write!(f, "STOP@{}", stop_price),
            OrderKind::StopLimit { price, stop_price } => {
                write!(f, "STOPLIMIT@{}/{}", price, stop_price)
            }
        }
    }
}

// =============================================================================
// Order Record
// =============================================================================

/// A trading order submitted by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Agent who placed the order.
    pub trader_id: TraderId,
    /// Placement id (assigned by the simulation; 0 as placeholder).
    pub ord_id: OrderId,
    /// Admission sequence number, set by the matcher when the order is
    /// admitted. Monotone across one matcher.
    pub ord_num: u64,
    /// Asset being traded.
    pub asset: Symbol,
    /// Buy or sell.
    pub side: Side,
    /// Market, limit, stop, or stop-limit.
    pub kind: OrderKind,
    /// Total quantity.
    pub qty: Quantity,
    /// Quantity filled so far. Invariant: `fill <= qty`.
    pub fill: Quantity,
}

impl Order {
    /// Create a new market order.
    pub fn market(trader_id: TraderId, asset: impl Into<Symbol>, side: Side, qty: Quantity) -> Self {
        Self::new(trader_id, asset, side, OrderKind::Market, qty)
    }

    /// Create a new limit order.
    pub fn limit(
        trader_id: TraderId,
        asset: impl Into<Symbol>,
        side: Side,
        price: Price,
        qty: Quantity,
    ) -> Self {
        Self::new(trader_id, asset, side, OrderKind::Limit { price }, qty)
    }

    /// Create a new stop order.
    pub fn stop(
        trader_id: TraderId,
        asset: impl Into<Symbol>,
        side: Side,
        stop_price: Price,
        qty: Quantity,
    ) -> Self {
        Self::new(trader_id, asset, side, OrderKind::Stop { stop_price }, qty)
    }

    /// Create a new stop-limit order.
    pub fn stop_limit(
        trader_id: TraderId,
        asset: impl Into<Symbol>,
        side: Side,
        price: Price,
        stop_price: Price,
        qty: Quantity,
    ) -> Self {
        Self::new(
            trader_id,
            asset,
            side,
            OrderKind::StopLimit { price, stop_price },
            qty,
        )
    }

    fn new(
        trader_id: TraderId,
        asset: impl Into<Symbol>,
        side: Side,
        kind: OrderKind,
        qty: Quantity,
    ) -> Self {
        Self {
            trader_id,
            ord_id: OrderId(0),
            ord_num: 0,
            asset: asset.into(),
            side,
            kind,
            qty,
            fill: Quantity::ZERO,
        }
    }

    /// Quantity still open.
    #[inline]
    pub fn unfilled(&self) -> Quantity {
        self.qty.saturating_sub(self.fill)
    }

    /// Check if the order is fully filled.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.fill >= self.qty
    }

    /// Check if this is a buy order.
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    /// Check if this is a sell order.
    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    /// Total value of the order at its limit price, in cents.
    pub fn notional(&self) -> Option<u64> {
        self.limit_price()
            .map(|price| u64::from(price.raw()) * u64::from(self.qty.raw()))
    }

    /// The limit price, if this kind rests on the book.
    pub fn limit_price(&self) -> Option<Price> {
        self.kind.limit_price()
    }

    /// The stop price, if this kind arms on a trigger.
    pub fn stop_price(&self) -> Option<Price> {
        self.kind.stop_price()
    }

    /// Should this order currently take liquidity like a market order?
    ///
    /// Market orders always do. A stop order does once its trigger is
    /// reached: a buy stop arms when the lowest ask has risen to its stop
    /// price, a sell stop when the highest bid has fallen to it. Limit and
    /// stop-limit orders never take liquidity themselves.
    pub fn treat_as_market(&self, spread: &Spread) -> bool {
        match self.kind {
            OrderKind::Market => true,
            OrderKind::Limit { .. } | OrderKind::StopLimit { .. } => false,
            OrderKind::Stop { stop_price } => self.stop_armed(stop_price, spread),
        }
    }

    /// Should this order currently provide liquidity like a limit order?
    ///
    /// Limit orders always do. A stop-limit does once its trigger is
    /// reached, using the same arming rule as a stop. Market and stop
    /// orders never rest as limits.
    pub fn treat_as_limit(&self, spread: &Spread) -> bool {
        match self.kind {
            OrderKind::Limit { .. } => true,
            OrderKind::Market | OrderKind::Stop { .. } => false,
            OrderKind::StopLimit { stop_price, .. } => self.stop_armed(stop_price, spread),
        }
    }

    fn stop_armed(&self, stop_price: Price, spread: &Spread) -> bool {
        match self.side {
            Side::Buy => match spread.lowest_ask {
                Some(ask) => ask >= stop_price,
                None => false,
            },
            Side::Sell => match spread.highest_bid {
                Some(bid) => bid <= stop_price,
                None => false,
            },
        }
    }
}
