//! Match events produced by the matcher.

use crate::ids::TraderId;
use crate::money::Quantity;
use crate::order::Order;
use serde::{Deserialize, Serialize};

/// One fill between a buyer and a seller.
///
/// Carries copies of both orders as they looked immediately after the
/// fill was applied. `buyer` is always the `Buy`-side order and `seller`
/// the `Sell`-side order, regardless of which of the two was the taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub buyer: Order,
    pub seller: Order,
    /// Quantity this match contributed to both fills. Always positive.
    pub qty: Quantity,
}

impl Match {
    /// Trader on the buy side.
    pub fn buyer_id(&self) -> TraderId {
        self.buyer.trader_id
    }

    /// Trader on the sell side.
    pub fn seller_id(&self) -> TraderId {
        self.seller.trader_id
    }

    /// Whether the given trader was one of the counterparties.
    pub fn involves(&self, trader_id: TraderId) -> bool {
        self.buyer_id() == trader_id || self.seller_id() == trader_id
    }
}
