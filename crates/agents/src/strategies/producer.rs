//! Producer - an adaptive market seller.
//!
//! Dumps its output onto the market each tick, scaling production with
//! demand: when the best bid sits above its preferred price it makes
//! more, when below it winds production down. With no bids at all it
//! stops producing entirely.

use crate::traits::{Action, Agent};
use types::{Observation, Order, Price, Quantity, Side, Symbol, TraderId};

/// Configuration for a Producer agent.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Asset to sell.
    pub asset: Symbol,
    /// Price at which production neither grows nor shrinks.
    pub preferred_price: Price,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            asset: "FOOD".to_string(),
            preferred_price: Price(50),
        }
    }
}

/// A seller whose output per tick follows the strength of the bids.
pub struct Producer {
    trader_id: TraderId,
    config: ProducerConfig,
    /// Units sold per tick; adjusted one step each tick by demand.
    qty_per_tick: Quantity,
}

impl Producer {
    pub fn new(config: ProducerConfig) -> Self {
        Self {
            trader_id: TraderId(0),
            config,
            qty_per_tick: Quantity(1),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ProducerConfig::default())
    }

    /// Current output per tick.
    pub fn qty_per_tick(&self) -> Quantity {
        self.qty_per_tick
    }
}

impl Agent for Producer {
    fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    fn set_trader_id(&mut self, id: TraderId) {
        self.trader_id = id;
    }

    fn policy(&mut self, observation: &Observation) -> Action {
        // A brand-new asset has no book yet; trust one appears once an
        // order mentions it.
        let Some(spread) = observation.spread(&self.config.asset) else {
            return Action::none();
        };

        // Cease production while nobody is bidding.
        let Some(highest_bid) = spread.highest_bid else {
            return Action::none();
        };

        if highest_bid > self.config.preferred_price {
            self.qty_per_tick += Quantity(1);
        } else if highest_bid < self.config.preferred_price {
            self.qty_per_tick = self.qty_per_tick.saturating_sub(Quantity(1));
        }

        if self.qty_per_tick.is_zero() {
            return Action::none();
        }

        Action::place(Order::market(
            self.trader_id,
            self.config.asset.clone(),
            Side::Sell,
            self.qty_per_tick,
        ))
    }

    fn name(&self) -> &str {
        "Producer"
    }
}
