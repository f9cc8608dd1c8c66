//! Consumer - a hunger-driven bidder.
//!
//! Bids for one unit of its asset each tick at a price that rises the
//! longer it has gone without consuming. Freshly fed it bids nothing;
//! starved it approaches its reservation price. Each new bid replaces
//! the previous resting order, so at most one order is ever live.

use crate::traits::{Action, Agent};
use types::{Match, Observation, Order, OrderId, Price, Quantity, Side, Symbol, Tick, TraderId};

/// Configuration for a Consumer agent.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Asset to buy.
    pub asset: Symbol,
    /// Reservation price: the bid approaches this as hunger grows.
    pub max_price: Price,
    /// Ticks without consumption at which the bid reaches half of
    /// `max_price`.
    pub ticks_until_half_hunger: Tick,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            asset: "FOOD".to_string(),
            max_price: Price(100),
            ticks_until_half_hunger: 10,
        }
    }
}

/// A buyer whose willingness to pay grows with time since its last meal.
pub struct Consumer {
    trader_id: TraderId,
    config: ConsumerConfig,
    /// Tick of the last consumption; seeded with the first observed tick
    /// so the agent does not start starving.
    last_consumed: Option<Tick>,
    /// Resting order from the previous tick, replaced on the next bid.
    last_placed: Option<OrderId>,
}

impl Consumer {
    pub fn new(config: ConsumerConfig) -> Self {
        Self {
            trader_id: TraderId(0),
            config,
            last_consumed: None,
            last_placed: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ConsumerConfig::default())
    }

    /// Current bid: `max_price * t / (t + half_hunger)` where `t` is the
    /// ticks since last consumption. Zero right after eating, half the
    /// reservation price at `ticks_until_half_hunger`, saturating toward
    /// `max_price` as starvation grows. Integer arithmetic throughout.
    fn hunger_price(&self, now: Tick) -> Price {
        let fed_at = self.last_consumed.unwrap_or(now);
        let starving_for = now.saturating_sub(fed_at);
        let denom = starving_for + self.config.ticks_until_half_hunger;
        if denom == 0 {
            return Price::ZERO;
        }
        let max = u64::from(self.config.max_price.raw());
        Price((max * starving_for / denom) as u32)
    }
}

impl Agent for Consumer {
    fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    fn set_trader_id(&mut self, id: TraderId) {
        self.trader_id = id;
    }

    fn policy(&mut self, observation: &Observation) -> Action {
        if self.last_consumed.is_none() {
            self.last_consumed = Some(observation.time);
        }

        let price = self.hunger_price(observation.time);
        if price.is_zero() {
            // Not hungry enough to bid anything yet.
            return Action::none();
        }

        // Quantity 1 so a fill is always a whole meal.
        let order = Order::limit(
            self.trader_id,
            self.config.asset.clone(),
            Side::Buy,
            price,
            Quantity(1),
        );

        match self.last_placed.take() {
            Some(previous) => Action::replace(order, previous),
            None => Action::place(order),
        }
    }

    fn order_placed(&mut self, ord_id: OrderId, _now: Tick) {
        self.last_placed = Some(ord_id);
    }

    fn match_found(&mut self, _m: &Match, now: Tick) {
        self.last_consumed = Some(now);
    }

    fn last_will(&mut self, _observation: &Observation) -> Action {
        // Leave no resting bid behind.
        match self.last_placed.take() {
            Some(ord_id) => Action::cancel(ord_id),
            None => Action::none(),
        }
    }

    fn name(&self) -> &str {
        "Consumer"
    }
}
