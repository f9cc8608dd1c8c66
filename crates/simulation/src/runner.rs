//! The tick-driven simulation runner.
//!
//! Owns the agent population, one matcher per asset (created lazily the
//! first time an order mentions the asset), the shared event log, and
//! the cached per-tick observation.

use std::collections::HashMap;

use agents::{Agent, AgentSelector};
use sim_core::{Admission, InMemoryNotifier, Matcher};
use tracing::debug;
use types::{Observation, OrderId, Symbol, Tick, TraderId};

/// Counters accumulated over a simulation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationStats {
    /// Current tick number.
    pub tick: Tick,
    /// Orders submitted by agents (accepted or not).
    pub total_orders: u64,
    /// Orders refused at admission.
    pub rejected_orders: u64,
    /// Cancel requests swept across the books.
    pub total_cancels: u64,
    /// Matches routed to counterparties.
    pub total_matches: u64,
}

/// The simulation: agents plus one matcher per asset.
///
/// Agents act in insertion order within a tick, so earlier-added agents
/// place first and their resting limits can be consumed by later agents'
/// market orders in the same tick.
pub struct Simulation {
    /// Owned agent population, insertion-ordered.
    agents: Vec<Box<dyn Agent>>,
    /// One matcher per asset, created on first mention.
    matchers: HashMap<Symbol, Matcher>,
    /// Event log written by every matcher, drained here once per tick.
    notifier: InMemoryNotifier,
    /// Snapshot rebuilt at the start and end of every step.
    latest_observation: Observation,
    tick: Tick,
    /// Next trader id to hand out, monotone from 1.
    next_trader_id: u64,
    /// Next order id to stamp at dispatch, monotone from 1.
    next_order_id: u64,
    stats: SimulationStats,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            matchers: HashMap::new(),
            notifier: InMemoryNotifier::new(),
            latest_observation: Observation::default(),
            tick: 0,
            next_trader_id: 1,
            next_order_id: 1,
            stats: SimulationStats::default(),
        }
    }

    /// Add an agent, assigning it the next trader id.
    pub fn add_agent(&mut self, mut agent: Box<dyn Agent>) -> TraderId {
        let id = TraderId(self.next_trader_id);
        self.next_trader_id += 1;
        agent.set_trader_id(id);
        self.agents.push(agent);
        id
    }

    /// Remove every agent the selector rejects.
    ///
    /// A removed agent gets one `last_will` against the latest
    /// observation; only its cancel is honored (swept across every
    /// book), never a final placement.
    pub fn remove_agents(&mut self, selector: &mut dyn AgentSelector) {
        let Self {
            agents,
            matchers,
            latest_observation,
            ..
        } = self;

        agents.retain_mut(|agent| {
            if selector.keep(agent.as_ref()) {
                return true;
            }
            let final_action = agent.last_will(latest_observation);
            if let Some(doomed) = final_action.cancel_order {
                for matcher in matchers.values_mut() {
                    matcher.cancel_order(doomed);
                }
            }
            false
        });
    }

    /// Run one tick.
    pub fn step(&mut self) {
        self.observe();

        for idx in 0..self.agents.len() {
            let action = self.agents[idx].policy(&self.latest_observation);

            // Cancels run before placements within one action.
            if let Some(doomed) = action.cancel_order {
                for matcher in self.matchers.values_mut() {
                    matcher.cancel_order(doomed);
                }
                self.stats.total_cancels += 1;
                self.agents[idx].order_canceled(doomed, self.tick);
            }

            if let Some(mut order) = action.place_order {
                let ord_id = OrderId(self.next_order_id);
                self.next_order_id += 1;
                order.ord_id = ord_id;
                self.stats.total_orders += 1;

                let matcher = self.matchers.entry(order.asset.clone()).or_default();
                match matcher.add_order(order, true, &mut self.notifier) {
                    Admission::Accepted { .. } => {
                        self.notifier.pop_placed_if(ord_id);
                        self.agents[idx].order_placed(ord_id, self.tick);
                    }
                    Admission::Rejected { reason } => {
                        // Placement failure is not signalled to the agent.
                        self.notifier.pop_failed_if(ord_id);
                        self.stats.rejected_orders += 1;
                        debug!(
                            trader = %self.agents[idx].trader_id(),
                            %ord_id,
                            %reason,
                            "placement rejected"
                        );
                    }
                }
            }
        }

        self.route_matches();
        self.tick += 1;
        self.stats.tick = self.tick;

        // Snapshot again so the observation reflects this tick's trading.
        self.observe();
    }

    /// Run `ticks` steps back to back.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// The cached market snapshot.
    pub fn latest_observation(&self) -> &Observation {
        &self.latest_observation
    }

    /// Number of live agents.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Current tick.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Run counters.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    fn observe(&mut self) {
        self.latest_observation.time = self.tick;
        for (asset, matcher) in &self.matchers {
            self.latest_observation
                .spreads
                .insert(asset.clone(), matcher.spread());
            self.latest_observation
                .depths
                .insert(asset.clone(), matcher.depth());
        }
    }

    /// Deliver every accumulated match to both counterparties, then
    /// clear the log.
    ///
    /// Agents are kept sorted by trader id and each pass walks agents
    /// and matches together, so routing costs one sort of each rather
    /// than a scan per match. A counterparty that has been removed is
    /// silently skipped.
    fn route_matches(&mut self) {
        let mut matches = self.notifier.take_matches();
        if matches.is_empty() {
            return;
        }
        self.stats.total_matches += matches.len() as u64;

        self.agents.sort_by_key(|a| a.trader_id());

        // Buyers first.
        matches.sort_by_key(|m| m.buyer_id());
        let mut idx = 0;
        for m in &matches {
            while idx < self.agents.len() && self.agents[idx].trader_id() < m.buyer_id() {
                idx += 1;
            }
            if idx < self.agents.len() && self.agents[idx].trader_id() == m.buyer_id() {
                self.agents[idx].match_found(m, self.tick);
            }
        }

        // Then sellers.
        matches.sort_by_key(|m| m.seller_id());
        idx = 0;
        for m in &matches {
            while idx < self.agents.len() && self.agents[idx].trader_id() < m.seller_id() {
                idx += 1;
            }
            if idx < self.agents.len() && self.agents[idx].trader_id() == m.seller_id() {
                self.agents[idx].match_found(m, self.tick);
            }
        }
    }
}
