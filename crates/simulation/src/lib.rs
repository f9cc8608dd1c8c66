//! Simulation crate: the tick loop for the market simulator.
//!
//! This crate provides the runner that coordinates a population of
//! agents against one matcher per asset.
//!
//! # Architecture
//!
//! The simulation runs in discrete ticks:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                Simulation.step()                 │
//! │                                                  │
//! │  1. Snapshot spread + depth into the Observation │
//! │  2. For each agent, in insertion order:          │
//! │     policy() -> cancel first, then place         │
//! │     (order_placed / order_canceled fire inline)  │
//! │  3. Route accumulated matches to both            │
//! │     counterparties, sorted by trader id          │
//! │  4. Advance the tick counter, snapshot again     │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Everything is single-threaded and deterministic: a step runs to
//! completion before the next begins, matchers are owned by the runner,
//! and the notifier has exactly one reader.

mod runner;

pub use runner::{Simulation, SimulationStats};
