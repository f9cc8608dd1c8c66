//! Core types for the market simulator.
//!
//! This crate provides the value types shared by every layer of the
//! workspace: identifiers, integer money types, orders with their
//! activation predicates, matches, and the market observations handed
//! to agents each tick.

mod ids;
mod market_data;
mod money;
mod order;
mod trade;

pub use ids::{OrderId, Symbol, Tick, TraderId};
pub use market_data::{DEPTH_BIN_CAP, Depth, Observation, PriceBin, Spread};
pub use money::{Price, Quantity};
pub use order::{Order, OrderKind, Side};
pub use trade::Match;
