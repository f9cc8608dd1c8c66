//! Core identifier types for the market simulator.
//!
//! Newtypes keep order ids and trader ids from being mixed up at call
//! sites; both are assigned by the engine, never chosen by agents.

use derive_more::{Add, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Core ID Types
// =============================================================================

/// Unique identifier for an order placement.
///
/// Assigned by the simulation at dispatch time, monotone from 1. Whatever
/// id an agent wrote into its submitted order is overwritten.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    From,
    Into,
)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order#{}", self.0)
    }
}

/// Unique identifier for a trading agent.
///
/// Assigned by the simulation when the agent is added, monotone from 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    From,
    Into,
)]
pub struct TraderId(pub u64);

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trader#{}", self.0)
    }
}

// =============================================================================
// Symbol & Time Types
// =============================================================================

/// Asset symbol (e.g. "FOOD", "WATER").
pub type Symbol = String;

/// Simulation tick (discrete time step).
pub type Tick = u64;
