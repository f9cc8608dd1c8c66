//! Market data snapshots: top of book, depth, and per-tick observations.

use crate::ids::{Symbol, Tick};
use crate::money::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of depth bins reported per book side.
///
/// Fixed constant of the interface, not configurable.
pub const DEPTH_BIN_CAP: usize = 30;

// =============================================================================
// Spread
// =============================================================================

/// Top-of-book summary for one asset.
///
/// A side with no resting limit orders reports `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Spread {
    /// Highest resting bid price, if any bids exist.
    pub highest_bid: Option<Price>,
    /// Lowest resting ask price, if any asks exist.
    pub lowest_ask: Option<Price>,
}

impl Spread {
    /// True when there are no resting bids.
    #[inline]
    pub fn bids_missing(&self) -> bool {
        self.highest_bid.is_none()
    }

    /// True when there are no resting asks.
    #[inline]
    pub fn asks_missing(&self) -> bool {
        self.lowest_ask.is_none()
    }

    /// True when both book sides are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bids_missing() && self.asks_missing()
    }
}

// =============================================================================
// Depth
// =============================================================================

/// One price level of cumulative depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBin {
    /// Price of this level.
    pub price: Price,
    /// Cumulative unfilled quantity from the top of book through this level.
    pub total_qty: Quantity,
}

/// Cumulative book depth for one asset.
///
/// Bid bins are sorted by descending price, ask bins by ascending price.
/// Each side holds at most [`DEPTH_BIN_CAP`] bins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Depth {
    pub bid_bins: Vec<PriceBin>,
    pub ask_bins: Vec<PriceBin>,
}

// =============================================================================
// Observation
// =============================================================================

/// Per-tick market snapshot shared with every agent.
///
/// Contains the spread and depth of every asset that has a book. Agents
/// must extract what they need during `policy`; the observation is
/// rebuilt by the simulation each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Observation {
    /// Current simulation tick.
    pub time: Tick,
    /// Top of book per asset.
    pub spreads: HashMap<Symbol, Spread>,
    /// Cumulative depth per asset.
    pub depths: HashMap<Symbol, Depth>,
}

impl Observation {
    /// Spread for one asset, if it has a book.
    pub fn spread(&self, asset: &str) -> Option<&Spread> {
        self.spreads.get(asset)
    }

    /// Depth for one asset, if it has a book.
    pub fn depth(&self, asset: &str) -> Option<&Depth> {
        self.depths.get(asset)
    }
}
