//! Integer money types for the market simulator.
//!
//! Prices are whole cents and quantities are whole units; there is no
//! floating point anywhere in the engine. Both are newtypes so a price
//! can never be handed where a quantity is expected.

use derive_more::{Add, AddAssign, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Quantity Type
// =============================================================================

/// Number of units of an asset.
#[derive(
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
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Quantity(pub u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Get the raw value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Check if zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating subtraction.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Quantity(self.0.saturating_sub(rhs.0))
    }

    /// Minimum of two quantities.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Quantity(self.0.min(other.0))
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qty({})", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Allow `quantity == 50` comparisons in tests and assertions
impl PartialEq<u32> for Quantity {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Price Type
// =============================================================================

/// Price in whole cents.
///
/// # Examples
/// - `Price(100)` = $1.00
/// - `Price(1050)` = $10.50
/// - `Price(1)` = $0.01 (smallest increment)
#[derive(
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
    Sub,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Price(pub u32);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Raw value in cents.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Check if zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating subtraction.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Price(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price(${}.{:02})", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl PartialEq<u32> for Price {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}
