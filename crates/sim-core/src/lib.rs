//! Sim-core: order matching mechanics for the market simulator.
//!
//! This crate provides the per-asset matching engine:
//! - The [`Matcher`], which owns one asset's book and runs price-time
//!   priority matching with stop/stop-limit activation and lazy
//!   cancellation
//! - The [`Notifier`] sink that captures placement and match events,
//!   with [`InMemoryNotifier`] as the concrete event log
//! - [`Admission`] outcomes and [`RejectReason`] validation errors

mod error;
mod matcher;
mod notifier;

pub use error::RejectReason;
pub use matcher::{Admission, Matcher, OrderCounts};
pub use notifier::{InMemoryNotifier, Notifier, Rejection};
