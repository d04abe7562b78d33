#![deny(warnings)]
//! The charge-model computation engine for the tariff billing platform.
//!
//! Converts a pre-aggregated usage quantity for a billing period into a
//! monetary fee amount under a pluggable set of pricing strategies. The
//! engine is a pure function of its inputs: no I/O, no shared mutable
//! state, all monetary math on arbitrary-precision decimals.
//!
//! Entry point is [`RatingEngine`], which selects and runs the strategy for
//! a chargeable and wraps it in the grouped computation when the charge
//! splits by event properties.

/// Engine facade and strategy registry
pub mod engine;
/// Structured error type for computations
pub mod error;
/// Grouped (fan-out) computation wrapper
pub mod grouped;
/// One strategy implementation per charge model
pub mod models;
/// Per-event aggregation capability, injected by the caller
pub mod per_event;
/// Tier boundary math shared by the tiered models
mod ranges;
/// Strategy selection rules
pub mod selector;
/// Shared strategy contract and computation driver
pub mod strategy;

pub use engine::RatingEngine;
pub use error::{ChargeError, ChargeResult};
pub use per_event::{PerEventAggregation, PerEventAggregator};
pub use selector::StrategyKind;
pub use strategy::{Chargeable, ChargeInput, ChargeStrategy, apply, projected_units};
