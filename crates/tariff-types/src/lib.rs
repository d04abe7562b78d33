//! Tariff Types
//!
//! This crate defines the data model shared between the tariff rating engine
//! and its collaborators: the charge configuration handed down by the plan
//! layer, the aggregation snapshot produced by the usage-aggregation layer,
//! and the computation result consumed by the fee builder. It carries no
//! business logic beyond trivial accessors.

#![deny(warnings)]
#![deny(missing_docs)]

mod types;

pub use types::{
    AggregationResult, AmountDetails, Charge, ChargeModel, ChargeProperties, ChargeRange,
    ComputationResult, Currency, CustomAggregation, FixedCharge,
};
