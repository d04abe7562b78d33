//! Error handling for the rating engine
//!
//! Charge configuration is validated upstream, so most variants here mark
//! contract violations that must surface to the caller rather than be
//! defaulted away. The single fail-soft path of the engine (projected-units
//! forecasting) never reaches this type.

use rust_decimal::Decimal;
use tariff_types::ChargeModel;
use thiserror::Error;

/// Error type for charge-model computations.
#[derive(Error, Debug)]
pub enum ChargeError {
    /// The charge-model tag is not supported for the chargeable type or
    /// computation path that requested it.
    #[error("charge model `{model}` is not implemented for {chargeable}")]
    NotImplemented {
        /// Requested charge model.
        model: ChargeModel,
        /// Chargeable type or computation path, e.g. `"fixed charge"`.
        chargeable: &'static str,
    },

    /// A property required by the selected model is missing from the
    /// configuration bag.
    #[error("charge property `{key}` is required by the {model} model")]
    MissingProperty {
        /// Missing configuration key.
        key: &'static str,
        /// Model that required it.
        model: ChargeModel,
    },

    /// No volume range covers the unit count; the range configuration
    /// violates its contiguity contract.
    #[error("no volume range matches {units} units")]
    NoMatchingRange {
        /// Unit count that fell outside every configured band.
        units: Decimal,
    },

    /// The chargeable carries no currency but the model needs subunit
    /// scaling.
    #[error("charge model `{model}` requires a billing currency")]
    MissingCurrency {
        /// Model that required the currency.
        model: ChargeModel,
    },

    /// The model needs per-event series but no aggregator capability was
    /// supplied.
    #[error("charge model `{model}` requires a per-event aggregator")]
    MissingAggregator {
        /// Model that required the capability.
        model: ChargeModel,
    },

    /// The per-event aggregation collaborator failed.
    #[error("per-event aggregation failed: {0}")]
    PerEventAggregation(#[from] anyhow::Error),

    /// The aggregation snapshot is inconsistent with the computation that
    /// was requested of it.
    #[error("invalid aggregation result: {message}")]
    InvalidAggregation {
        /// What the snapshot was missing or carrying inconsistently.
        message: String,
    },
}

impl ChargeError {
    /// Error category for logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            ChargeError::NotImplemented { .. } => "not_implemented",
            ChargeError::MissingProperty { .. } => "missing_property",
            ChargeError::NoMatchingRange { .. } => "no_matching_range",
            ChargeError::MissingCurrency { .. } => "missing_currency",
            ChargeError::MissingAggregator { .. } => "missing_aggregator",
            ChargeError::PerEventAggregation(_) => "per_event_aggregation",
            ChargeError::InvalidAggregation { .. } => "invalid_aggregation",
        }
    }
}

/// Result alias for charge-model computations.
pub type ChargeResult<T> = Result<T, ChargeError>;
