//! Shared strategy contract
//!
//! Every charge model implements [`ChargeStrategy`]; the [`apply`] driver
//! turns a strategy plus a [`ChargeInput`] into the `ComputationResult`
//! handed to the fee builder. Strategies are stateless and thread-safe.

use rust_decimal::Decimal;
use tariff_types::{
    AggregationResult, AmountDetails, Charge, ChargeModel, ChargeProperties, ComputationResult,
    Currency, FixedCharge,
};
use tracing::error;

use crate::error::ChargeResult;
use crate::per_event::PerEventAggregator;

/// The entity a fee is computed for.
#[derive(Debug, Clone, Copy)]
pub enum Chargeable<'a> {
    /// A usage-based charge.
    Charge(&'a Charge),
    /// A recurring fixed charge.
    FixedCharge(&'a FixedCharge),
}

impl Chargeable<'_> {
    /// Charge model tag of the chargeable.
    pub fn charge_model(&self) -> ChargeModel {
        match self {
            Chargeable::Charge(charge) => charge.charge_model,
            Chargeable::FixedCharge(fixed) => fixed.charge_model,
        }
    }

    /// Whether quantities are prorated over the period.
    pub fn prorated(&self) -> bool {
        match self {
            Chargeable::Charge(charge) => charge.prorated,
            Chargeable::FixedCharge(fixed) => fixed.prorated,
        }
    }

    /// Billing currency, when the chargeable carries one.
    pub fn currency(&self) -> Option<&Currency> {
        match self {
            Chargeable::Charge(charge) => Some(&charge.currency),
            Chargeable::FixedCharge(_) => None,
        }
    }

    /// Human-readable chargeable kind for error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Chargeable::Charge(_) => "charge",
            Chargeable::FixedCharge(_) => "fixed charge",
        }
    }
}

/// Everything one computation reads: the chargeable, its configuration, the
/// aggregation snapshot, the forecasting inputs and the per-event
/// aggregation capability.
pub struct ChargeInput<'a> {
    /// Entity the fee is computed for.
    pub chargeable: Chargeable<'a>,
    /// Usage snapshot produced upstream.
    pub aggregation: &'a AggregationResult,
    /// Validated per-model configuration.
    pub properties: &'a ChargeProperties,
    /// Fraction of the billing period elapsed (0 < ratio <= 1); `None`
    /// disables forecasting math.
    pub period_ratio: Option<Decimal>,
    /// Whether to forecast full-period units and amount.
    pub calculate_projected_usage: bool,
    /// Capability to re-derive per-event unit series.
    pub aggregator: Option<&'a dyn PerEventAggregator>,
}

impl<'a> ChargeInput<'a> {
    /// Forecast full-period units from the snapshot's units.
    pub fn projected_units(&self) -> Decimal {
        projected_units(self.aggregation.units, self.period_ratio)
    }

    /// Proration-agnostic divisor for per-unit amounts: the non-prorated
    /// unit count when the aggregation carries one, the raw units
    /// otherwise.
    pub fn total_units(&self) -> Decimal {
        self.aggregation.full_units_number.unwrap_or(self.aggregation.units)
    }
}

/// A pricing strategy.
///
/// Implementations are pure functions of the input; they hold no per-call
/// state and may be invoked concurrently.
pub trait ChargeStrategy: Send + Sync {
    /// Charge model this strategy prices.
    fn model(&self) -> ChargeModel;

    /// Fee amount for the aggregated usage, in major currency units.
    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal>;

    /// Effective per-unit amount; zero whenever the divisor would be zero.
    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal>;

    /// Forecast full-period amount. Whether this re-derives from projected
    /// units or rescales `compute_amount` by the period ratio is a
    /// per-model contract and must not be unified.
    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal>;

    /// Model-specific breakdown for invoice rendering.
    fn amount_details(&self, _input: &ChargeInput<'_>) -> ChargeResult<AmountDetails> {
        Ok(AmountDetails::new())
    }
}

/// Run a strategy against its input and assemble the computation result.
pub fn apply(
    strategy: &dyn ChargeStrategy,
    input: &ChargeInput<'_>,
) -> ChargeResult<ComputationResult> {
    let aggregation = input.aggregation;

    let mut result = ComputationResult {
        units: aggregation.units,
        current_usage_units: aggregation.current_usage_units,
        full_units_number: aggregation.full_units_number,
        count: aggregation.count,
        amount: strategy.compute_amount(input)?,
        unit_amount: strategy.unit_amount(input)?,
        amount_details: strategy.amount_details(input)?,
        total_aggregated_units: aggregation.total_aggregated_units,
        grouped_by: aggregation.grouped_by.clone(),
        grouped_results: Vec::new(),
        projected_amount: None,
        projected_units: None,
    };

    if input.calculate_projected_usage {
        result.projected_units = Some(input.projected_units());
        result.projected_amount = Some(strategy.compute_projected_amount(input)?);
    }

    // An ungrouped result exposes itself as its only group.
    result.grouped_results = vec![result.clone()];

    Ok(result)
}

/// Forecast full-period units from partial-period actuals.
///
/// Zero when units are zero or the ratio is absent or non-positive. A
/// failed division is logged and degraded to zero; forecasting is the one
/// fail-soft path of the engine.
pub fn projected_units(units: Decimal, period_ratio: Option<Decimal>) -> Decimal {
    let Some(ratio) = period_ratio else {
        return Decimal::ZERO;
    };
    if ratio <= Decimal::ZERO || units.is_zero() {
        return Decimal::ZERO;
    }
    match units.checked_div(ratio) {
        Some(projected) => projected.round_dp(2),
        None => {
            error!(%units, %ratio, "projected units computation failed, defaulting to zero");
            Decimal::ZERO
        }
    }
}

/// Scale a partial-period amount up to a full-period forecast.
///
/// Zero when the ratio is absent, non-positive, or the division is not
/// representable.
pub(crate) fn rescale_by_period(amount: Decimal, period_ratio: Option<Decimal>) -> Decimal {
    match period_ratio {
        Some(ratio) if ratio > Decimal::ZERO => {
            amount.checked_div(ratio).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

/// Division with the zero-divisor guard every `unit_amount` needs.
pub(crate) fn div_or_zero(amount: Decimal, divisor: Decimal) -> Decimal {
    if divisor.is_zero() {
        Decimal::ZERO
    } else {
        amount.checked_div(divisor).unwrap_or(Decimal::ZERO)
    }
}

/// Render a decimal as the display string used in `amount_details`.
pub(crate) fn display(value: Decimal) -> serde_json::Value {
    serde_json::Value::String(value.normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn projected_units_scales_and_rounds() {
        assert_eq!(projected_units(dec!(10), Some(dec!(0.5))), dec!(20));
        assert_eq!(projected_units(dec!(1), Some(dec!(0.3))), dec!(3.33));
    }

    #[test]
    fn projected_units_degrades_to_zero() {
        assert_eq!(projected_units(dec!(10), None), Decimal::ZERO);
        assert_eq!(projected_units(dec!(10), Some(Decimal::ZERO)), Decimal::ZERO);
        assert_eq!(projected_units(dec!(10), Some(dec!(-0.2))), Decimal::ZERO);
        assert_eq!(projected_units(Decimal::ZERO, Some(dec!(0.5))), Decimal::ZERO);
        // Division overflow is caught, not propagated.
        assert_eq!(projected_units(Decimal::MAX, Some(dec!(0.000000001))), Decimal::ZERO);
    }

    #[test]
    fn div_or_zero_guards_zero_divisor() {
        assert_eq!(div_or_zero(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(div_or_zero(dec!(10), dec!(4)), dec!(2.5));
    }
}
