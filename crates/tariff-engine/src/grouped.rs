//! Grouped computation
//!
//! When a charge declares pricing group keys and the aggregation carries
//! per-group sub-results, the selected strategy runs once per group and the
//! composite result sums the group outputs exactly. Per-group results stay
//! available for per-group invoice-line rendering.

use rust_decimal::Decimal;
use tariff_types::ComputationResult;

use crate::error::ChargeResult;
use crate::strategy::{ChargeInput, ChargeStrategy, apply, div_or_zero};

pub(crate) fn compute_grouped(
    strategy: &dyn ChargeStrategy,
    input: &ChargeInput<'_>,
) -> ChargeResult<ComputationResult> {
    let Some(sub_aggregations) = input.aggregation.aggregations.as_ref() else {
        // Grouping keys without sub-aggregations: nothing to fan out over.
        return apply(strategy, input);
    };

    let mut grouped_results = Vec::with_capacity(sub_aggregations.len());
    for sub_aggregation in sub_aggregations {
        let sub_input = ChargeInput {
            chargeable: input.chargeable,
            aggregation: sub_aggregation,
            properties: input.properties,
            period_ratio: input.period_ratio,
            calculate_projected_usage: input.calculate_projected_usage,
            aggregator: input.aggregator,
        };
        grouped_results.push(apply(strategy, &sub_input)?);
    }

    let amount: Decimal = grouped_results.iter().map(|group| group.amount).sum();
    let units: Decimal = grouped_results.iter().map(|group| group.units).sum();
    let current_usage_units: Decimal =
        grouped_results.iter().map(|group| group.current_usage_units).sum();
    let count: u64 = grouped_results.iter().map(|group| group.count).sum();

    let (projected_amount, projected_units) = if input.calculate_projected_usage {
        let amount_sum = grouped_results
            .iter()
            .map(|group| group.projected_amount.unwrap_or(Decimal::ZERO))
            .sum();
        let units_sum = grouped_results
            .iter()
            .map(|group| group.projected_units.unwrap_or(Decimal::ZERO))
            .sum();
        (Some(amount_sum), Some(units_sum))
    } else {
        (None, None)
    };

    Ok(ComputationResult {
        units,
        current_usage_units,
        full_units_number: input.aggregation.full_units_number,
        count,
        amount,
        unit_amount: div_or_zero(amount, units),
        amount_details: Default::default(),
        total_aggregated_units: input.aggregation.total_aggregated_units,
        grouped_by: input.aggregation.grouped_by.clone(),
        grouped_results,
        projected_amount,
        projected_units,
    })
}
