//! Percentage Charge Model
//!
//! Bulk formula:
//!
//! `amount = (units - free_units_value) * rate / 100
//!           + fixed_amount * (event_count - free_units_count)`
//!
//! Free usage is governed by two independently configurable thresholds, a
//! free-event count and a free cumulative amount, resolved against the
//! ordered per-event running totals carried by the aggregation. When a
//! per-transaction minimum or maximum is configured and the deployment is
//! licensed premium, the computation is replayed event by event instead:
//! the free budgets are consumed sequentially, each event's contribution is
//! clamped to `[min, max]`, and the clamped sum is authoritative. The bulk
//! figures remain visible in `amount_details` as diagnostics.
//!
//! The projected amount always rescales the actual amount by the period
//! ratio.

use rust_decimal::Decimal;
use tariff_types::{AmountDetails, ChargeModel};

use crate::error::{ChargeError, ChargeResult};
use crate::strategy::{ChargeInput, ChargeStrategy, display, div_or_zero, rescale_by_period};

#[derive(Debug, Default)]
pub struct PercentageChargeModel {
    /// Premium license gate for the per-transaction min/max path.
    pub premium: bool,
}

/// Bulk-formula intermediates, kept for the details payload.
struct BulkFigures {
    free_units_value: Decimal,
    units_applied: Decimal,
    percentage_amount: Decimal,
    fixed_fee_unit_amount: Decimal,
    fixed_fee_total_amount: Decimal,
}

impl BulkFigures {
    fn amount(&self) -> Decimal {
        self.percentage_amount + self.fixed_fee_total_amount
    }
}

impl PercentageChargeModel {
    pub fn new(premium: bool) -> Self {
        Self { premium }
    }

    fn rate(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        input.properties.rate.ok_or(ChargeError::MissingProperty {
            key: "rate",
            model: ChargeModel::Percentage,
        })
    }

    fn fixed_amount(&self, input: &ChargeInput<'_>) -> Decimal {
        input.properties.fixed_amount.unwrap_or(Decimal::ZERO)
    }

    fn min_max_applies(&self, input: &ChargeInput<'_>) -> bool {
        self.premium
            && (input.properties.per_transaction_min_amount.is_some()
                || input.properties.per_transaction_max_amount.is_some())
    }

    /// Aggregated units exempted from the percentage part.
    ///
    /// The free-event-count threshold wins when its index lands inside the
    /// running-total sequence; otherwise the free-amount threshold applies,
    /// capped by the final running total.
    fn free_units_value(&self, input: &ChargeInput<'_>) -> Decimal {
        // A zero event threshold frees nothing, same as an absent one.
        let free_events = input.properties.free_units_per_events.filter(|count| *count > 0);
        let free_amount = input.properties.free_units_per_total_aggregation;
        if free_events.is_none() && free_amount.is_none() {
            return Decimal::ZERO;
        }

        let running_total = &input.aggregation.running_total;
        let Some(&last) = running_total.last() else {
            return Decimal::ZERO;
        };

        if let Some(count) = free_events {
            if (count as usize) <= running_total.len() {
                return running_total[count as usize - 1];
            }
        }

        match free_amount {
            Some(threshold) => threshold.min(last),
            None => last,
        }
    }

    /// Events exempted from the per-event fixed fee: the smaller non-zero
    /// of the free-event threshold and the number of events whose running
    /// total stays within the free-amount threshold.
    fn free_units_count(&self, input: &ChargeInput<'_>) -> u64 {
        let by_events = input.properties.free_units_per_events.unwrap_or(0);
        let by_amount = match input.properties.free_units_per_total_aggregation {
            Some(threshold) => input
                .aggregation
                .running_total
                .iter()
                .filter(|total| **total <= threshold)
                .count() as u64,
            None => 0,
        };

        match (by_events, by_amount) {
            (0, n) | (n, 0) => n,
            (a, b) => a.min(b),
        }
    }

    fn bulk(&self, input: &ChargeInput<'_>) -> ChargeResult<BulkFigures> {
        let free_units_value = self.free_units_value(input);
        let units_applied = (input.aggregation.units - free_units_value).max(Decimal::ZERO);
        let percentage_amount = units_applied * self.rate(input)? / Decimal::ONE_HUNDRED;

        let fixed_fee_unit_amount = self.fixed_amount(input);
        let paid_events = input.aggregation.count.saturating_sub(self.free_units_count(input));
        let fixed_fee_total_amount = fixed_fee_unit_amount * Decimal::from(paid_events);

        Ok(BulkFigures {
            free_units_value,
            units_applied,
            percentage_amount,
            fixed_fee_unit_amount,
            fixed_fee_total_amount,
        })
    }

    fn clamp(&self, input: &ChargeInput<'_>, amount: Decimal) -> Decimal {
        let mut clamped = amount;
        if let Some(min) = input.properties.per_transaction_min_amount {
            clamped = clamped.max(min);
        }
        if let Some(max) = input.properties.per_transaction_max_amount {
            clamped = clamped.min(max);
        }
        clamped
    }

    /// Event-by-event replay for the per-transaction min/max path.
    fn sequential_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let aggregator = input.aggregator.ok_or(ChargeError::MissingAggregator {
            model: ChargeModel::Percentage,
        })?;
        let series = aggregator.per_event_aggregation()?;

        let rate = self.rate(input)?;
        let fixed_amount = self.fixed_amount(input);
        let mut free_events_left = input.properties.free_units_per_events.unwrap_or(0);
        let mut free_amount_left = input
            .properties
            .free_units_per_total_aggregation
            .unwrap_or(Decimal::ZERO);

        let mut total = Decimal::ZERO;
        for &event_units in &series.event_aggregation {
            if free_events_left > 0 {
                free_events_left -= 1;
                continue;
            }

            let mut billable = event_units;
            let exempt = billable.min(free_amount_left).max(Decimal::ZERO);
            if exempt > Decimal::ZERO {
                free_amount_left -= exempt;
                billable -= exempt;
                if billable.is_zero() {
                    continue;
                }
            }

            let contribution = billable * rate / Decimal::ONE_HUNDRED + fixed_amount;
            total += self.clamp(input, contribution);
        }
        Ok(total)
    }
}

impl ChargeStrategy for PercentageChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Percentage
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        if self.min_max_applies(input) {
            self.sequential_amount(input)
        } else {
            Ok(self.bulk(input)?.amount())
        }
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(div_or_zero(self.compute_amount(input)?, input.total_units()))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(rescale_by_period(self.compute_amount(input)?, input.period_ratio))
    }

    fn amount_details(&self, input: &ChargeInput<'_>) -> ChargeResult<AmountDetails> {
        let bulk = self.bulk(input)?;
        let adjustment = if self.min_max_applies(input) {
            self.sequential_amount(input)? - bulk.percentage_amount - bulk.fixed_fee_total_amount
        } else {
            Decimal::ZERO
        };

        let mut details = AmountDetails::new();
        details.insert("rate".to_string(), display(self.rate(input)?));
        details.insert("units_applied".to_string(), display(bulk.units_applied));
        details.insert("free_units".to_string(), display(bulk.free_units_value));
        details.insert("per_unit_total_amount".to_string(), display(bulk.percentage_amount));
        details.insert(
            "fixed_fee_unit_amount".to_string(),
            display(bulk.fixed_fee_unit_amount),
        );
        details.insert(
            "fixed_fee_total_amount".to_string(),
            display(bulk.fixed_fee_total_amount),
        );
        details.insert(
            "min_max_adjustment_total_amount".to_string(),
            display(adjustment),
        );
        Ok(details)
    }
}
