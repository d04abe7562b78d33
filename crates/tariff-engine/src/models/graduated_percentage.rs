//! Graduated Percentage Charge Model
//!
//! Same tier walk and stop rule as the graduated model, but each band
//! prices its units at a percentage rate instead of a per-unit amount:
//!
//! `band contribution = units_in_band * rate / 100 + flat_amount`
//!
//! The projected amount rescales the actual amount by the period ratio.

use rust_decimal::Decimal;
use tariff_types::{AmountDetails, ChargeModel, ChargeRange};

use crate::error::{ChargeError, ChargeResult};
use crate::ranges::{flat_amount, is_final_range, units_in_range};
use crate::strategy::{ChargeInput, ChargeStrategy, display, div_or_zero, rescale_by_period};

#[derive(Debug, Default)]
pub struct GraduatedPercentageChargeModel;

impl GraduatedPercentageChargeModel {
    fn ranges<'a>(&self, input: &'a ChargeInput<'_>) -> ChargeResult<&'a [ChargeRange]> {
        let ranges = input.properties.graduated_percentage_ranges.as_slice();
        if ranges.is_empty() {
            return Err(ChargeError::MissingProperty {
                key: "graduated_percentage_ranges",
                model: ChargeModel::GraduatedPercentage,
            });
        }
        Ok(ranges)
    }

    fn rate(&self, range: &ChargeRange) -> ChargeResult<Decimal> {
        range.rate.ok_or(ChargeError::MissingProperty {
            key: "rate",
            model: ChargeModel::GraduatedPercentage,
        })
    }

    /// Percentage contribution of the units inside one band.
    fn range_percentage_amount(&self, range: &ChargeRange, in_range: Decimal) -> ChargeResult<Decimal> {
        Ok(in_range * self.rate(range)? / Decimal::ONE_HUNDRED)
    }
}

impl ChargeStrategy for GraduatedPercentageChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::GraduatedPercentage
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let units = input.aggregation.units;
        let mut amount = Decimal::ZERO;
        for range in self.ranges(input)? {
            let in_range = units_in_range(range, units);
            amount += self.range_percentage_amount(range, in_range)?;
            if in_range > Decimal::ZERO {
                amount += flat_amount(range);
            }
            if is_final_range(range, units) {
                break;
            }
        }
        Ok(amount)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(div_or_zero(self.compute_amount(input)?, input.total_units()))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(rescale_by_period(self.compute_amount(input)?, input.period_ratio))
    }

    fn amount_details(&self, input: &ChargeInput<'_>) -> ChargeResult<AmountDetails> {
        let units = input.aggregation.units;
        let mut rows = Vec::new();
        for range in self.ranges(input)? {
            let in_range = units_in_range(range, units);
            let flat = if in_range > Decimal::ZERO {
                flat_amount(range)
            } else {
                Decimal::ZERO
            };
            let per_unit_total = self.range_percentage_amount(range, in_range)?;

            let mut row = serde_json::Map::new();
            row.insert("from_value".to_string(), display(range.from_value));
            row.insert(
                "to_value".to_string(),
                range.to_value.map_or(serde_json::Value::Null, display),
            );
            row.insert("units".to_string(), display(in_range));
            row.insert("rate".to_string(), display(self.rate(range)?));
            row.insert("flat_unit_amount".to_string(), display(flat));
            row.insert("per_unit_total_amount".to_string(), display(per_unit_total));
            row.insert("total_with_flat_amount".to_string(), display(per_unit_total + flat));
            rows.push(serde_json::Value::Object(row));

            if is_final_range(range, units) {
                break;
            }
        }

        let mut details = AmountDetails::new();
        details.insert(
            "graduated_percentage_ranges".to_string(),
            serde_json::Value::Array(rows),
        );
        Ok(details)
    }
}
