//! Graduated Charge Model
//!
//! Walks the sorted tier list, pricing the portion of the units inside each
//! band at the band's per-unit price plus its flat fee. The walk stops at
//! the band containing the last billed unit; bands above it are never
//! entered and never charge their flat fee.
//!
//! The projected amount repeats the tier walk against the projected units,
//! decrementing a remaining-units counter band by band.

use rust_decimal::Decimal;
use tariff_types::{AmountDetails, ChargeModel, ChargeRange};

use crate::error::{ChargeError, ChargeResult};
use crate::ranges::{capacity, flat_amount, is_final_range, units_in_range};
use crate::strategy::{ChargeInput, ChargeStrategy, display, div_or_zero};

#[derive(Debug, Default)]
pub struct GraduatedChargeModel;

impl GraduatedChargeModel {
    fn ranges<'a>(&self, input: &'a ChargeInput<'_>) -> ChargeResult<&'a [ChargeRange]> {
        let ranges = input.properties.graduated_ranges.as_slice();
        if ranges.is_empty() {
            return Err(ChargeError::MissingProperty {
                key: "graduated_ranges",
                model: ChargeModel::Graduated,
            });
        }
        Ok(ranges)
    }

    fn per_unit_amount(&self, range: &ChargeRange) -> ChargeResult<Decimal> {
        range.per_unit_amount.ok_or(ChargeError::MissingProperty {
            key: "per_unit_amount",
            model: ChargeModel::Graduated,
        })
    }

    fn walk(&self, ranges: &[ChargeRange], units: Decimal) -> ChargeResult<Decimal> {
        let mut amount = Decimal::ZERO;
        for range in ranges {
            let in_range = units_in_range(range, units);
            amount += in_range * self.per_unit_amount(range)?;
            if in_range > Decimal::ZERO {
                amount += flat_amount(range);
            }
            if is_final_range(range, units) {
                break;
            }
        }
        Ok(amount)
    }
}

impl ChargeStrategy for GraduatedChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Graduated
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        self.walk(self.ranges(input)?, input.aggregation.units)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(div_or_zero(self.compute_amount(input)?, input.total_units()))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let mut remaining_units_to_price = input.projected_units();
        let mut amount = Decimal::ZERO;
        for range in self.ranges(input)? {
            if remaining_units_to_price <= Decimal::ZERO {
                break;
            }
            let in_range = match capacity(range) {
                Some(cap) => remaining_units_to_price.min(cap),
                None => remaining_units_to_price,
            };
            amount += in_range * self.per_unit_amount(range)? + flat_amount(range);
            remaining_units_to_price -= in_range;
        }
        Ok(amount)
    }

    fn amount_details(&self, input: &ChargeInput<'_>) -> ChargeResult<AmountDetails> {
        let units = input.aggregation.units;
        let mut rows = Vec::new();
        for range in self.ranges(input)? {
            let in_range = units_in_range(range, units);
            let per_unit = self.per_unit_amount(range)?;
            let flat = if in_range > Decimal::ZERO {
                flat_amount(range)
            } else {
                Decimal::ZERO
            };
            let per_unit_total = in_range * per_unit;

            let mut row = serde_json::Map::new();
            row.insert("from_value".to_string(), display(range.from_value));
            row.insert(
                "to_value".to_string(),
                range.to_value.map_or(serde_json::Value::Null, display),
            );
            row.insert("units".to_string(), display(in_range));
            row.insert("per_unit_amount".to_string(), display(per_unit));
            row.insert("flat_unit_amount".to_string(), display(flat));
            row.insert("per_unit_total_amount".to_string(), display(per_unit_total));
            row.insert("total_with_flat_amount".to_string(), display(per_unit_total + flat));
            rows.push(serde_json::Value::Object(row));

            if is_final_range(range, units) {
                break;
            }
        }

        let mut details = AmountDetails::new();
        details.insert("graduated_ranges".to_string(), serde_json::Value::Array(rows));
        Ok(details)
    }
}
