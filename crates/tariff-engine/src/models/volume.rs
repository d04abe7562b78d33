//! Volume Charge Model
//!
//! The whole unit count is priced inside the single band that contains it:
//!
//! `amount = units * per_unit_amount + flat_amount`
//!
//! Unlike the graduated walk, the flat fee is charged once, for the selected
//! band only. The projected amount re-selects a band (possibly a different
//! one) with the projected units and recomputes.

use rust_decimal::Decimal;
use tariff_types::{AmountDetails, ChargeModel, ChargeRange};

use crate::error::{ChargeError, ChargeResult};
use crate::ranges::{covers, flat_amount};
use crate::strategy::{ChargeInput, ChargeStrategy, display, div_or_zero};

#[derive(Debug, Default)]
pub struct VolumeChargeModel;

impl VolumeChargeModel {
    fn matching_range<'a>(
        &self,
        input: &'a ChargeInput<'_>,
        units: Decimal,
    ) -> ChargeResult<&'a ChargeRange> {
        let ranges = input.properties.volume_ranges.as_slice();
        if ranges.is_empty() {
            return Err(ChargeError::MissingProperty {
                key: "volume_ranges",
                model: ChargeModel::Volume,
            });
        }
        ranges
            .iter()
            .find(|range| covers(range, units))
            .ok_or(ChargeError::NoMatchingRange { units })
    }

    fn per_unit_amount(&self, range: &ChargeRange) -> ChargeResult<Decimal> {
        range.per_unit_amount.ok_or(ChargeError::MissingProperty {
            key: "per_unit_amount",
            model: ChargeModel::Volume,
        })
    }

    fn amount_for(&self, input: &ChargeInput<'_>, units: Decimal) -> ChargeResult<Decimal> {
        let range = self.matching_range(input, units)?;
        if units.is_zero() {
            return Ok(Decimal::ZERO);
        }
        Ok(units * self.per_unit_amount(range)? + flat_amount(range))
    }
}

impl ChargeStrategy for VolumeChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Volume
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        self.amount_for(input, input.aggregation.units)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        // Prorated charges divide by the non-prorated unit count.
        let divisor = if input.chargeable.prorated() {
            input.total_units()
        } else {
            input.aggregation.units
        };
        Ok(div_or_zero(self.compute_amount(input)?, divisor))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        self.amount_for(input, input.projected_units())
    }

    fn amount_details(&self, input: &ChargeInput<'_>) -> ChargeResult<AmountDetails> {
        let units = input.aggregation.units;
        let range = self.matching_range(input, units)?;
        let per_unit = self.per_unit_amount(range)?;
        let flat = if units.is_zero() {
            Decimal::ZERO
        } else {
            flat_amount(range)
        };

        let mut details = AmountDetails::new();
        details.insert("flat_unit_amount".to_string(), display(flat));
        details.insert("per_unit_amount".to_string(), display(per_unit));
        details.insert("per_unit_total_amount".to_string(), display(units * per_unit));
        Ok(details)
    }
}
