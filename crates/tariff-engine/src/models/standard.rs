//! Standard Charge Model
//!
//! Flat per-unit pricing: `amount = units * unit_price`.
//! The projected amount is re-derived from the projected units, not a
//! rescale of the actual amount.

use rust_decimal::Decimal;
use tariff_types::ChargeModel;

use crate::error::{ChargeError, ChargeResult};
use crate::strategy::{ChargeInput, ChargeStrategy, div_or_zero};

#[derive(Debug, Default)]
pub struct StandardChargeModel;

impl StandardChargeModel {
    fn unit_price(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        input.properties.amount.ok_or(ChargeError::MissingProperty {
            key: "amount",
            model: ChargeModel::Standard,
        })
    }
}

impl ChargeStrategy for StandardChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Standard
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(input.aggregation.units * self.unit_price(input)?)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(div_or_zero(self.compute_amount(input)?, input.total_units()))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(input.projected_units() * self.unit_price(input)?)
    }
}
