//! Dynamic Charge Model
//!
//! The aggregation carries a precise sub-cent monetary total; the amount is
//! that total scaled down by the billing currency's subunit factor.

use rust_decimal::Decimal;
use tariff_types::ChargeModel;

use crate::error::{ChargeError, ChargeResult};
use crate::strategy::{ChargeInput, ChargeStrategy, div_or_zero, rescale_by_period};

#[derive(Debug, Default)]
pub struct DynamicChargeModel;

impl DynamicChargeModel {
    fn amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let precise_cents = input.aggregation.precise_total_amount_cents.ok_or_else(|| {
            ChargeError::InvalidAggregation {
                message: "dynamic charge without a precise total".to_string(),
            }
        })?;
        let currency = input
            .chargeable
            .currency()
            .ok_or(ChargeError::MissingCurrency { model: ChargeModel::Dynamic })?;
        Ok(div_or_zero(precise_cents, currency.subunit_factor()))
    }
}

impl ChargeStrategy for DynamicChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Dynamic
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        self.amount(input)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(div_or_zero(self.amount(input)?, input.total_units()))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(rescale_by_period(self.amount(input)?, input.period_ratio))
    }
}
