//! Custom Charge Model
//!
//! The fee is computed entirely by an external scripted aggregation; the
//! engine reads the pre-computed amount off the aggregation snapshot.

use rust_decimal::Decimal;
use tariff_types::ChargeModel;

use crate::error::{ChargeError, ChargeResult};
use crate::strategy::{ChargeInput, ChargeStrategy, div_or_zero, rescale_by_period};

#[derive(Debug, Default)]
pub struct CustomChargeModel;

impl CustomChargeModel {
    fn precomputed_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        input
            .aggregation
            .custom_aggregation
            .as_ref()
            .map(|custom| custom.amount)
            .ok_or_else(|| ChargeError::InvalidAggregation {
                message: "custom charge without a custom aggregation".to_string(),
            })
    }
}

impl ChargeStrategy for CustomChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Custom
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        self.precomputed_amount(input)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(div_or_zero(self.precomputed_amount(input)?, input.total_units()))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(rescale_by_period(self.precomputed_amount(input)?, input.period_ratio))
    }
}
