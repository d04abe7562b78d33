//! Package Charge Model
//!
//! Units are sold in packages of `package_size`, `amount` per package, with
//! `free_units` deducted first. A package counts from its first unit, so a
//! partial package is billed whole:
//!
//! `amount = ceil((units - free_units) / package_size) * amount_per_package`
//!
//! The projected amount reapplies the same ceiling logic to the projected
//! units.

use rust_decimal::Decimal;
use tariff_types::{AmountDetails, ChargeModel};

use crate::error::{ChargeError, ChargeResult};
use crate::strategy::{ChargeInput, ChargeStrategy, display, div_or_zero};

#[derive(Debug, Default)]
pub struct PackageChargeModel;

impl PackageChargeModel {
    fn package_size(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        input.properties.package_size.ok_or(ChargeError::MissingProperty {
            key: "package_size",
            model: ChargeModel::Package,
        })
    }

    fn per_package_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        input.properties.amount.ok_or(ChargeError::MissingProperty {
            key: "amount",
            model: ChargeModel::Package,
        })
    }

    fn free_units(&self, input: &ChargeInput<'_>) -> Decimal {
        input.properties.free_units.unwrap_or(Decimal::ZERO)
    }

    fn paid_units(&self, input: &ChargeInput<'_>) -> Decimal {
        input.aggregation.units - self.free_units(input)
    }

    fn amount_for(&self, input: &ChargeInput<'_>, paid_units: Decimal) -> ChargeResult<Decimal> {
        if paid_units <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let packages = paid_units
            .checked_div(self.package_size(input)?)
            .unwrap_or(Decimal::ZERO)
            .ceil();
        Ok(packages * self.per_package_amount(input)?)
    }
}

impl ChargeStrategy for PackageChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Package
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let paid_units = self.paid_units(input);
        self.amount_for(input, paid_units)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let paid_units = self.paid_units(input);
        if paid_units <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(div_or_zero(self.amount_for(input, paid_units)?, paid_units))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let projected_paid = input.projected_units() - self.free_units(input);
        self.amount_for(input, projected_paid)
    }

    fn amount_details(&self, input: &ChargeInput<'_>) -> ChargeResult<AmountDetails> {
        let paid_units = self.paid_units(input);
        let paid_display = if paid_units <= Decimal::ZERO {
            serde_json::Value::String("0.0".to_string())
        } else {
            display(paid_units)
        };

        let mut details = AmountDetails::new();
        details.insert("free_units".to_string(), display(self.free_units(input)));
        details.insert("paid_units".to_string(), paid_display);
        details.insert("per_package_size".to_string(), display(self.package_size(input)?));
        details.insert(
            "per_package_unit_amount".to_string(),
            display(self.per_package_amount(input)?),
        );
        Ok(details)
    }
}
