//! Engine facade
//!
//! [`RatingEngine`] owns the strategy registry and dispatches a computation
//! to the strategy selected for the chargeable, wrapping it in the grouped
//! computation when grouping applies.

use std::collections::HashMap;

use tariff_types::ComputationResult;
use tracing::{debug, instrument};

use crate::error::{ChargeError, ChargeResult};
use crate::grouped::compute_grouped;
use crate::models::custom::CustomChargeModel;
use crate::models::dynamic::DynamicChargeModel;
use crate::models::graduated::GraduatedChargeModel;
use crate::models::graduated_percentage::GraduatedPercentageChargeModel;
use crate::models::package::PackageChargeModel;
use crate::models::percentage::PercentageChargeModel;
use crate::models::prorated_graduated::ProratedGraduatedChargeModel;
use crate::models::standard::StandardChargeModel;
use crate::models::volume::VolumeChargeModel;
use crate::selector::{StrategyKind, select, select_in_advance};
use crate::strategy::{ChargeInput, ChargeStrategy, apply};

/// The charge-model computation engine.
///
/// Stateless between calls; safe to share across callers. The premium
/// license flag gates the percentage model's per-transaction min/max path.
pub struct RatingEngine {
    strategies: HashMap<StrategyKind, Box<dyn ChargeStrategy>>,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RatingEngine {
    /// Build the engine and register every charge model.
    pub fn new(premium: bool) -> Self {
        let mut strategies: HashMap<StrategyKind, Box<dyn ChargeStrategy>> = HashMap::new();
        strategies.insert(StrategyKind::Standard, Box::new(StandardChargeModel));
        strategies.insert(StrategyKind::Graduated, Box::new(GraduatedChargeModel));
        strategies.insert(
            StrategyKind::ProratedGraduated,
            Box::new(ProratedGraduatedChargeModel),
        );
        strategies.insert(
            StrategyKind::GraduatedPercentage,
            Box::new(GraduatedPercentageChargeModel),
        );
        strategies.insert(StrategyKind::Package, Box::new(PackageChargeModel));
        strategies.insert(
            StrategyKind::Percentage,
            Box::new(PercentageChargeModel::new(premium)),
        );
        strategies.insert(StrategyKind::Volume, Box::new(VolumeChargeModel));
        strategies.insert(StrategyKind::Custom, Box::new(CustomChargeModel));
        strategies.insert(StrategyKind::Dynamic, Box::new(DynamicChargeModel));
        Self { strategies }
    }

    fn strategy(&self, kind: StrategyKind) -> ChargeResult<&dyn ChargeStrategy> {
        self.strategies
            .get(&kind)
            .map(|strategy| strategy.as_ref())
            .ok_or(ChargeError::NotImplemented {
                model: kind.charge_model(),
                chargeable: "registry",
            })
    }

    /// Compute the fee for a billing period (in-arrears path).
    #[instrument(
        skip(self, input),
        fields(charge_model = %input.chargeable.charge_model(), units = %input.aggregation.units)
    )]
    pub fn compute(&self, input: &ChargeInput<'_>) -> ChargeResult<ComputationResult> {
        let kind = select(input.chargeable)?;
        let strategy = self.strategy(kind)?;

        if Self::grouping_applies(input) {
            debug!(kind = ?kind, groups = input.aggregation.aggregations.as_ref().map(Vec::len), "computing grouped charge");
            compute_grouped(strategy, input)
        } else {
            debug!(kind = ?kind, "computing charge");
            apply(strategy, input)
        }
    }

    /// Compute the fee for a single event at ingestion time
    /// (pay-in-advance path). Never grouped.
    #[instrument(
        skip(self, input),
        fields(charge_model = %input.chargeable.charge_model(), units = %input.aggregation.units)
    )]
    pub fn compute_in_advance(&self, input: &ChargeInput<'_>) -> ChargeResult<ComputationResult> {
        let kind = select_in_advance(input.chargeable)?;
        debug!(kind = ?kind, "computing pay-in-advance charge");
        apply(self.strategy(kind)?, input)
    }

    fn grouping_applies(input: &ChargeInput<'_>) -> bool {
        !input.properties.grouping_keys().is_empty() && input.aggregation.aggregations.is_some()
    }
}
