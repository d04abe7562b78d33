//! Prorated Graduated Charge Model
//!
//! Applied when a graduated charge is marked prorated. Tier placement is
//! driven by the raw magnitude of each event, but each tier bills the
//! time-prorated equivalent of the units placed in it: an event's prorated
//! value is split across tiers proportionally to its prorated coefficient
//! (`prorated / full`), and the unpriced remainder of an event is carried
//! across tier boundaries until exhausted, so a single large event can
//! overflow several tiers. Flat fees are charged for every tier up to the
//! one containing the cumulative full-unit total, even when no prorated
//! value landed there.
//!
//! The projected amount rescales the actual amount by the period ratio.

use rust_decimal::Decimal;
use tariff_types::{ChargeModel, ChargeRange};

use crate::error::{ChargeError, ChargeResult};
use crate::per_event::PerEventAggregation;
use crate::ranges::{capacity, flat_amount};
use crate::strategy::{ChargeInput, ChargeStrategy, div_or_zero, rescale_by_period};

#[derive(Debug, Default)]
pub struct ProratedGraduatedChargeModel;

/// Tier-walk state: the current tier, the full units already placed into
/// it, and the prorated sum accumulated per tier.
struct TierWalk {
    tier: usize,
    placed_in_tier: Decimal,
    prorated_sums: Vec<Decimal>,
    total_full_units: Decimal,
}

impl TierWalk {
    fn new(tier_count: usize) -> Self {
        Self {
            tier: 0,
            placed_in_tier: Decimal::ZERO,
            prorated_sums: vec![Decimal::ZERO; tier_count],
            total_full_units: Decimal::ZERO,
        }
    }

    /// Place one event. Each step either exhausts the event's remainder or
    /// fills the current tier, so the walk terminates: tiers are finite and
    /// the last one is unbounded.
    fn place_event(
        &mut self,
        ranges: &[ChargeRange],
        full_units: Decimal,
        prorated_units: Decimal,
    ) -> ChargeResult<()> {
        if full_units <= Decimal::ZERO {
            return Ok(());
        }
        let coefficient = prorated_units.checked_div(full_units).unwrap_or(Decimal::ZERO);
        self.total_full_units += full_units;

        let mut remaining = full_units;
        while remaining > Decimal::ZERO {
            let range = ranges.get(self.tier).ok_or(ChargeError::InvalidAggregation {
                message: "graduated ranges exhausted before the event series".to_string(),
            })?;
            let room = match capacity(range) {
                Some(cap) => cap - self.placed_in_tier,
                None => remaining,
            };
            if room <= Decimal::ZERO {
                self.tier += 1;
                self.placed_in_tier = Decimal::ZERO;
                continue;
            }

            let placed = remaining.min(room);
            self.prorated_sums[self.tier] += placed * coefficient;
            self.placed_in_tier += placed;
            remaining -= placed;
        }
        Ok(())
    }
}

impl ProratedGraduatedChargeModel {
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

    fn event_series(&self, input: &ChargeInput<'_>) -> ChargeResult<PerEventAggregation> {
        let aggregator = input.aggregator.ok_or(ChargeError::MissingAggregator {
            model: ChargeModel::Graduated,
        })?;
        let series = aggregator.per_event_aggregation()?;
        if series.event_aggregation.len() != series.event_prorated_aggregation.len() {
            return Err(ChargeError::InvalidAggregation {
                message: "full and prorated event series differ in length".to_string(),
            });
        }
        Ok(series)
    }

    fn walk(&self, input: &ChargeInput<'_>) -> ChargeResult<TierWalk> {
        let ranges = self.ranges(input)?;
        let series = self.event_series(input)?;

        let mut walk = TierWalk::new(ranges.len());
        for (&full, &prorated) in series
            .event_aggregation
            .iter()
            .zip(&series.event_prorated_aggregation)
        {
            walk.place_event(ranges, full, prorated)?;
        }
        Ok(walk)
    }
}

impl ChargeStrategy for ProratedGraduatedChargeModel {
    fn model(&self) -> ChargeModel {
        ChargeModel::Graduated
    }

    fn compute_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let ranges = self.ranges(input)?;
        let walk = self.walk(input)?;

        let mut amount = Decimal::ZERO;
        for (range, prorated_sum) in ranges.iter().zip(&walk.prorated_sums) {
            let per_unit = range.per_unit_amount.ok_or(ChargeError::MissingProperty {
                key: "per_unit_amount",
                model: ChargeModel::Graduated,
            })?;
            amount += *prorated_sum * per_unit;
        }

        // Flat fees up to the tier containing the cumulative full total.
        if walk.total_full_units > Decimal::ZERO {
            for range in &ranges[..=walk.tier] {
                amount += flat_amount(range);
            }
        }
        Ok(amount)
    }

    fn unit_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        let walk = self.walk(input)?;
        Ok(div_or_zero(self.compute_amount(input)?, walk.total_full_units))
    }

    fn compute_projected_amount(&self, input: &ChargeInput<'_>) -> ChargeResult<Decimal> {
        Ok(rescale_by_period(self.compute_amount(input)?, input.period_ratio))
    }
}
