//! Strategy selection
//!
//! Maps a chargeable's model tag (plus its proration flag) to the strategy
//! that prices it. Fixed charges support a narrower model set, and the
//! pay-in-advance path narrows further: it prices one event at a time, so
//! volume pricing does not apply and graduated charges are never prorated.

use tariff_types::ChargeModel;

use crate::error::{ChargeError, ChargeResult};
use crate::strategy::Chargeable;

/// Key of the strategy registry. Distinct from [`ChargeModel`] because the
/// prorated graduated variant shares the `graduated` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Standard,
    Graduated,
    ProratedGraduated,
    GraduatedPercentage,
    Package,
    Percentage,
    Volume,
    Custom,
    Dynamic,
}

impl StrategyKind {
    /// Charge-model tag the kind prices.
    pub fn charge_model(&self) -> ChargeModel {
        match self {
            StrategyKind::Standard => ChargeModel::Standard,
            StrategyKind::Graduated | StrategyKind::ProratedGraduated => ChargeModel::Graduated,
            StrategyKind::GraduatedPercentage => ChargeModel::GraduatedPercentage,
            StrategyKind::Package => ChargeModel::Package,
            StrategyKind::Percentage => ChargeModel::Percentage,
            StrategyKind::Volume => ChargeModel::Volume,
            StrategyKind::Custom => ChargeModel::Custom,
            StrategyKind::Dynamic => ChargeModel::Dynamic,
        }
    }
}

fn graduated_kind(prorated: bool) -> StrategyKind {
    if prorated {
        StrategyKind::ProratedGraduated
    } else {
        StrategyKind::Graduated
    }
}

/// Select the strategy for the standard (in-arrears) computation path.
pub(crate) fn select(chargeable: Chargeable<'_>) -> ChargeResult<StrategyKind> {
    match chargeable {
        Chargeable::Charge(charge) => Ok(match charge.charge_model {
            ChargeModel::Standard => StrategyKind::Standard,
            ChargeModel::Graduated => graduated_kind(charge.prorated),
            ChargeModel::GraduatedPercentage => StrategyKind::GraduatedPercentage,
            ChargeModel::Package => StrategyKind::Package,
            ChargeModel::Percentage => StrategyKind::Percentage,
            ChargeModel::Volume => StrategyKind::Volume,
            ChargeModel::Custom => StrategyKind::Custom,
            ChargeModel::Dynamic => StrategyKind::Dynamic,
        }),
        Chargeable::FixedCharge(fixed) => match fixed.charge_model {
            ChargeModel::Standard => Ok(StrategyKind::Standard),
            ChargeModel::Graduated => Ok(graduated_kind(fixed.prorated)),
            ChargeModel::Volume => Ok(StrategyKind::Volume),
            model => Err(ChargeError::NotImplemented { model, chargeable: chargeable.kind() }),
        },
    }
}

/// Select the strategy for the pay-in-advance path (single-event,
/// pay-before-usage). Graduated maps to the plain walk regardless of the
/// proration flag.
pub(crate) fn select_in_advance(chargeable: Chargeable<'_>) -> ChargeResult<StrategyKind> {
    let Chargeable::Charge(charge) = chargeable else {
        return Err(ChargeError::NotImplemented {
            model: chargeable.charge_model(),
            chargeable: "pay-in-advance fixed charge",
        });
    };
    match charge.charge_model {
        ChargeModel::Standard => Ok(StrategyKind::Standard),
        ChargeModel::Graduated => Ok(StrategyKind::Graduated),
        ChargeModel::GraduatedPercentage => Ok(StrategyKind::GraduatedPercentage),
        ChargeModel::Package => Ok(StrategyKind::Package),
        ChargeModel::Percentage => Ok(StrategyKind::Percentage),
        ChargeModel::Custom => Ok(StrategyKind::Custom),
        ChargeModel::Dynamic => Ok(StrategyKind::Dynamic),
        model @ ChargeModel::Volume => Err(ChargeError::NotImplemented {
            model,
            chargeable: "pay-in-advance charge",
        }),
    }
}
