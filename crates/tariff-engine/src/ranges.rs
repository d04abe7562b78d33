//! Tier boundary math
//!
//! Shared by the graduated, graduated-percentage and volume models. Bands
//! use inclusive bounds: `[0, 10]` holds the first ten units and `[11, 20]`
//! the next ten, so a band starting above zero is one unit wider than the
//! difference of its bounds. Fractional quantities fall inside the band
//! whose bounds straddle them.

use rust_decimal::Decimal;
use tariff_types::ChargeRange;

/// Units of `units` that fall inside `range`, clamped to the band width.
pub(crate) fn units_in_range(range: &ChargeRange, units: Decimal) -> Decimal {
    let upper = match range.to_value {
        Some(to) => units.min(to),
        None => units,
    };
    let offset = if range.from_value.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE
    };
    (upper - range.from_value + offset).max(Decimal::ZERO)
}

/// Whether `units` lies inside the band (volume lookup).
pub(crate) fn covers(range: &ChargeRange, units: Decimal) -> bool {
    units >= range.from_value && range.to_value.is_none_or(|to| units <= to)
}

/// Whether the tier walk stops at this range: the band is open-ended or its
/// upper bound reaches the unit count.
pub(crate) fn is_final_range(range: &ChargeRange, units: Decimal) -> bool {
    range.to_value.is_none_or(|to| to >= units)
}

/// Width of the band in units; `None` for the open-ended final band.
pub(crate) fn capacity(range: &ChargeRange) -> Option<Decimal> {
    let to = range.to_value?;
    let offset = if range.from_value.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE
    };
    Some(to - range.from_value + offset)
}

/// Flat fee of the band, zero when unset.
pub(crate) fn flat_amount(range: &ChargeRange) -> Decimal {
    range.flat_amount.unwrap_or(Decimal::ZERO)
}
