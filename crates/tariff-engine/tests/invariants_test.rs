//! Property-based checks of the engine-wide invariants: amounts are never
//! negative, unit amounts reconcile against the billed total, grouped
//! computations sum exactly, and the cumulative models are non-decreasing
//! in units.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tariff_engine::{Chargeable, ChargeInput, RatingEngine};
use tariff_types::{
    AggregationResult, Charge, ChargeModel, ChargeProperties, ChargeRange, Currency,
};

fn usd() -> Currency {
    Currency { code: "USD".to_string(), exponent: 2 }
}

fn charge(model: ChargeModel) -> Charge {
    Charge { charge_model: model, prorated: false, currency: usd() }
}

fn aggregation(units: Decimal) -> AggregationResult {
    AggregationResult { units, current_usage_units: units, count: 1, ..Default::default() }
}

fn compute_amount(model: ChargeModel, units: Decimal, properties: &ChargeProperties) -> Decimal {
    let charge = charge(model);
    let agg = aggregation(units);
    let input = ChargeInput {
        chargeable: Chargeable::Charge(&charge),
        aggregation: &agg,
        properties,
        period_ratio: None,
        calculate_projected_usage: false,
        aggregator: None,
    };
    RatingEngine::default().compute(&input).unwrap().amount
}

/// Hundredths in [0, 100_000.00], the realistic usage range.
fn units() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn graduated_properties() -> ChargeProperties {
    let range = |from: Decimal, to: Option<Decimal>, per_unit: Decimal, flat: Decimal| ChargeRange {
        from_value: from,
        to_value: to,
        per_unit_amount: Some(per_unit),
        rate: None,
        flat_amount: Some(flat),
        fixed_amount: None,
    };
    ChargeProperties {
        graduated_ranges: vec![
            range(dec!(0), Some(dec!(100)), dec!(0.5), dec!(0)),
            range(dec!(101), Some(dec!(1000)), dec!(0.3), dec!(10)),
            range(dec!(1001), None, dec!(0.1), dec!(25)),
        ],
        ..Default::default()
    }
}

fn volume_properties() -> ChargeProperties {
    // Constant per-unit price with growing flat fees keeps the model
    // monotonic, which is what the invariant asserts for valid configs.
    let range = |from: Decimal, to: Option<Decimal>, flat: Decimal| ChargeRange {
        from_value: from,
        to_value: to,
        per_unit_amount: Some(dec!(0.4)),
        rate: None,
        flat_amount: Some(flat),
        fixed_amount: None,
    };
    ChargeProperties {
        volume_ranges: vec![
            range(dec!(0), Some(dec!(100)), dec!(0)),
            range(dec!(100.01), Some(dec!(1000)), dec!(5)),
            range(dec!(1000.01), None, dec!(20)),
        ],
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn amounts_are_never_negative(units in units()) {
        let standard = ChargeProperties { amount: Some(dec!(0.25)), ..Default::default() };
        prop_assert!(compute_amount(ChargeModel::Standard, units, &standard) >= Decimal::ZERO);
        prop_assert!(
            compute_amount(ChargeModel::Graduated, units, &graduated_properties())
                >= Decimal::ZERO
        );

        let package = ChargeProperties {
            amount: Some(dec!(10)),
            package_size: Some(dec!(25)),
            free_units: Some(dec!(50)),
            ..Default::default()
        };
        prop_assert!(compute_amount(ChargeModel::Package, units, &package) >= Decimal::ZERO);
    }

    #[test]
    fn unit_amount_reconciles_with_the_amount(units in units()) {
        let charge = charge(ChargeModel::Graduated);
        let properties = graduated_properties();
        let agg = aggregation(units);
        let input = ChargeInput {
            chargeable: Chargeable::Charge(&charge),
            aggregation: &agg,
            properties: &properties,
            period_ratio: None,
            calculate_projected_usage: false,
            aggregator: None,
        };
        let result = RatingEngine::default().compute(&input).unwrap();

        if units.is_zero() {
            prop_assert_eq!(result.unit_amount, Decimal::ZERO);
        } else {
            let reconciled = result.unit_amount * units;
            prop_assert!((reconciled - result.amount).abs() <= dec!(0.000000000001));
        }
    }

    #[test]
    fn standard_is_non_decreasing_in_units(a in units(), b in units()) {
        let properties = ChargeProperties { amount: Some(dec!(0.25)), ..Default::default() };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            compute_amount(ChargeModel::Standard, lo, &properties)
                <= compute_amount(ChargeModel::Standard, hi, &properties)
        );
    }

    #[test]
    fn graduated_is_non_decreasing_in_units(a in units(), b in units()) {
        let properties = graduated_properties();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            compute_amount(ChargeModel::Graduated, lo, &properties)
                <= compute_amount(ChargeModel::Graduated, hi, &properties)
        );
    }

    #[test]
    fn volume_is_non_decreasing_in_units(a in units(), b in units()) {
        let properties = volume_properties();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            compute_amount(ChargeModel::Volume, lo, &properties)
                <= compute_amount(ChargeModel::Volume, hi, &properties)
        );
    }

    #[test]
    fn package_is_non_decreasing_in_units(a in units(), b in units()) {
        let properties = ChargeProperties {
            amount: Some(dec!(10)),
            package_size: Some(dec!(25)),
            free_units: Some(dec!(50)),
            ..Default::default()
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            compute_amount(ChargeModel::Package, lo, &properties)
                <= compute_amount(ChargeModel::Package, hi, &properties)
        );
    }

    #[test]
    fn grouped_totals_sum_the_groups_exactly(group_units in prop::collection::vec(units(), 1..6)) {
        let standard = charge(ChargeModel::Standard);
        let properties = ChargeProperties {
            amount: Some(dec!(0.37)),
            pricing_group_keys: vec!["region".to_string()],
            ..Default::default()
        };

        let total: Decimal = group_units.iter().copied().sum();
        let mut agg = aggregation(total);
        agg.aggregations = Some(group_units.iter().copied().map(aggregation).collect());

        let input = ChargeInput {
            chargeable: Chargeable::Charge(&standard),
            aggregation: &agg,
            properties: &properties,
            period_ratio: None,
            calculate_projected_usage: false,
            aggregator: None,
        };
        let result = RatingEngine::default().compute(&input).unwrap();

        let amount_sum: Decimal = result.grouped_results.iter().map(|group| group.amount).sum();
        let units_sum: Decimal = result.grouped_results.iter().map(|group| group.units).sum();
        prop_assert_eq!(result.amount, amount_sum);
        prop_assert_eq!(result.units, units_sum);
        prop_assert_eq!(result.grouped_results.len(), group_units.len());
    }
}
