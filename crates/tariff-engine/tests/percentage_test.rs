use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tariff_engine::{Chargeable, ChargeInput, PerEventAggregation, RatingEngine};
use tariff_types::{AggregationResult, Charge, ChargeModel, ChargeProperties, Currency};

fn percentage_charge() -> Charge {
    Charge {
        charge_model: ChargeModel::Percentage,
        prorated: false,
        currency: Currency { code: "USD".to_string(), exponent: 2 },
    }
}

fn aggregation(units: Decimal, count: u64, running_total: Vec<Decimal>) -> AggregationResult {
    AggregationResult {
        units,
        current_usage_units: units,
        count,
        running_total,
        ..Default::default()
    }
}

fn compute(
    premium: bool,
    aggregation: &AggregationResult,
    properties: &ChargeProperties,
    aggregator: Option<&PerEventAggregation>,
) -> tariff_types::ComputationResult {
    let charge = percentage_charge();
    let input = ChargeInput {
        chargeable: Chargeable::Charge(&charge),
        aggregation,
        properties,
        period_ratio: None,
        calculate_projected_usage: false,
        aggregator: aggregator.map(|a| a as &dyn tariff_engine::PerEventAggregator),
    };
    RatingEngine::new(premium).compute(&input).unwrap()
}

#[test]
fn free_event_count_consumes_the_running_total_prefix() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        fixed_amount: Some(dec!(1)),
        free_units_per_events: Some(2),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);

    // Running total at the second event is 30 free units:
    // (60 - 30) * 10% = 3, plus one paid event's fixed fee.
    assert_eq!(result.amount, dec!(4));
    assert_eq!(
        result.amount_details.get("free_units").unwrap(),
        &serde_json::Value::String("30".to_string())
    );
    assert_eq!(
        result.amount_details.get("units_applied").unwrap(),
        &serde_json::Value::String("30".to_string())
    );
}

#[test]
fn free_event_count_beyond_the_sequence_frees_everything() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        free_units_per_events: Some(5),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);
    assert_eq!(result.amount, dec!(0));
}

#[test]
fn free_amount_threshold_is_capped_by_the_final_running_total() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        fixed_amount: Some(dec!(1)),
        free_units_per_total_aggregation: Some(dec!(25)),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);

    // 25 free units; only the first event's running total stays within the
    // threshold, so two events pay the fixed fee.
    assert_eq!(result.amount, (dec!(60) - dec!(25)) * dec!(0.1) + dec!(2));
}

#[test]
fn free_amount_covering_everything_only_waives_covered_events() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        fixed_amount: Some(dec!(1)),
        free_units_per_total_aggregation: Some(dec!(100)),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);

    // All units free; every running total is within the threshold, so no
    // fixed fees either.
    assert_eq!(result.amount, dec!(0));
}

#[test]
fn event_threshold_wins_when_its_index_is_in_range() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        free_units_per_events: Some(1),
        free_units_per_total_aggregation: Some(dec!(25)),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);
    // Free units come from the running total at event 1, not the amount cap.
    assert_eq!(result.amount, (dec!(60) - dec!(10)) * dec!(0.1));
}

#[test]
fn zero_free_event_threshold_frees_nothing() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        free_units_per_events: Some(0),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);

    // A configured-but-zero event threshold bills the full percentage
    // amount, exactly like an absent one.
    assert_eq!(result.amount, dec!(6));
    assert_eq!(
        result.amount_details.get("free_units").unwrap(),
        &serde_json::Value::String("0".to_string())
    );
}

#[test]
fn zero_free_event_threshold_defers_to_the_amount_threshold() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        free_units_per_events: Some(0),
        free_units_per_total_aggregation: Some(dec!(25)),
        ..Default::default()
    };
    let agg = aggregation(dec!(60), 3, vec![dec!(10), dec!(30), dec!(60)]);

    let result = compute(false, &agg, &properties, None);
    assert_eq!(result.amount, (dec!(60) - dec!(25)) * dec!(0.1));
}

#[test]
fn no_thresholds_means_no_free_units() {
    let properties = ChargeProperties { rate: Some(dec!(25)), ..Default::default() };
    let agg = aggregation(dec!(100), 3, vec![]);

    let result = compute(false, &agg, &properties, None);
    assert_eq!(result.amount, dec!(25));
}

#[test]
fn min_max_replay_clamps_each_transaction() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        per_transaction_min_amount: Some(dec!(1)),
        per_transaction_max_amount: Some(dec!(5)),
        ..Default::default()
    };
    let agg = aggregation(dec!(115), 3, vec![dec!(10), dec!(110), dec!(115)]);
    let events = PerEventAggregation {
        event_aggregation: vec![dec!(10), dec!(100), dec!(5)],
        event_prorated_aggregation: vec![dec!(10), dec!(100), dec!(5)],
    };

    let result = compute(true, &agg, &properties, Some(&events));

    // Contributions 1, 10 and 0.5 clamp to 1, 5 and 1.
    assert_eq!(result.amount, dec!(7));

    // The bulk figures stay visible as diagnostics: 115 * 10% = 11.5.
    assert_eq!(
        result.amount_details.get("min_max_adjustment_total_amount").unwrap(),
        &serde_json::Value::String("-4.5".to_string())
    );
}

#[test]
fn min_max_is_ignored_without_a_premium_license() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        per_transaction_min_amount: Some(dec!(1)),
        per_transaction_max_amount: Some(dec!(5)),
        ..Default::default()
    };
    let agg = aggregation(dec!(115), 3, vec![dec!(10), dec!(110), dec!(115)]);

    let result = compute(false, &agg, &properties, None);
    assert_eq!(result.amount, dec!(11.5));
}

#[test]
fn min_max_replay_skips_free_events_entirely() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        fixed_amount: Some(dec!(1)),
        free_units_per_events: Some(1),
        per_transaction_min_amount: Some(dec!(3)),
        ..Default::default()
    };
    let agg = aggregation(dec!(30), 2, vec![dec!(10), dec!(30)]);
    let events = PerEventAggregation {
        event_aggregation: vec![dec!(10), dec!(20)],
        event_prorated_aggregation: vec![dec!(10), dec!(20)],
    };

    let result = compute(true, &agg, &properties, Some(&events));

    // The first event is free and never clamped up to the minimum; the
    // second contributes 20 * 10% + 1 fixed = 3.
    assert_eq!(result.amount, dec!(3));
}

#[test]
fn min_max_replay_consumes_the_free_amount_budget_sequentially() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        free_units_per_total_aggregation: Some(dec!(15)),
        per_transaction_min_amount: Some(dec!(0.2)),
        ..Default::default()
    };
    let agg = aggregation(dec!(30), 2, vec![dec!(10), dec!(30)]);
    let events = PerEventAggregation {
        event_aggregation: vec![dec!(10), dec!(20)],
        event_prorated_aggregation: vec![dec!(10), dec!(20)],
    };

    let result = compute(true, &agg, &properties, Some(&events));

    // Event 1 is fully covered (10 of 15 free) and skipped. Event 2 has 5
    // free units left, bills 15 at 10% = 1.5, above the minimum.
    assert_eq!(result.amount, dec!(1.5));
}

#[test]
fn min_max_path_requires_the_per_event_aggregator() {
    let properties = ChargeProperties {
        rate: Some(dec!(10)),
        per_transaction_min_amount: Some(dec!(1)),
        ..Default::default()
    };
    let agg = aggregation(dec!(10), 1, vec![dec!(10)]);
    let charge = percentage_charge();
    let input = ChargeInput {
        chargeable: Chargeable::Charge(&charge),
        aggregation: &agg,
        properties: &properties,
        period_ratio: None,
        calculate_projected_usage: false,
        aggregator: None,
    };

    let err = RatingEngine::new(true).compute(&input).unwrap_err();
    assert_eq!(err.category(), "missing_aggregator");
}
