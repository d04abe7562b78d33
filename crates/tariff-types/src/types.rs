use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Pricing strategy tag carried by a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeModel {
    /// Flat per-unit price.
    Standard,
    /// Cumulative tiers, each with its own per-unit price and flat fee.
    Graduated,
    /// Cumulative tiers priced as a percentage rate.
    GraduatedPercentage,
    /// Whole packages of units, partial packages billed in full.
    Package,
    /// Percentage of the aggregated amount plus a per-event fixed fee.
    Percentage,
    /// Single tier selected by the total unit count.
    Volume,
    /// Amount precomputed by an external scripted aggregation.
    Custom,
    /// Amount derived from a precise sub-cent total on the aggregation.
    Dynamic,
}

impl ChargeModel {
    /// Stable snake_case tag, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeModel::Standard => "standard",
            ChargeModel::Graduated => "graduated",
            ChargeModel::GraduatedPercentage => "graduated_percentage",
            ChargeModel::Package => "package",
            ChargeModel::Percentage => "percentage",
            ChargeModel::Volume => "volume",
            ChargeModel::Custom => "custom",
            ChargeModel::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ChargeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing currency of the entity owning a charge.
///
/// Only the subunit scaling matters to the engine: the Dynamic model divides
/// a precise cent-denominated total by `subunit_factor` to obtain an amount
/// in major units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. `"USD"`.
    pub code: String,
    /// Number of decimal subunit digits (2 for USD, 0 for JPY).
    pub exponent: u32,
}

impl Currency {
    /// Subunits per major unit (`10^exponent`).
    pub fn subunit_factor(&self) -> Decimal {
        Decimal::from(10u64.pow(self.exponent))
    }
}

/// A usage-based charge attached to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Pricing strategy to apply.
    pub charge_model: ChargeModel,
    /// Whether per-event quantities are prorated over the period.
    pub prorated: bool,
    /// Billing currency of the owning entity.
    pub currency: Currency,
}

/// A recurring fixed charge; supports a narrower set of pricing strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCharge {
    /// Pricing strategy to apply.
    pub charge_model: ChargeModel,
    /// Whether quantities are prorated over the period.
    pub prorated: bool,
}

/// One contiguous unit band of a graduated, graduated-percentage or volume
/// configuration.
///
/// Upstream validation guarantees: ranges sorted ascending, first
/// `from_value` is zero, bands contiguous without gaps or overlaps, last
/// `to_value` open (`None`). Only the fields relevant to the owning model
/// are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRange {
    /// Inclusive lower bound of the band.
    pub from_value: Decimal,
    /// Inclusive upper bound; `None` means unbounded.
    pub to_value: Option<Decimal>,
    /// Price per unit inside the band (graduated, volume).
    #[serde(default)]
    pub per_unit_amount: Option<Decimal>,
    /// Percentage rate inside the band (graduated percentage).
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Flat fee for entering the band.
    #[serde(default)]
    pub flat_amount: Option<Decimal>,
    /// Optional per-event fixed fee inside the band.
    #[serde(default)]
    pub fixed_amount: Option<Decimal>,
}

/// Validated per-model configuration bag.
///
/// Validity is an upstream precondition; the engine surfaces a missing key
/// required by the selected model as a contract-violation error instead of
/// re-validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeProperties {
    /// Unit price (standard) or per-package price (package).
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Percentage rate (percentage model), e.g. `25` for 25%.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Per-event fixed fee (percentage model).
    #[serde(default)]
    pub fixed_amount: Option<Decimal>,
    /// Units per package (package model, > 0).
    #[serde(default)]
    pub package_size: Option<Decimal>,
    /// Free units deducted before packaging (package model, >= 0).
    #[serde(default)]
    pub free_units: Option<Decimal>,
    /// Free-event-count threshold (percentage model).
    #[serde(default)]
    pub free_units_per_events: Option<u64>,
    /// Free-cumulative-amount threshold (percentage model).
    #[serde(default)]
    pub free_units_per_total_aggregation: Option<Decimal>,
    /// Per-transaction minimum amount (percentage model, premium).
    #[serde(default)]
    pub per_transaction_min_amount: Option<Decimal>,
    /// Per-transaction maximum amount (percentage model, premium).
    #[serde(default)]
    pub per_transaction_max_amount: Option<Decimal>,
    /// Tier configuration for the graduated model.
    #[serde(default)]
    pub graduated_ranges: Vec<ChargeRange>,
    /// Tier configuration for the graduated-percentage model.
    #[serde(default)]
    pub graduated_percentage_ranges: Vec<ChargeRange>,
    /// Tier configuration for the volume model.
    #[serde(default)]
    pub volume_ranges: Vec<ChargeRange>,
    /// Event properties the computation is split by.
    #[serde(default)]
    pub pricing_group_keys: Vec<String>,
    /// Legacy alias of `pricing_group_keys`.
    #[serde(default)]
    pub grouped_by: Vec<String>,
}

impl ChargeProperties {
    /// Grouping keys in effect, preferring the current key over the legacy
    /// alias.
    pub fn grouping_keys(&self) -> &[String] {
        if !self.pricing_group_keys.is_empty() {
            &self.pricing_group_keys
        } else {
            &self.grouped_by
        }
    }
}

/// Pre-computed fee embedded in the aggregation for the Custom model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAggregation {
    /// Fee amount produced by the external scripted aggregation.
    pub amount: Decimal,
}

/// Usage summary for a billing period (or a single event), produced by the
/// usage-aggregation layer. Read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Aggregated unit quantity to price.
    pub units: Decimal,
    /// Units as displayed on current-usage views.
    #[serde(default)]
    pub current_usage_units: Decimal,
    /// Non-prorated unit count; proration-aware divisor when present.
    #[serde(default)]
    pub full_units_number: Option<Decimal>,
    /// Number of events aggregated.
    #[serde(default)]
    pub count: u64,
    /// Total units across all groups of a grouped aggregation.
    #[serde(default)]
    pub total_aggregated_units: Option<Decimal>,
    /// Group key values this (sub-)aggregation belongs to.
    #[serde(default)]
    pub grouped_by: BTreeMap<String, String>,
    /// Per-group sub-aggregations; `None` when the charge is not grouped.
    #[serde(default)]
    pub aggregations: Option<Vec<AggregationResult>>,
    /// Pre-computed fee for the Custom model.
    #[serde(default)]
    pub custom_aggregation: Option<CustomAggregation>,
    /// Precise sub-cent monetary total for the Dynamic model.
    #[serde(default)]
    pub precise_total_amount_cents: Option<Decimal>,
    /// Ordered per-event cumulative unit sums (percentage free-unit logic).
    #[serde(default)]
    pub running_total: Vec<Decimal>,
}

/// Model-specific fee breakdown rendered on invoice lines.
pub type AmountDetails = BTreeMap<String, serde_json::Value>;

/// Output of one charge-model computation, handed to the fee builder.
///
/// Created fresh per call and immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    /// Unit quantity the amount was computed from.
    pub units: Decimal,
    /// Units as displayed on current-usage views.
    pub current_usage_units: Decimal,
    /// Non-prorated unit count, when the aggregation carried one.
    pub full_units_number: Option<Decimal>,
    /// Number of events aggregated.
    pub count: u64,
    /// Computed fee amount, in major currency units.
    pub amount: Decimal,
    /// Effective per-unit amount (zero when no units were billed).
    pub unit_amount: Decimal,
    /// Model-specific breakdown; empty for models without one.
    #[serde(default)]
    pub amount_details: AmountDetails,
    /// Total units across all groups, when grouped.
    pub total_aggregated_units: Option<Decimal>,
    /// Group key values this result belongs to.
    #[serde(default)]
    pub grouped_by: BTreeMap<String, String>,
    /// Per-group results; a single-element list of this result when the
    /// computation was not grouped.
    #[serde(default)]
    pub grouped_results: Vec<ComputationResult>,
    /// Forecast full-period amount; present only when forecasting was
    /// requested.
    pub projected_amount: Option<Decimal>,
    /// Forecast full-period units; present only when forecasting was
    /// requested.
    pub projected_units: Option<Decimal>,
}
