//! Per-event aggregation capability
//!
//! The prorated-graduated model and the percentage min/max replay both need
//! the individual event series behind an aggregation snapshot. Rather than
//! a back-reference from the snapshot to its producer, the capability is
//! injected alongside it.

use anyhow::Result;
use rust_decimal::Decimal;

/// Parallel per-event series, ordered by event time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerEventAggregation {
    /// Raw magnitude of each event.
    pub event_aggregation: Vec<Decimal>,
    /// Time-prorated equivalent of each event, same order and length.
    pub event_prorated_aggregation: Vec<Decimal>,
}

/// Capability to re-derive the per-event series of an aggregation window.
pub trait PerEventAggregator {
    /// Per-event unit series for the window the snapshot was built from.
    fn per_event_aggregation(&self) -> Result<PerEventAggregation>;
}

impl PerEventAggregator for PerEventAggregation {
    fn per_event_aggregation(&self) -> Result<PerEventAggregation> {
        Ok(self.clone())
    }
}
