//! # Consumption Analytics
//!
//! Pure aggregation over consumption logs. No I/O: callers fetch the logs
//! through the service layer and hand them in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;
use crate::types::ConsumptionLog;

/// Aggregated totals for one consumed item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemConsumption {
    /// Display name (first-seen casing).
    pub item_name: String,
    /// Total quantity consumed across all events.
    pub quantity: Quantity,
    /// Number of consumption events.
    pub events: usize,
    /// Unit of the first event for this item, if any.
    pub unit: Option<String>,
}

/// Summary of a set of consumption logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSummary {
    /// Total number of consumption events.
    pub events: usize,
    /// Per-item totals, largest quantity first.
    pub by_item: Vec<ItemConsumption>,
    /// Total quantity per unit. Events without a unit aggregate under the
    /// empty-string key.
    pub total_by_unit: BTreeMap<String, Quantity>,
    /// Earliest consumption timestamp observed.
    pub first_consumed_at: Option<DateTime<Utc>>,
    /// Latest consumption timestamp observed.
    pub last_consumed_at: Option<DateTime<Utc>>,
}

/// Aggregates consumption logs into a summary.
///
/// Item names group case-insensitively; the first-seen casing is kept for
/// display. Ordering is by total quantity descending, then name, so the
/// result is deterministic for a given input order.
pub fn summarize(logs: &[ConsumptionLog]) -> ConsumptionSummary {
    let mut by_item: BTreeMap<String, ItemConsumption> = BTreeMap::new();
    let mut total_by_unit: BTreeMap<String, Quantity> = BTreeMap::new();
    let mut first: Option<DateTime<Utc>> = None;
    let mut last: Option<DateTime<Utc>> = None;

    for log in logs {
        let key = log.item_name.to_lowercase();
        let entry = by_item.entry(key).or_insert_with(|| ItemConsumption {
            item_name: log.item_name.clone(),
            quantity: Quantity::zero(),
            events: 0,
            unit: log.unit.clone(),
        });
        entry.quantity += log.quantity;
        entry.events += 1;

        let unit_key = log.unit.clone().unwrap_or_default();
        *total_by_unit.entry(unit_key).or_insert_with(Quantity::zero) += log.quantity;

        first = Some(match first {
            Some(t) if t <= log.consumed_at => t,
            _ => log.consumed_at,
        });
        last = Some(match last {
            Some(t) if t >= log.consumed_at => t,
            _ => log.consumed_at,
        });
    }

    let mut by_item: Vec<ItemConsumption> = by_item.into_values().collect();
    by_item.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.item_name.cmp(&b.item_name))
    });

    ConsumptionSummary {
        events: logs.len(),
        by_item,
        total_by_unit,
        first_consumed_at: first,
        last_consumed_at: last,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log(name: &str, milli: i64, unit: Option<&str>, day: u32) -> ConsumptionLog {
        let at = Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap();
        ConsumptionLog {
            id: format!("log-{name}-{day}"),
            inventory_id: "inv-1".to_string(),
            inventory_item_id: None,
            food_item_id: None,
            item_name: name.to_string(),
            quantity: Quantity::from_milli(milli),
            unit: unit.map(str::to_string),
            consumed_at: at,
            notes: None,
            is_deleted: false,
            deleted_at: None,
            created_at: at,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.events, 0);
        assert!(summary.by_item.is_empty());
        assert!(summary.first_consumed_at.is_none());
    }

    #[test]
    fn test_groups_case_insensitively() {
        let logs = vec![
            log("Apple", 1_000, Some("pcs"), 1),
            log("apple", 2_000, Some("pcs"), 2),
            log("Milk", 500, Some("l"), 3),
        ];
        let summary = summarize(&logs);

        assert_eq!(summary.events, 3);
        assert_eq!(summary.by_item.len(), 2);
        // Apple first: 3.0 > 0.5
        assert_eq!(summary.by_item[0].item_name, "Apple");
        assert_eq!(summary.by_item[0].quantity, Quantity::from_whole(3));
        assert_eq!(summary.by_item[0].events, 2);
        assert_eq!(summary.by_item[1].item_name, "Milk");
    }

    #[test]
    fn test_unit_totals_and_range() {
        let logs = vec![
            log("Apple", 1_000, Some("pcs"), 5),
            log("Rice", 750, None, 2),
            log("Milk", 500, Some("l"), 9),
        ];
        let summary = summarize(&logs);

        assert_eq!(summary.total_by_unit["pcs"], Quantity::from_whole(1));
        assert_eq!(summary.total_by_unit["l"], Quantity::from_milli(500));
        assert_eq!(summary.total_by_unit[""], Quantity::from_milli(750));
        assert_eq!(
            summary.first_consumed_at.unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 2, 12, 0, 0).unwrap()
        );
        assert_eq!(
            summary.last_consumed_at.unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 9, 12, 0, 0).unwrap()
        );
    }
}
