use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    #[serde(default)]
    pub price_per_kg: Option<f64>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stocktake {
    #[serde(default)]
    pub current_stock: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialUsage {
    #[serde(default)]
    pub total_usage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdateRequest {
    pub id: i64,
    pub field: String,
    pub value: f64,
}

/// Derived values the server computed after persisting a single-cell edit.
/// The day-level values belong to the day of the edited field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedValues {
    pub opening_stock: f64,
    pub variance: f64,
    pub closing_stock: f64,
    pub required_for_plan: f64,
    pub variance_for_week: f64,
    pub value_required: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ConfirmedValues>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub total_planned: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub total_planned: Option<f64>,
    #[serde(default)]
    pub variance: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Inventory list filter, sent as the list page's query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFilter {
    #[serde(rename = "search_item")]
    pub item: String,
    #[serde(rename = "search_category")]
    pub category: String,
    #[serde(rename = "search_week_commencing")]
    pub week_commencing: String,
}

impl SearchFilter {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayInput {
    pub required: f64,
    pub ordered: f64,
    pub received: f64,
    pub consumed: f64,
}

/// Raw figures for one week as stored on disk, days keyed by lower-case name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekInput {
    pub week_commencing: Option<NaiveDate>,
    pub current_stock: Option<f64>,
    pub price_per_kg: Option<f64>,
    pub days: BTreeMap<String, DayInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_metadata_fields_deserialize_as_none() {
        let item: ItemDetails =
            serde_json::from_str(r#"{"price_per_kg": null, "supplier_name": "Acme"}"#).unwrap();
        assert_eq!(item.price_per_kg, None);
        assert_eq!(item.supplier_name.as_deref(), Some("Acme"));
        assert_eq!(item.category, None);
    }

    #[test]
    fn failed_update_carries_message() {
        let response: FieldUpdateResponse =
            serde_json::from_str(r#"{"success": false, "error": "Invalid field"}"#).unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("Invalid field"));
    }

    #[test]
    fn week_input_accepts_partial_days() {
        let input: WeekInput = serde_json::from_str(
            r#"{"week_commencing": "2025-07-07", "days": {"monday": {"required": 4}}}"#,
        )
        .unwrap();
        assert_eq!(input.week_commencing, NaiveDate::from_ymd_opt(2025, 7, 7));
        assert_eq!(input.days["monday"].required, 4.0);
        assert_eq!(input.days["monday"].consumed, 0.0);
        assert_eq!(input.current_stock, None);
    }
}
