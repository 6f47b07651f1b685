//! Simulation scenario models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{as_text, list_items, lookup, pick_string};
use validator::Validate;

use super::{pick_time, Normalize};

/// A saved scenario: a named set of inputs the backend can simulate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub product_ids: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Normalize for Scenario {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["id", "scenarioId", "scenario_id"])?;

        // Products arrive either as bare ids or as objects.
        let product_ids = ["productIds", "product_ids", "products"]
            .iter()
            .find_map(|key| lookup(value, key))
            .map(|found| {
                list_items(found)
                    .iter()
                    .filter_map(|item| match item {
                        Value::Object(_) => {
                            pick_string(item, &["productId", "product_id", "id"])
                        }
                        scalar => as_text(scalar),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name: pick_string(value, &["name", "scenarioName", "scenario_name", "title"])
                .unwrap_or_else(|| id.clone()),
            id,
            description: pick_string(value, &["description", "desc", "memo"]),
            start_at: pick_time(value, &["startAt", "start_at", "startDate", "baseDate"]),
            product_ids,
            created_at: pick_time(value, &["createdAt", "created_at", "regDate"]),
        })
    }
}

/// Scenario create payload.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPayload {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_normalize_mixed_products() {
        let scenario = Scenario::normalize(&json!({
            "scenarioId": 3,
            "scenario_name": "야간 증산",
            "baseDate": "2024-03-01",
            "products": [{"productId": "P1"}, "P2", 7, null]
        }))
        .unwrap();

        assert_eq!(scenario.id, "3");
        assert_eq!(scenario.name, "야간 증산");
        assert_eq!(scenario.product_ids, vec!["P1", "P2", "7"]);
        assert!(scenario.start_at.is_some());
    }

    #[test]
    fn test_scenario_name_defaults_to_id() {
        let scenario = Scenario::normalize(&json!({"id": "s-1"})).unwrap();
        assert_eq!(scenario.name, "s-1");
        assert!(scenario.product_ids.is_empty());
    }

    #[test]
    fn test_scenario_payload_serializes_camel_case() {
        let payload = ScenarioPayload {
            name: "Base".into(),
            description: None,
            start_at: None,
            product_ids: vec!["P1".into()],
        };
        assert!(payload.validate().is_ok());

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body, json!({"name": "Base", "productIds": ["P1"]}));
    }

    #[test]
    fn test_scenario_payload_rejects_blank_name() {
        let payload = ScenarioPayload {
            name: " ".into(),
            description: None,
            start_at: None,
            product_ids: Vec::new(),
        };
        assert!(payload.validate().is_err());
    }
}
