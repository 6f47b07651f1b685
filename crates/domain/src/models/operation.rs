//! Production master data: products, operations, machines, tasks and routing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{pick_f64, pick_i64, pick_string};

use super::Normalize;

/// A product that can be routed through operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub quantity: f64,
}

impl Normalize for Product {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["productId", "product_id", "id", "code"])?;
        Some(Self {
            name: pick_string(value, &["productName", "product_name", "name"])
                .unwrap_or_else(|| id.clone()),
            id,
            category: pick_string(value, &["category", "type", "productType"]),
            quantity: pick_f64(value, &["quantity", "qty", "count"]).unwrap_or(0.0),
        })
    }
}

/// A manufacturing operation (process step definition).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub name: String,
    pub machine_type: Option<String>,
    /// Standard processing time in minutes.
    pub standard_minutes: f64,
}

impl Normalize for Operation {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["operationId", "operation_id", "id", "code"])?;
        Some(Self {
            name: pick_string(value, &["operationName", "operation_name", "name"])
                .unwrap_or_else(|| id.clone()),
            id,
            machine_type: pick_string(value, &["machineType", "machine_type", "machineGroup"]),
            standard_minutes: pick_f64(
                value,
                &["standardTime", "standard_time", "processTime", "duration"],
            )
            .unwrap_or(0.0),
        })
    }
}

/// A machine on the shop floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub machine_type: Option<String>,
    pub status: Option<String>,
}

impl Machine {
    /// Display title used by machine listings and Gantt rows: `id · name`.
    pub fn title(&self) -> String {
        machine_title(&self.id, Some(&self.name))
    }
}

/// Builds the `machineId · machineName` title, omitting a missing or
/// redundant name.
pub fn machine_title(id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() && name != id => format!("{} · {}", id, name),
        _ => id.to_string(),
    }
}

impl Normalize for Machine {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["machineId", "machine_id", "id", "code"])?;
        Some(Self {
            name: pick_string(value, &["machineName", "machine_name", "name"])
                .unwrap_or_else(|| id.clone()),
            id,
            machine_type: pick_string(value, &["machineType", "machine_type", "type"]),
            status: pick_string(value, &["status", "state"]),
        })
    }
}

/// A work-order task in master data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub product_id: Option<String>,
    pub operation_id: Option<String>,
    pub quantity: f64,
    pub due_date: Option<String>,
}

impl Normalize for Task {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["taskId", "task_id", "id"])?;
        Some(Self {
            id,
            product_id: pick_string(value, &["productId", "product_id", "product.id"]),
            operation_id: pick_string(value, &["operationId", "operation_id", "operation.id"]),
            quantity: pick_f64(value, &["quantity", "qty", "count"]).unwrap_or(0.0),
            due_date: pick_string(value, &["dueDate", "due_date", "deadline"]),
        })
    }
}

/// One step of a product's routing sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingStep {
    pub product_id: String,
    pub operation_id: String,
    pub sequence: i64,
}

impl RoutingStep {
    /// Groups steps per product, each product's steps in sequence order.
    /// Products keep first-seen order.
    pub fn by_product(steps: &[RoutingStep]) -> Vec<(String, Vec<RoutingStep>)> {
        let mut grouped: Vec<(String, Vec<RoutingStep>)> = Vec::new();
        for step in steps {
            match grouped.iter_mut().find(|(id, _)| *id == step.product_id) {
                Some((_, list)) => list.push(step.clone()),
                None => grouped.push((step.product_id.clone(), vec![step.clone()])),
            }
        }
        for (_, list) in grouped.iter_mut() {
            list.sort_by_key(|step| step.sequence);
        }
        grouped
    }
}

impl Normalize for RoutingStep {
    fn normalize(value: &Value) -> Option<Self> {
        Some(Self {
            product_id: pick_string(value, &["productId", "product_id", "product.id"])?,
            operation_id: pick_string(value, &["operationId", "operation_id", "operation.id"])?,
            sequence: pick_i64(value, &["sequence", "seq", "order", "step"]).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_normalize() {
        let product = Product::normalize(&json!({"product_id": "P1", "qty": "40"})).unwrap();
        assert_eq!(product.name, "P1");
        assert_eq!(product.quantity, 40.0);
    }

    #[test]
    fn test_operation_normalize() {
        let op = Operation::normalize(&json!({
            "operationId": "OP10", "operationName": "Turning", "standardTime": "12.5"
        }))
        .unwrap();
        assert_eq!(op.name, "Turning");
        assert_eq!(op.standard_minutes, 12.5);
    }

    #[test]
    fn test_machine_title() {
        assert_eq!(machine_title("M1", Some("Lathe")), "M1 · Lathe");
        assert_eq!(machine_title("M1", Some("M1")), "M1");
        assert_eq!(machine_title("M1", Some("")), "M1");
        assert_eq!(machine_title("M1", None), "M1");

        let machine = Machine::normalize(&json!({"id": 2, "name": "Press"})).unwrap();
        assert_eq!(machine.title(), "2 · Press");
    }

    #[test]
    fn test_task_normalize() {
        let task = Task::normalize(&json!({
            "taskId": "T9", "product": {"id": "P1"}, "operation_id": "OP20", "quantity": "x"
        }))
        .unwrap();
        assert_eq!(task.product_id.as_deref(), Some("P1"));
        assert_eq!(task.quantity, 0.0);
    }

    #[test]
    fn test_routing_requires_product_and_operation() {
        assert!(RoutingStep::normalize(&json!({"productId": "P1"})).is_none());
        let step =
            RoutingStep::normalize(&json!({"productId": "P1", "operationId": "OP1", "seq": "2"}))
                .unwrap();
        assert_eq!(step.sequence, 2);
    }

    #[test]
    fn test_routing_by_product() {
        let step = |p: &str, o: &str, s: i64| RoutingStep {
            product_id: p.into(),
            operation_id: o.into(),
            sequence: s,
        };
        let steps = vec![
            step("P2", "OP30", 3),
            step("P1", "OP20", 2),
            step("P2", "OP10", 1),
            step("P1", "OP10", 1),
        ];

        let grouped = RoutingStep::by_product(&steps);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "P2");
        assert_eq!(grouped[0].1[0].operation_id, "OP10");
        assert_eq!(grouped[1].1[1].operation_id, "OP20");
    }
}
