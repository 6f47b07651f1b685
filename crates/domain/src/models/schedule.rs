//! Schedule entry model.
//!
//! One row of a simulation's computed task assignment: which product and
//! operation a task belongs to, which machine and worker run it, and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{lookup, pick_f64, pick_string};
use shared::time::{parse_timestamp, parse_timestamp_value};

use super::Normalize;

const PRODUCT_NAME: [&str; 5] = [
    "productName",
    "product_name",
    "product.name",
    "productId",
    "product_id",
];
const OPERATION_ID: [&str; 4] = ["operationId", "operation_id", "operation.id", "opId"];
const TASK_ID: [&str; 4] = ["taskId", "task_id", "task.id", "id"];
const MACHINE_ID: [&str; 3] = ["machineId", "machine_id", "machine.id"];
const MACHINE_NAME: [&str; 3] = ["machineName", "machine_name", "machine.name"];
const WORKER_NAME: [&str; 4] = ["workerName", "worker_name", "worker.name", "workerId"];
const START_AT: [&str; 5] = ["startAt", "start_at", "startTime", "start_time", "start"];
const END_AT: [&str; 5] = ["endAt", "end_at", "endTime", "end_time", "end"];
const COUNT: [&str; 3] = ["count", "qty", "quantity"];

/// A raw schedule row as consumed from the simulation schedule endpoint.
///
/// Times are kept as the text the backend sent; parsing happens where the
/// value is used so that a malformed time is distinguishable from a
/// missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub product_name: Option<String>,
    pub operation_id: Option<String>,
    pub task_id: Option<String>,
    pub machine_id: Option<String>,
    pub machine_name: Option<String>,
    pub worker_name: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    /// Explicit volume carried by some schedule rows.
    pub count: Option<f64>,
}

impl ScheduleEntry {
    /// Parsed start time; `None` when missing or unreadable.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start_at.as_deref().and_then(parse_timestamp)
    }

    /// Parsed end time; `None` when missing or unreadable.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end_at.as_deref().and_then(parse_timestamp)
    }

    /// Whether both a start and an end value were supplied at all.
    pub fn has_time_span(&self) -> bool {
        self.start_at.is_some() && self.end_at.is_some()
    }
}

/// Reads a time field as text; epoch-millisecond numbers become RFC 3339.
fn pick_time_text(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        number @ Value::Number(_) => parse_timestamp_value(number).map(|ts| ts.to_rfc3339()),
        _ => None,
    })
}

impl Normalize for ScheduleEntry {
    fn normalize(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        Some(Self {
            product_name: pick_string(value, &PRODUCT_NAME),
            operation_id: pick_string(value, &OPERATION_ID),
            task_id: pick_string(value, &TASK_ID),
            machine_id: pick_string(value, &MACHINE_ID),
            machine_name: pick_string(value, &MACHINE_NAME),
            worker_name: pick_string(value, &WORKER_NAME),
            start_at: pick_time_text(value, &START_AT),
            end_at: pick_time_text(value, &END_AT),
            count: pick_f64(value, &COUNT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_normalize_camel_case() {
        let value = json!({
            "productName": "Gear A",
            "operationId": "OP10",
            "taskId": "T-1",
            "machineId": "M1",
            "machineName": "Lathe",
            "workerName": "Kim",
            "startAt": "2024-01-01T08:00:00",
            "endAt": "2024-01-01T09:00:00"
        });

        let entry = ScheduleEntry::normalize(&value).unwrap();
        assert_eq!(entry.product_name.as_deref(), Some("Gear A"));
        assert_eq!(entry.operation_id.as_deref(), Some("OP10"));
        assert_eq!(entry.machine_name.as_deref(), Some("Lathe"));
        assert_eq!(
            entry.start(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
        );
        assert!(entry.has_time_span());
    }

    #[test]
    fn test_normalize_snake_case_and_nested() {
        let value = json!({
            "product": {"name": "Shaft"},
            "operation_id": 20,
            "machine": {"id": 3, "name": "Mill"},
            "worker": {"name": "Lee"},
            "start_time": "2024-01-01 08:00:00",
            "end_time": "2024-01-01 08:30:00",
            "qty": "12"
        });

        let entry = ScheduleEntry::normalize(&value).unwrap();
        assert_eq!(entry.product_name.as_deref(), Some("Shaft"));
        assert_eq!(entry.operation_id.as_deref(), Some("20"));
        assert_eq!(entry.machine_id.as_deref(), Some("3"));
        assert_eq!(entry.machine_name.as_deref(), Some("Mill"));
        assert_eq!(entry.worker_name.as_deref(), Some("Lee"));
        assert_eq!(entry.count, Some(12.0));
    }

    #[test]
    fn test_normalize_epoch_millis_times() {
        let value = json!({"startAt": 1_704_067_200_000i64, "endAt": 1_704_070_800_000i64});
        let entry = ScheduleEntry::normalize(&value).unwrap();
        assert_eq!(
            entry.end(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_malformed_time_is_present_but_unparsed() {
        let value = json!({"startAt": "soon", "endAt": ""});
        let entry = ScheduleEntry::normalize(&value).unwrap();

        assert_eq!(entry.start_at.as_deref(), Some("soon"));
        assert!(entry.start().is_none());
        assert!(entry.end_at.is_none());
        assert!(!entry.has_time_span());
    }

    #[test]
    fn test_non_numeric_count_is_zero() {
        let entry = ScheduleEntry::normalize(&json!({"count": "many"})).unwrap();
        assert_eq!(entry.count, Some(0.0));
    }

    #[test]
    fn test_normalize_rejects_non_objects() {
        assert!(ScheduleEntry::normalize(&json!([1, 2])).is_none());
        assert!(ScheduleEntry::normalize(&json!(null)).is_none());
    }
}
