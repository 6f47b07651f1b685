//! Spreadsheet import results.
//!
//! The `.../xls` and `.../parse/xls` endpoints answer with the rows they
//! read from the uploaded workbook plus any rows they rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{list_items, lookup, pick_i64, pick_string, unwrap_record};

use super::Normalize;

/// Maximum number of rejected rows printed in a summary.
pub const MAX_REPORTED_ERRORS: usize = 20;

/// A row the backend could not import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// 1-indexed spreadsheet row, when reported.
    pub row: Option<i64>,
    pub message: String,
}

impl Normalize for ImportRowError {
    fn normalize(value: &Value) -> Option<Self> {
        if let Value::String(message) = value {
            return Some(Self {
                row: None,
                message: message.clone(),
            });
        }
        Some(Self {
            row: pick_i64(value, &["row", "rowNum", "rowNumber", "line"]),
            message: pick_string(value, &["message", "error", "reason"])?,
        })
    }
}

/// Outcome of an upload or parse request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    /// Parsed rows, kept raw so each resource can normalize them itself.
    pub rows: Vec<Value>,
    /// Rows processed according to the backend; falls back to `rows.len()`.
    pub total: i64,
    pub errors: Vec<ImportRowError>,
}

impl ImportPreview {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rows accepted by the backend.
    pub fn accepted(&self) -> i64 {
        (self.total - self.errors.len() as i64).max(0)
    }

    /// Normalizes the parsed rows as records of one resource.
    pub fn records<T: Normalize>(&self) -> Vec<T> {
        self.rows.iter().filter_map(T::normalize).collect()
    }
}

impl Normalize for ImportPreview {
    fn normalize(value: &Value) -> Option<Self> {
        let rows: Vec<Value> = match lookup(unwrap_record(value), "rows") {
            Some(rows) => list_items(rows).to_vec(),
            None => list_items(value).to_vec(),
        };

        let errors = ["errors", "failures", "data.errors"]
            .iter()
            .find_map(|key| lookup(value, key))
            .map(|found| {
                list_items(found)
                    .iter()
                    .filter_map(ImportRowError::normalize)
                    .collect()
            })
            .unwrap_or_default();

        let total = pick_i64(
            value,
            &["total", "count", "processed", "data.total", "data.count"],
        )
        .unwrap_or(rows.len() as i64);

        Some(Self {
            rows,
            total,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Machine;
    use serde_json::json;

    #[test]
    fn test_preview_from_bare_rows() {
        let preview = ImportPreview::normalize(&json!([
            {"machineId": "M1", "machineName": "Lathe"},
            {"machineId": "M2"}
        ]))
        .unwrap();

        assert_eq!(preview.total, 2);
        assert!(preview.is_clean());

        let machines: Vec<Machine> = preview.records();
        assert_eq!(machines[1].name, "M2");
    }

    #[test]
    fn test_preview_with_errors() {
        let preview = ImportPreview::normalize(&json!({
            "data": {"rows": [{"id": 1}], "total": 3},
            "errors": [{"rowNum": 4, "reason": "machineId missing"}, "row 5 empty"]
        }))
        .unwrap();

        assert_eq!(preview.rows.len(), 1);
        assert_eq!(preview.total, 3);
        assert_eq!(preview.errors[0].row, Some(4));
        assert_eq!(preview.errors[1].message, "row 5 empty");
        assert_eq!(preview.accepted(), 1);
    }

    #[test]
    fn test_preview_from_empty_body() {
        let preview = ImportPreview::normalize(&json!({"result": "ok"})).unwrap();
        assert!(preview.rows.is_empty());
        assert_eq!(preview.total, 0);
    }
}
