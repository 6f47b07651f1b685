//! Lenient field access over loosely-shaped backend JSON.
//!
//! The backend is inconsistent about field naming (`productName` vs
//! `product_name` vs `product.name`) and about value types (ids arrive as
//! numbers or strings, counts as numbers, strings or nothing). Normalizers
//! resolve a field through an ordered list of candidate paths with these
//! helpers instead of scattering fallback chains through the code.

use serde_json::Value;

/// Keys under which list endpoints wrap their payload.
const LIST_ENVELOPE_KEYS: [&str; 6] = ["data", "content", "items", "list", "results", "result"];

/// Maximum envelope nesting that is unwrapped (`{ data: { content: [...] } }`).
const MAX_ENVELOPE_DEPTH: usize = 2;

/// Resolves a dotted path (`"machine.name"`) inside a JSON value.
///
/// Numeric segments index into arrays.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Renders a scalar as trimmed text. Empty strings, null, arrays and
/// objects yield `None`.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns the first candidate path that holds a usable scalar, as text.
pub fn pick_string(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|path| lookup(value, path).and_then(as_text))
}

/// Coerces a JSON value to a finite number.
///
/// Mirrors `Number(x) || 0`: numeric strings parse, `true` is 1, and
/// everything else (including NaN and infinities) becomes 0.
pub fn coerce_f64(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Returns the coerced number at the first candidate path that is present
/// and non-null.
pub fn pick_f64(value: &Value, candidates: &[&str]) -> Option<f64> {
    candidates.iter().find_map(|path| match lookup(value, path) {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_f64(v)),
    })
}

/// Integer variant of [`pick_f64`]; fractional values are truncated.
pub fn pick_i64(value: &Value, candidates: &[&str]) -> Option<i64> {
    pick_f64(value, candidates).map(|n| n.trunc() as i64)
}

/// Reads a flag that may arrive as a bool, a number or a `"Y"`/`"true"` string.
pub fn pick_bool(value: &Value, candidates: &[&str]) -> bool {
    candidates
        .iter()
        .find_map(|path| match lookup(value, path) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(0.0) != 0.0),
            Some(Value::String(s)) => Some(matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "y" | "yes" | "1"
            )),
            Some(_) => None,
        })
        .unwrap_or(false)
}

/// Extracts the items of a list response.
///
/// Bare arrays are returned as-is, common envelopes (`data`, `content`,
/// `items`, ...) are unwrapped up to two levels deep, and anything else is
/// treated as an empty list.
pub fn list_items(value: &Value) -> &[Value] {
    list_items_at_depth(value, 0)
}

fn list_items_at_depth(value: &Value, depth: usize) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(map) if depth < MAX_ENVELOPE_DEPTH => LIST_ENVELOPE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .map(|inner| list_items_at_depth(inner, depth + 1))
            .find(|items| !items.is_empty())
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Unwraps a single-record envelope (`{ "data": { ... } }`).
///
/// Returns the value itself when it is not wrapped.
pub fn unwrap_record(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => value,
    }
}

/// Extracts the `message` field of an error body, if any.
pub fn error_message(value: &Value) -> Option<String> {
    pick_string(value, &["message", "error.message", "msg"])
}
