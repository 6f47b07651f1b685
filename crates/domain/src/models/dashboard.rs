//! Dashboard keyword search models.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{list_items, pick_string, unwrap_record};

use super::Normalize;

const ID: [&str; 7] = [
    "id",
    "productId",
    "machineId",
    "operationId",
    "noticeId",
    "communityId",
    "scenarioId",
];
const TITLE: [&str; 7] = [
    "title",
    "name",
    "productName",
    "machineName",
    "operationName",
    "scenarioName",
    "label",
];

/// Fallback kind for hits that do not say what they are.
pub const UNKNOWN_KIND: &str = "etc";

/// One search match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Resource kind, e.g. `product`, `machine`, `notice`.
    pub kind: String,
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
}

impl SearchHit {
    fn from_value(value: &Value, kind: Option<&str>) -> Option<Self> {
        let id = pick_string(value, &ID)?;
        let kind = kind
            .map(str::to_string)
            .or_else(|| pick_string(value, &["type", "kind", "category"]))
            .unwrap_or_else(|| UNKNOWN_KIND.to_string());

        Some(Self {
            kind: kind.to_ascii_lowercase(),
            title: pick_string(value, &TITLE).unwrap_or_else(|| id.clone()),
            id,
            subtitle: pick_string(value, &["subtitle", "description", "content", "status"]),
        })
    }
}

impl Normalize for SearchHit {
    fn normalize(value: &Value) -> Option<Self> {
        Self::from_value(value, None)
    }
}

/// All hits for one keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Hits grouped by kind; kinds keep first-seen order.
    pub fn by_kind(&self) -> Vec<(&str, Vec<&SearchHit>)> {
        let mut groups: Vec<(&str, Vec<&SearchHit>)> = Vec::new();
        for hit in &self.hits {
            match groups.iter_mut().find(|(kind, _)| *kind == hit.kind) {
                Some((_, list)) => list.push(hit),
                None => groups.push((hit.kind.as_str(), vec![hit])),
            }
        }
        groups
    }
}

impl Normalize for SearchResults {
    /// Accepts a flat list of typed hits or an object keyed by kind
    /// (`{ "products": [...], "machines": [...] }`).
    fn normalize(value: &Value) -> Option<Self> {
        let flat = list_items(value);
        if !flat.is_empty() {
            return Some(Self {
                hits: flat.iter().filter_map(SearchHit::normalize).collect(),
            });
        }

        let Value::Object(map) = unwrap_record(value) else {
            return Some(Self::default());
        };

        let hits = map
            .iter()
            .filter(|(_, items)| items.is_array())
            .flat_map(|(key, items)| {
                let kind = singular(key);
                list_items(items)
                    .iter()
                    .filter_map(move |item| SearchHit::from_value(item, Some(kind)))
            })
            .collect();

        Some(Self { hits })
    }
}

fn singular(key: &str) -> &str {
    key.strip_suffix("List")
        .or_else(|| key.strip_suffix('s'))
        .unwrap_or(key)
}
