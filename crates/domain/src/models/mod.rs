//! Domain models for the manufacturing dashboard.
//!
//! Every resource the backend serves is consumed as loosely-shaped JSON and
//! turned into one typed record by its [`Normalize`] implementation. The
//! fallback chains for inconsistent field names live in those
//! implementations and nowhere else.

pub mod community;
pub mod dashboard;
pub mod import;
pub mod member;
pub mod notice;
pub mod operation;
pub mod scenario;
pub mod schedule;
pub mod simulation;

pub use community::{Comment, CommentPayload, Post, PostPayload};
pub use dashboard::{SearchHit, SearchResults};
pub use import::{ImportPreview, ImportRowError};
pub use member::{Account, LoginRequest, LoginResponse, Member, MemberPayload, Role};
pub use notice::{Attachment, Notice, NoticePayload};
pub use operation::{Machine, Operation, Product, RoutingStep, Task};
pub use scenario::{Scenario, ScenarioPayload};
pub use schedule::ScheduleEntry;
pub use simulation::{Simulation, SimulationStatus, SimulationSummary};

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::lenient::{list_items, lookup, unwrap_record};
use shared::time::parse_timestamp_value;

/// Conversion from an arbitrary backend object into a typed record.
pub trait Normalize: Sized {
    /// Builds the record, or `None` when the value is not a usable object.
    fn normalize(value: &Value) -> Option<Self>;
}

/// Normalizes a list response. Missing bodies, non-list bodies and
/// unusable items all degrade to fewer (or zero) records.
pub fn normalize_list<T: Normalize>(value: Option<&Value>) -> Vec<T> {
    value
        .map(|v| list_items(v).iter().filter_map(T::normalize).collect())
        .unwrap_or_default()
}

/// Normalizes a single-record response, unwrapping a `data` envelope.
pub fn normalize_record<T: Normalize>(value: Option<&Value>) -> Option<T> {
    value.map(unwrap_record).and_then(T::normalize)
}

/// Reads the first parseable timestamp among candidate paths.
pub(crate) fn pick_time(value: &Value, candidates: &[&str]) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .find_map(|path| lookup(value, path).and_then(parse_timestamp_value))
}
