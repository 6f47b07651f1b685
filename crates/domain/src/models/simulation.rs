//! Simulation run models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{pick_f64, pick_i64, pick_string, unwrap_record};

use super::{pick_time, Normalize};

/// Lifecycle state of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SimulationStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl SimulationStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "READY" | "QUEUED" | "WAITING" => Self::Pending,
            "RUNNING" | "IN_PROGRESS" | "PROCESSING" => Self::Running,
            "COMPLETED" | "COMPLETE" | "DONE" | "SUCCESS" | "FINISHED" => Self::Completed,
            "FAILED" | "FAIL" | "ERROR" => Self::Failed,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Whether a schedule can be fetched for the run.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<String> for SimulationStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<SimulationStatus> for String {
    fn from(status: SimulationStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One simulation run of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: String,
    pub scenario_id: Option<String>,
    pub status: SimulationStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Normalize for Simulation {
    fn normalize(value: &Value) -> Option<Self> {
        let id = pick_string(value, &["id", "simulationId", "simulation_id"])?;
        Some(Self {
            id,
            scenario_id: pick_string(value, &["scenarioId", "scenario_id", "scenario.id"]),
            status: pick_string(value, &["status", "state"])
                .map(|raw| SimulationStatus::parse(&raw))
                .unwrap_or_default(),
            created_at: pick_time(value, &["createdAt", "created_at", "startedAt", "regDate"]),
            finished_at: pick_time(value, &["finishedAt", "finished_at", "endedAt", "completedAt"]),
        })
    }
}

/// KPI summary served by `/api/simulation/{id}/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_tasks: i64,
    pub late_tasks: i64,
    pub makespan_minutes: f64,
    /// Average machine utilization in `0.0..=1.0`.
    pub utilization: f64,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl SimulationSummary {
    /// Share of tasks finished on time; 0 when there are no tasks.
    pub fn on_time_ratio(&self) -> f64 {
        if self.total_tasks <= 0 {
            return 0.0;
        }
        let on_time = (self.total_tasks - self.late_tasks.max(0)).max(0);
        on_time as f64 / self.total_tasks as f64
    }
}

impl Normalize for SimulationSummary {
    fn normalize(value: &Value) -> Option<Self> {
        let value = unwrap_record(value);
        if !value.is_object() {
            return None;
        }

        // Utilization is reported either as a ratio or as a percentage.
        let utilization = pick_f64(
            value,
            &["utilization", "machineUtilization", "avgUtilization", "utilization_rate"],
        )
        .unwrap_or(0.0);
        let utilization = if utilization > 1.0 {
            utilization / 100.0
        } else {
            utilization
        };

        Some(Self {
            total_tasks: pick_i64(value, &["totalTasks", "total_tasks", "taskCount", "total"])
                .unwrap_or(0),
            late_tasks: pick_i64(value, &["lateTasks", "late_tasks", "tardyCount", "late"])
                .unwrap_or(0),
            makespan_minutes: pick_f64(value, &["makespan", "makespanMinutes", "makespan_minutes"])
                .unwrap_or(0.0),
            utilization,
            start_at: pick_time(value, &["startAt", "start_at", "start"]),
            end_at: pick_time(value, &["endAt", "end_at", "end"]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse() {
        assert_eq!(SimulationStatus::parse("done"), SimulationStatus::Completed);
        assert_eq!(SimulationStatus::parse("IN_PROGRESS"), SimulationStatus::Running);
        assert_eq!(
            SimulationStatus::parse("paused"),
            SimulationStatus::Other("paused".into())
        );
        assert!(SimulationStatus::Completed.is_finished());
        assert!(!SimulationStatus::Running.is_finished());
    }

    #[test]
    fn test_simulation_normalize() {
        let sim = Simulation::normalize(&json!({
            "simulationId": 41,
            "scenario": {"id": 3},
            "state": "SUCCESS",
            "createdAt": "2024-05-02T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(sim.id, "41");
        assert_eq!(sim.scenario_id.as_deref(), Some("3"));
        assert_eq!(sim.status, SimulationStatus::Completed);
        assert!(sim.finished_at.is_none());
    }

    #[test]
    fn test_simulation_without_status_is_pending() {
        let sim = Simulation::normalize(&json!({"id": "a"})).unwrap();
        assert_eq!(sim.status, SimulationStatus::Pending);
    }

    #[test]
    fn test_summary_normalize_percentage_utilization() {
        let summary = SimulationSummary::normalize(&json!({
            "data": {"totalTasks": "20", "lateTasks": 5, "makespan": 480, "utilization": 72.5}
        }))
        .unwrap();

        assert_eq!(summary.total_tasks, 20);
        assert_eq!(summary.makespan_minutes, 480.0);
        assert!((summary.utilization - 0.725).abs() < 1e-9);
        assert!((summary.on_time_ratio() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_summary_on_time_ratio_without_tasks() {
        assert_eq!(SimulationSummary::default().on_time_ratio(), 0.0);
        assert!(SimulationSummary::normalize(&json!([1, 2])).is_none());
    }
}
