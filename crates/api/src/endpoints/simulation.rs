//! Simulation runs and their computed schedules.

use domain::models::{ScheduleEntry, Simulation, SimulationSummary};
use serde_json::json;

use super::{execute, fetch_list, fetch_record, RequestOptions};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

const SIMULATIONS: &str = "/api/simulation";
const SIMULATION: &str = "/api/simulation/{id}";
const SCHEDULE: &str = "/api/simulation/{id}/json";
const SUMMARY: &str = "/api/simulation/{id}/summary";

pub async fn list_simulations(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Simulation>, ApiError> {
    fetch_list(client, options.apply_search(ApiRequest::get(SIMULATIONS))).await
}

pub async fn get_simulation(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Option<Simulation>, ApiError> {
    fetch_record(client, options.apply(ApiRequest::get(SIMULATION).param("id", id))).await
}

/// Starts a run for `scenario_id`.
pub async fn run_simulation(
    client: &ApiClient,
    options: &RequestOptions,
    scenario_id: &str,
) -> Result<Option<Simulation>, ApiError> {
    shared::validation::validate_path_id(scenario_id)?;
    let request = options
        .apply(ApiRequest::post(SIMULATIONS))
        .json(&json!({ "scenarioId": scenario_id }))?;
    fetch_record(client, request).await
}

pub async fn delete_simulation(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<(), ApiError> {
    execute(client, options.apply(ApiRequest::delete(SIMULATION).param("id", id))).await
}

/// Flat schedule rows of a finished simulation.
pub async fn schedule(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Vec<ScheduleEntry>, ApiError> {
    fetch_list(client, options.apply(ApiRequest::get(SCHEDULE).param("id", id))).await
}

pub async fn summary(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Option<SimulationSummary>, ApiError> {
    fetch_record(client, options.apply(ApiRequest::get(SUMMARY).param("id", id))).await
}
