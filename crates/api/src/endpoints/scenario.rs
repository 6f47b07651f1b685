//! Simulation scenarios.

use domain::models::{Scenario, ScenarioPayload, Simulation};
use tracing::info;
use validator::Validate;

use super::{execute, fetch_list, fetch_record, RequestOptions};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

const SCENARIOS: &str = "/api/scenarios";
const SCENARIO: &str = "/api/scenarios/{id}";
const SIMULATE: &str = "/api/scenarios/{id}/simulate";

pub async fn list_scenarios(
    client: &ApiClient,
    options: &RequestOptions,
) -> Result<Vec<Scenario>, ApiError> {
    fetch_list(client, options.apply_search(ApiRequest::get(SCENARIOS))).await
}

pub async fn get_scenario(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Option<Scenario>, ApiError> {
    fetch_record(client, options.apply(ApiRequest::get(SCENARIO).param("id", id))).await
}

pub async fn create_scenario(
    client: &ApiClient,
    options: &RequestOptions,
    payload: &ScenarioPayload,
) -> Result<Option<Scenario>, ApiError> {
    payload.validate()?;
    fetch_record(client, options.apply(ApiRequest::post(SCENARIOS)).json(payload)?).await
}

pub async fn delete_scenario(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<(), ApiError> {
    execute(client, options.apply(ApiRequest::delete(SCENARIO).param("id", id))).await
}

/// Triggers a simulation run for the scenario.
///
/// The run itself happens on the backend; the returned simulation is
/// usually still pending.
pub async fn simulate_scenario(
    client: &ApiClient,
    options: &RequestOptions,
    id: &str,
) -> Result<Option<Simulation>, ApiError> {
    let simulation: Option<Simulation> =
        fetch_record(client, options.apply(ApiRequest::post(SIMULATE).param("id", id))).await?;

    info!(
        scenario = %id,
        simulation = simulation.as_ref().map(|s| s.id.as_str()).unwrap_or("-"),
        "Simulation requested"
    );
    Ok(simulation)
}
