use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use demand_client::domain::{Building, DemandScenario};
use serde::Serialize;

use super::{auth, AppState, DashboardError};
use crate::fetch::FetchError;
use crate::reshape::{concat, MeltedRow, ResultFrame, ScenarioFrame};

#[derive(Debug, Serialize)]
pub struct ScenarioOption {
    pub id: i64,
    pub name: String,
}

/// Melted rows plus a ready-made chart title; the page groups rows by
/// `End Use` into one trace per category.
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub title: String,
    pub rows: Vec<MeltedRow>,
}

async fn scenario_by_id(
    state: &AppState,
    scenario_id: i64,
) -> Result<DemandScenario, DashboardError> {
    state
        .store
        .all_scenarios()
        .await?
        .into_iter()
        .find(|s| s.id == scenario_id)
        .ok_or_else(|| FetchError::UnknownScenario(scenario_id).into())
}

async fn building_by_id(state: &AppState, building_id: i64) -> Result<Building, DashboardError> {
    state
        .store
        .all_buildings()
        .await?
        .into_iter()
        .find(|b| b.id == building_id)
        .ok_or_else(|| FetchError::UnknownBuilding(building_id).into())
}

pub async fn list_buildings(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<Building>>, DashboardError> {
    auth::require_session(&state, &jar)?;
    Ok(Json(state.store.all_buildings().await?))
}

pub async fn list_scenarios(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<DemandScenario>>, DashboardError> {
    auth::require_session(&state, &jar)?;
    Ok(Json(state.store.all_scenarios().await?))
}

/// Scenarios offered in the per-building selector: only those linked to the
/// building through a join row.
pub async fn building_scenarios(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(building_id): Path<i64>,
) -> Result<Json<Vec<ScenarioOption>>, DashboardError> {
    auth::require_session(&state, &jar)?;

    let links = state.store.scenario_links_for_building(building_id).await?;
    let options = state
        .store
        .all_scenarios()
        .await?
        .into_iter()
        .filter(|s| links.iter().any(|l| l.demand_scenario_id == s.id))
        .map(|s| ScenarioOption {
            id: s.id,
            name: s.name,
        })
        .collect();
    Ok(Json(options))
}

/// Aggregated scenario chart: concat all per-result frames, sum per
/// timestamp, melt. A scenario with no results aborts with the
/// empty-input error.
pub async fn scenario_chart(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(scenario_id): Path<i64>,
) -> Result<Json<ChartData>, DashboardError> {
    auth::require_session(&state, &jar)?;
    metrics::counter!("chart_requests_total").increment(1);

    let scenario = scenario_by_id(&state, scenario_id).await?;
    let results = state.store.results_for_scenario(scenario_id).await?;
    let frames: Vec<ResultFrame> = results
        .iter()
        .map(|r| ResultFrame::from_series(r.result_id, &r.series))
        .collect();
    let aggregated = concat(&frames)?.aggregate();

    Ok(Json(ChartData {
        title: format!("{} Demand Scenario", scenario.name),
        rows: aggregated.melt(),
    }))
}

/// Single-building chart for one (scenario, building) result.
pub async fn building_chart(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path((scenario_id, building_id)): Path<(i64, i64)>,
) -> Result<Json<ChartData>, DashboardError> {
    auth::require_session(&state, &jar)?;
    metrics::counter!("chart_requests_total").increment(1);

    let building = building_by_id(&state, building_id).await?;
    let result = state
        .store
        .result_for_scenario_and_building(scenario_id, building_id)
        .await?;
    let frame = ResultFrame::from_series(result.result_id, &result.series);

    Ok(Json(ChartData {
        title: format!("Building {} Energy Use", building.name),
        rows: ScenarioFrame::from_single(&frame).melt(),
    }))
}
