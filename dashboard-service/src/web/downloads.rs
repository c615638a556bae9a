use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use super::{auth, AppState, DashboardError};
use crate::fetch::FetchError;
use crate::reshape::{concat, export, ResultFrame};

fn csv_response(filename: &str, bytes: Vec<u8>) -> Response {
    metrics::counter!("csv_downloads_total").increment(1);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Full building metadata table.
pub async fn buildings_csv(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, DashboardError> {
    auth::require_session(&state, &jar)?;

    let buildings = state.store.all_buildings().await?;
    let bytes = export::building_metadata_csv(&buildings)?;
    Ok(csv_response("buildings_metadata.csv", bytes))
}

async fn scenario_name(state: &AppState, scenario_id: i64) -> Result<String, DashboardError> {
    state
        .store
        .all_scenarios()
        .await?
        .into_iter()
        .find(|s| s.id == scenario_id)
        .map(|s| s.name)
        .ok_or_else(|| FetchError::UnknownScenario(scenario_id).into())
}

async fn scenario_frames(
    state: &AppState,
    scenario_id: i64,
) -> Result<Vec<ResultFrame>, DashboardError> {
    let results = state.store.results_for_scenario(scenario_id).await?;
    Ok(results
        .iter()
        .map(|r| ResultFrame::from_series(r.result_id, &r.series))
        .collect())
}

/// Timestamp-aggregated scenario table.
pub async fn scenario_results_csv(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(scenario_id): Path<i64>,
) -> Result<Response, DashboardError> {
    auth::require_session(&state, &jar)?;

    let name = scenario_name(&state, scenario_id).await?;
    let frames = scenario_frames(&state, scenario_id).await?;
    let aggregated = concat(&frames)?.aggregate();
    let bytes = export::scenario_frame_csv(&aggregated)?;
    Ok(csv_response(&format!("{name}_results.csv"), bytes))
}

/// Raw per-building-per-result table.
pub async fn scenario_buildings_csv(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(scenario_id): Path<i64>,
) -> Result<Response, DashboardError> {
    auth::require_session(&state, &jar)?;

    let name = scenario_name(&state, scenario_id).await?;
    let frames = scenario_frames(&state, scenario_id).await?;
    let stacked = concat(&frames)?;
    let bytes = export::buildings_frame_csv(&stacked)?;
    Ok(csv_response(&format!("{name}_buildings_results.csv"), bytes))
}
