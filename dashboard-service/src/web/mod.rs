pub mod api;
pub mod auth;
pub mod downloads;
pub mod pages;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::fetch::{DemandStore, FetchError};
use crate::reshape::ReshapeError;

/// Shared per-process state: the memoizing store, the configured shared
/// secret, and the set of live session tokens (forgotten on restart).
pub struct AppState {
    pub store: Arc<dyn DemandStore>,
    pub password: String,
    pub sessions: Mutex<HashSet<String>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DemandStore>, password: String) -> Self {
        Self {
            store,
            password,
            sessions: Mutex::new(HashSet::new()),
        }
    }
}

/// Single error type for the whole presentation layer. Anything that is not
/// a missing login collapses to a generic 500; the failed section renders
/// nothing, per the no-partial-failure model.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("login required")]
    Unauthorized,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Reshape(#[from] ReshapeError),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "login required").into_response(),
            other => {
                tracing::error!(error = %other, "view rendering aborted");
                metrics::counter!("view_failures_total").increment(1);
                (StatusCode::INTERNAL_SERVER_ERROR, "data fetch failed").into_response()
            }
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/login", post(auth::login))
        .route("/api/buildings", get(api::list_buildings))
        .route("/api/buildings/:building_id/scenarios", get(api::building_scenarios))
        .route("/api/scenarios", get(api::list_scenarios))
        .route("/api/scenarios/:scenario_id/chart", get(api::scenario_chart))
        .route(
            "/api/scenarios/:scenario_id/buildings/:building_id/chart",
            get(api::building_chart),
        )
        .route("/download/buildings.csv", get(downloads::buildings_csv))
        .route(
            "/download/scenarios/:scenario_id/results.csv",
            get(downloads::scenario_results_csv),
        )
        .route(
            "/download/scenarios/:scenario_id/buildings_results.csv",
            get(downloads::scenario_buildings_csv),
        )
        .with_state(state)
}
