pub mod cache;
pub mod pg;

pub use cache::CachedStore;
pub use pg::PgDemandStore;

use demand_client::domain::{
    Building, DecodeError, DemandScenario, DemandScenarioBuilding, EndUseSeries,
};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("query failed: {0}")]
    Query(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("no result for building {building_id} in scenario {scenario_id}")]
    MissingResult { scenario_id: i64, building_id: i64 },
    #[error("unknown scenario {0}")]
    UnknownScenario(i64),
    #[error("unknown building {0}")]
    UnknownBuilding(i64),
}

/// One decoded simulation result, keyed by its originating result id.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub result_id: i64,
    pub series: EndUseSeries,
}

/// The five read operations the dashboard needs. Implemented against
/// Postgres by [`PgDemandStore`] and memoized by [`CachedStore`].
#[async_trait::async_trait]
pub trait DemandStore: Send + Sync {
    async fn all_buildings(&self) -> Result<Vec<Building>, FetchError>;

    async fn all_scenarios(&self) -> Result<Vec<DemandScenario>, FetchError>;

    /// Join rows for one building; scenario ids and result ids are both
    /// read off the returned links.
    async fn scenario_links_for_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<DemandScenarioBuilding>, FetchError>;

    /// Every decoded result linked to a scenario. Empty exactly when no
    /// join row references the scenario; the empty case is left for the
    /// reshaping layer to reject.
    async fn results_for_scenario(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<ScenarioResult>, FetchError>;

    /// The first decoded result for a (scenario, building) pairing.
    async fn result_for_scenario_and_building(
        &self,
        scenario_id: i64,
        building_id: i64,
    ) -> Result<ScenarioResult, FetchError>;
}
