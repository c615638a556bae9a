use demand_client::db;
use demand_client::domain::{
    Building, BuildingSimulationResult, DemandScenario, DemandScenarioBuilding,
};
use sqlx::PgPool;

use super::{DemandStore, FetchError, ScenarioResult};

/// [`DemandStore`] over a live Postgres pool. Stateless beyond the pool;
/// memoization lives in [`super::CachedStore`].
pub struct PgDemandStore {
    pool: PgPool,
}

impl PgDemandStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_err(e: anyhow::Error) -> FetchError {
    FetchError::Query(e.to_string())
}

/// Decode the fetched result rows in link order. Links with no fetched row
/// are skipped; an empty link set yields an empty output.
pub fn decode_linked_results(
    links: &[DemandScenarioBuilding],
    rows: &[BuildingSimulationResult],
) -> Result<Vec<ScenarioResult>, FetchError> {
    let mut out = Vec::with_capacity(links.len());
    for link in links {
        if let Some(row) = rows.iter().find(|r| r.id == link.id) {
            out.push(ScenarioResult {
                result_id: row.id,
                series: row.decode()?,
            });
        }
    }
    Ok(out)
}

#[async_trait::async_trait]
impl DemandStore for PgDemandStore {
    async fn all_buildings(&self) -> Result<Vec<Building>, FetchError> {
        db::all_buildings(&self.pool).await.map_err(query_err)
    }

    async fn all_scenarios(&self) -> Result<Vec<DemandScenario>, FetchError> {
        db::all_scenarios(&self.pool).await.map_err(query_err)
    }

    async fn scenario_links_for_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<DemandScenarioBuilding>, FetchError> {
        db::scenario_links_for_building(&self.pool, building_id)
            .await
            .map_err(query_err)
    }

    async fn results_for_scenario(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<ScenarioResult>, FetchError> {
        let links = db::links_for_scenario(&self.pool, scenario_id)
            .await
            .map_err(query_err)?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
        let rows = db::results_by_ids(&self.pool, &ids)
            .await
            .map_err(query_err)?;

        decode_linked_results(&links, &rows)
    }

    async fn result_for_scenario_and_building(
        &self,
        scenario_id: i64,
        building_id: i64,
    ) -> Result<ScenarioResult, FetchError> {
        let links = db::links_for_scenario_and_building(&self.pool, scenario_id, building_id)
            .await
            .map_err(query_err)?;

        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
        let rows = db::results_by_ids(&self.pool, &ids)
            .await
            .map_err(query_err)?;

        decode_linked_results(&links, &rows)?
            .into_iter()
            .next()
            .ok_or(FetchError::MissingResult {
                scenario_id,
                building_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: i64, scenario_id: i64, building_id: i64) -> DemandScenarioBuilding {
        DemandScenarioBuilding {
            id,
            demand_scenario_id: scenario_id,
            building_id,
        }
    }

    fn row(id: i64) -> BuildingSimulationResult {
        BuildingSimulationResult {
            id,
            heating: "[1.0]".to_string(),
            cooling: "[2.0]".to_string(),
            lighting: "[3.0]".to_string(),
            equipment: "[4.0]".to_string(),
        }
    }

    #[test]
    fn no_links_decodes_to_no_results() {
        let decoded = decode_linked_results(&[], &[]).expect("decode should succeed");
        assert!(decoded.is_empty());
    }

    #[test]
    fn linked_rows_decode_in_link_order() {
        let links = vec![link(11, 1, 100), link(12, 1, 101)];
        let rows = vec![row(12), row(11)];

        let decoded = decode_linked_results(&links, &rows).expect("decode should succeed");
        let ids: Vec<i64> = decoded.iter().map(|r| r.result_id).collect();
        assert_eq!(ids, vec![11, 12]);
        assert_eq!(decoded[0].series.heating, vec![1.0]);
    }

    #[test]
    fn malformed_row_surfaces_decode_error() {
        let links = vec![link(11, 1, 100)];
        let mut bad = row(11);
        bad.cooling = "{".to_string();

        let err = decode_linked_results(&links, &[bad]).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
