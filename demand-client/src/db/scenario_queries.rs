use anyhow::Result;
use sqlx::PgPool;

use crate::domain::{DemandScenario, DemandScenarioBuilding};

/// Fetch every demand scenario, ordered by id.
pub async fn all_scenarios(pool: &PgPool) -> Result<Vec<DemandScenario>> {
    let rows = sqlx::query_as::<_, DemandScenario>(
        r#"
        SELECT
            id,
            name,
            description
        FROM "DemandScenario"
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch the scenario/building join rows for a single building.
pub async fn scenario_links_for_building(
    pool: &PgPool,
    building_id: i64,
) -> Result<Vec<DemandScenarioBuilding>> {
    let rows = sqlx::query_as::<_, DemandScenarioBuilding>(
        r#"
        SELECT
            id,
            demand_scenario_id,
            building_id
        FROM "DemandScenarioBuilding"
        WHERE building_id = $1
        ORDER BY id
        "#,
    )
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch the scenario/building join rows for a single scenario.
pub async fn links_for_scenario(
    pool: &PgPool,
    scenario_id: i64,
) -> Result<Vec<DemandScenarioBuilding>> {
    let rows = sqlx::query_as::<_, DemandScenarioBuilding>(
        r#"
        SELECT
            id,
            demand_scenario_id,
            building_id
        FROM "DemandScenarioBuilding"
        WHERE demand_scenario_id = $1
        ORDER BY id
        "#,
    )
    .bind(scenario_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch the join rows matching both a scenario and a building.
pub async fn links_for_scenario_and_building(
    pool: &PgPool,
    scenario_id: i64,
    building_id: i64,
) -> Result<Vec<DemandScenarioBuilding>> {
    let rows = sqlx::query_as::<_, DemandScenarioBuilding>(
        r#"
        SELECT
            id,
            demand_scenario_id,
            building_id
        FROM "DemandScenarioBuilding"
        WHERE demand_scenario_id = $1
          AND building_id = $2
        ORDER BY id
        "#,
    )
    .bind(scenario_id)
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
