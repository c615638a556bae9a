use anyhow::Result;
use sqlx::PgPool;

use crate::domain::BuildingSimulationResult;

/// Fetch simulation results by id (inclusion filter). The JSON sequence
/// columns come back as raw text; decoding happens in the caller.
pub async fn results_by_ids(
    pool: &PgPool,
    ids: &[i64],
) -> Result<Vec<BuildingSimulationResult>> {
    let rows = sqlx::query_as::<_, BuildingSimulationResult>(
        r#"
        SELECT
            id,
            heating,
            cooling,
            lighting,
            equipment
        FROM "BuildingSimulationResult"
        WHERE id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
